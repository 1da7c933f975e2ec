use crate::helpers::spawn_app;
use std::sync::atomic::Ordering;

#[tokio::test]
async fn subscribe_returns_a_200_for_valid_form_data() {
    // arrange
    let app = spawn_app().await;
    let body = "email=ursula_le_guin%40gmail.com&city=Kyiv&frequency=daily";

    // act
    let response = app.post_subscriptions(body.into()).await;

    // assert
    assert_eq!(200, response.status().code);

    let users = app.store.users();
    assert_eq!(users.len(), 1);
    assert_eq!(users[0].email, "ursula_le_guin@gmail.com");
    assert!(!users[0].is_confirmed);

    let subscriptions = app.store.subscriptions();
    assert_eq!(subscriptions.len(), 1);
    assert_eq!(subscriptions[0].city, "Kyiv");
    assert_eq!(subscriptions[0].frequency, "daily");
    assert_eq!(app.store.tokens().len(), 2);
}

#[tokio::test]
async fn subscribe_sends_a_confirmation_email_with_both_links() {
    // arrange
    let app = spawn_app().await;
    let body = "email=ursula_le_guin%40gmail.com&city=Kyiv&frequency=hourly";

    // act
    app.post_subscriptions(body.into()).await;

    // assert
    let emails = app.sent_emails();
    assert_eq!(emails.len(), 1, "Expected 1 email, {} were sent", emails.len());
    assert_eq!(emails[0].recipient, "ursula_le_guin@gmail.com");
    let links = app.get_token_links(&emails[0]);
    assert!(links.confirm.starts_with("/api/confirm/"));
    assert!(links.unsubscribe.starts_with("/api/unsubscribe/"));
    assert!(emails[0].html.contains(&links.confirm));
    assert!(emails[0].html.contains(&links.unsubscribe));
}

#[tokio::test]
async fn subscribe_returns_a_409_for_duplicate_email() {
    // arrange
    let app = spawn_app().await;
    let body = "email=ursula_le_guin%40gmail.com&city=Kyiv&frequency=daily";
    app.post_subscriptions(body.into()).await;

    // act
    let response = app
        .post_subscriptions("email=ursula_le_guin%40gmail.com&city=London&frequency=hourly".into())
        .await;

    // assert
    assert_eq!(409, response.status().code);
    assert_eq!(app.store.users().len(), 1);
    assert_eq!(app.store.subscriptions()[0].city, "Kyiv");
    assert_eq!(app.sent_emails().len(), 1);
}

#[tokio::test]
async fn subscribe_returns_a_400_when_data_is_missing() {
    // arrange
    let app = spawn_app().await;
    let test_cases = vec![
        ("city=Kyiv&frequency=daily", "missing the email"),
        ("email=ursula_le_guin%40gmail.com&frequency=daily", "missing the city"),
        ("email=ursula_le_guin%40gmail.com&city=Kyiv", "missing the frequency"),
        ("", "missing every field"),
    ];

    for (invalid_body, error_message) in test_cases {
        // act
        let response = app.post_subscriptions(invalid_body.into()).await;

        // assert
        assert_eq!(
            400,
            response.status().code,
            "The API did not fail with 400 Bad Request when the payload was {}.",
            error_message
        );
    }
}

#[tokio::test]
async fn subscribe_returns_a_400_when_fields_are_present_but_invalid() {
    // arrange
    let app = spawn_app().await;
    let test_cases = vec![
        ("email=&city=Kyiv&frequency=daily", "empty email"),
        ("email=definitely-not-an-email&city=Kyiv&frequency=daily", "invalid email"),
        ("email=ursula_le_guin%40gmail.com&city=&frequency=daily", "empty city"),
        ("email=ursula_le_guin%40gmail.com&city=%20%20&frequency=daily", "blank city"),
        ("email=ursula_le_guin%40gmail.com&city=Kyiv&frequency=weekly", "unknown frequency"),
    ];

    for (body, description) in test_cases {
        // act
        let response = app.post_subscriptions(body.into()).await;

        // assert
        assert_eq!(
            400,
            response.status().code,
            "The API did not return a 400 Bad Request when the payload was {}.",
            description
        );
    }
    assert!(app.store.users().is_empty());
    assert!(app.sent_emails().is_empty());
}

#[tokio::test]
async fn subscribe_returns_a_500_but_keeps_the_subscriber_when_mail_fails() {
    // arrange
    let app = spawn_app().await;
    app.email_client.fail.store(true, Ordering::SeqCst);
    let body = "email=ursula_le_guin%40gmail.com&city=Kyiv&frequency=daily";

    // act
    let response = app.post_subscriptions(body.into()).await;

    // assert
    assert_eq!(500, response.status().code);
    assert_eq!(
        response.into_string().await.unwrap_or_default(),
        "Something went wrong"
    );
    assert_eq!(app.store.users().len(), 1);
}

#[tokio::test]
async fn subscribe_rejects_unsupported_methods_with_a_400() {
    // arrange
    let app = spawn_app().await;

    // act
    let get = app.client.get("/api/subscribe").dispatch().await;
    let put = app.client.put("/api/subscribe").dispatch().await;
    let delete = app.client.delete("/api/subscribe").dispatch().await;
    let patch = app.client.patch("/api/subscribe").dispatch().await;

    // assert
    for response in [get, put, delete, patch] {
        assert_eq!(400, response.status().code);
    }
}
