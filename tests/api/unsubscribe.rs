use crate::helpers::spawn_app;

#[tokio::test]
async fn unsubscribe_without_token_is_rejected_with_a_404() {
    // arrange
    let app = spawn_app().await;

    // act
    let response = app.get("/api/unsubscribe").await;

    // assert
    assert_eq!(response.status().code, 404);
}

#[tokio::test]
async fn unsubscribe_with_an_empty_token_is_rejected_with_a_400() {
    // arrange
    let app = spawn_app().await;
    app.subscribe("ursula_le_guin@gmail.com", "Kyiv", "daily").await;

    // act
    let response = app.get("/api/unsubscribe/").await;

    // assert
    assert_eq!(response.status().code, 400);
    assert_eq!(app.store.users().len(), 1);
}

#[tokio::test]
async fn unsubscribing_removes_every_record_of_the_subscriber() {
    // arrange
    let app = spawn_app().await;
    let links = app.subscribe("ursula_le_guin@gmail.com", "Kyiv", "daily").await;
    app.subscribe("other@example.com", "London", "hourly").await;

    // act
    let response = app.get(&links.unsubscribe).await;

    // assert
    assert_eq!(response.status().code, 200);
    let users = app.store.users();
    assert_eq!(users.len(), 1);
    assert_eq!(users[0].email, "other@example.com");
    assert_eq!(app.store.subscriptions().len(), 1);
    assert!(app.store.tokens().iter().all(|t| t.user_id == users[0].id));
}

#[tokio::test]
async fn confirmed_subscribers_can_unsubscribe() {
    // arrange
    let app = spawn_app().await;
    let links = app.subscribe("ursula_le_guin@gmail.com", "Kyiv", "daily").await;
    app.get(&links.confirm).await;

    // act
    let response = app.get(&links.unsubscribe).await;

    // assert
    assert_eq!(response.status().code, 200);
    assert!(app.store.users().is_empty());
    assert!(app.store.tokens().is_empty());
}

#[tokio::test]
async fn an_unsubscribe_link_works_only_once() {
    // arrange
    let app = spawn_app().await;
    let links = app.subscribe("ursula_le_guin@gmail.com", "Kyiv", "daily").await;
    app.get(&links.unsubscribe).await;

    // act
    let response = app.get(&links.unsubscribe).await;

    // assert
    assert_eq!(response.status().code, 404);
}

#[tokio::test]
async fn a_confirm_token_cannot_unsubscribe() {
    // arrange
    let app = spawn_app().await;
    let links = app.subscribe("ursula_le_guin@gmail.com", "Kyiv", "daily").await;
    let confirm_token = links.confirm.trim_start_matches("/api/confirm/");

    // act
    let response = app
        .get(&format!("/api/unsubscribe/{}", confirm_token))
        .await;

    // assert
    assert_eq!(response.status().code, 400);
    assert_eq!(app.store.users().len(), 1);
}

#[tokio::test]
async fn unsubscribe_rejects_unsupported_methods_with_a_400() {
    // arrange
    let app = spawn_app().await;

    // act
    let put = app.client.put("/api/unsubscribe/some-token").dispatch().await;
    let patch = app.client.patch("/api/unsubscribe/some-token").dispatch().await;

    // assert
    assert_eq!(put.status().code, 400);
    assert_eq!(patch.status().code, 400);
}
