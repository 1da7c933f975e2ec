use crate::helpers::spawn_app;

#[tokio::test]
async fn confirmations_without_token_are_rejected_with_a_404() {
    // arrange
    let app = spawn_app().await;

    // act
    let response = app.get("/api/confirm").await;

    // assert
    assert_eq!(response.status().code, 404);
}

#[tokio::test]
async fn confirmations_with_an_empty_token_are_rejected_with_a_400() {
    // arrange
    let app = spawn_app().await;
    app.subscribe("ursula_le_guin@gmail.com", "Kyiv", "daily").await;

    // act
    let response = app.get("/api/confirm/").await;

    // assert
    assert_eq!(response.status().code, 400);
    assert_eq!(
        response.into_string().await.unwrap_or_default(),
        "Token is empty."
    );
    assert!(!app.store.users()[0].is_confirmed);
    assert_eq!(app.store.tokens().len(), 2);
}

#[tokio::test]
async fn the_link_returned_by_subscribe_returns_a_200_if_called() {
    // arrange
    let app = spawn_app().await;
    let links = app.subscribe("ursula_le_guin@gmail.com", "Kyiv", "daily").await;

    // act
    let response = app.get(&links.confirm).await;

    // assert
    assert_eq!(response.status().code, 200);
}

#[tokio::test]
async fn clicking_on_the_confirmation_link_confirms_a_subscriber() {
    // arrange
    let app = spawn_app().await;
    let links = app.subscribe("ursula_le_guin@gmail.com", "Kyiv", "daily").await;

    // act
    app.get(&links.confirm).await;

    // assert
    let users = app.store.users();
    assert_eq!(users[0].email, "ursula_le_guin@gmail.com");
    assert!(users[0].is_confirmed);
    assert_eq!(app.store.tokens().len(), 1);
}

#[tokio::test]
async fn a_confirmation_link_works_only_once() {
    // arrange
    let app = spawn_app().await;
    let links = app.subscribe("ursula_le_guin@gmail.com", "Kyiv", "daily").await;
    app.get(&links.confirm).await;

    // act
    let response = app.get(&links.confirm).await;

    // assert
    assert_eq!(response.status().code, 404);
}

#[tokio::test]
async fn unknown_tokens_are_rejected_with_a_404() {
    // arrange
    let app = spawn_app().await;

    // act
    let response = app.get("/api/confirm/not-a-real-token").await;

    // assert
    assert_eq!(response.status().code, 404);
}

#[tokio::test]
async fn an_unsubscribe_token_cannot_confirm() {
    // arrange
    let app = spawn_app().await;
    let links = app.subscribe("ursula_le_guin@gmail.com", "Kyiv", "daily").await;
    let unsubscribe_token = links.unsubscribe.trim_start_matches("/api/unsubscribe/");

    // act
    let response = app
        .get(&format!("/api/confirm/{}", unsubscribe_token))
        .await;

    // assert
    assert_eq!(response.status().code, 400);
    assert!(!app.store.users()[0].is_confirmed);
    assert_eq!(app.store.tokens().len(), 2);
}

#[tokio::test]
async fn confirm_rejects_unsupported_methods_with_a_400() {
    // arrange
    let app = spawn_app().await;

    // act
    let post = app.client.post("/api/confirm/some-token").dispatch().await;
    let delete = app.client.delete("/api/confirm/some-token").dispatch().await;

    // assert
    assert_eq!(post.status().code, 400);
    assert_eq!(delete.status().code, 400);
}
