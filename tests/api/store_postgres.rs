use crate::helpers::spawn_postgres_store;
use claim::{assert_ok, assert_some};
use weather_subscriptions::domain::{
    City, Frequency, NewSubscriber, SubscriberEmail, SubscriptionToken,
};
use weather_subscriptions::store::{
    PgSubscriberStore, StoreError, SubscriberStore, SubscriberTokens,
};

fn new_subscriber(email: &str, city: &str, frequency: Frequency) -> NewSubscriber {
    NewSubscriber {
        email: SubscriberEmail::parse(email.to_string()).unwrap(),
        city: City::parse(city.to_string()).unwrap(),
        frequency,
    }
}

async fn subscribe(
    store: &PgSubscriberStore,
    email: &str,
    city: &str,
    frequency: Frequency,
    confirm: bool,
) -> SubscriberTokens {
    let tokens = SubscriberTokens::generate();
    store
        .create_subscriber(&new_subscriber(email, city, frequency), &tokens)
        .await
        .unwrap();
    if confirm {
        let token = store.find_token(tokens.confirm.as_ref()).await.unwrap();
        store.confirm_user(&token).await.unwrap();
    }
    tokens
}

#[tokio::test]
async fn creating_a_subscriber_stores_the_user_and_both_tokens() {
    // arrange
    let store = spawn_postgres_store().await;
    let tokens = SubscriberTokens::generate();

    // act
    let created = store
        .create_subscriber(
            &new_subscriber("ursula_le_guin@gmail.com", "Kyiv", Frequency::Daily),
            &tokens,
        )
        .await
        .unwrap();

    // assert
    assert!(!created.user.is_confirmed);
    assert_eq!(created.subscription.city, "Kyiv");
    assert_eq!(created.subscription.frequency, "daily");
    assert_eq!(created.tokens.len(), 2);
    let confirm = store.find_token(tokens.confirm.as_ref()).await.unwrap();
    assert_eq!(confirm.token_type, "confirm");
    assert_eq!(confirm.user_id, created.user.id);
    let user = store
        .find_user_by_email("ursula_le_guin@gmail.com")
        .await
        .unwrap();
    assert_eq!(user.id, created.user.id);
}

#[tokio::test]
async fn a_duplicate_email_is_reported_as_such() {
    // arrange
    let store = spawn_postgres_store().await;
    subscribe(&store, "ursula_le_guin@gmail.com", "Kyiv", Frequency::Daily, false).await;

    // act
    let outcome = store
        .create_subscriber(
            &new_subscriber("ursula_le_guin@gmail.com", "London", Frequency::Hourly),
            &SubscriberTokens::generate(),
        )
        .await;

    // assert
    assert!(matches!(outcome, Err(StoreError::DuplicateEmail)));
}

#[tokio::test]
async fn a_colliding_token_rolls_back_the_whole_signup() {
    // arrange
    let store = spawn_postgres_store().await;
    let first = subscribe(&store, "a@example.com", "Kyiv", Frequency::Daily, false).await;

    // act
    let outcome = store
        .create_subscriber(
            &new_subscriber("b@example.com", "Kyiv", Frequency::Daily),
            &SubscriberTokens {
                confirm: SubscriptionToken::generate(),
                unsubscribe: first.unsubscribe.clone(),
            },
        )
        .await;

    // assert
    assert!(matches!(outcome, Err(StoreError::Duplicate(_))));
    assert!(matches!(
        store.find_user_by_email("b@example.com").await,
        Err(StoreError::NotFound)
    ));
}

#[tokio::test]
async fn a_confirm_token_is_consumed_exactly_once() {
    // arrange
    let store = spawn_postgres_store().await;
    let tokens = subscribe(&store, "a@example.com", "Kyiv", Frequency::Daily, false).await;
    let token = store.find_token(tokens.confirm.as_ref()).await.unwrap();

    // act
    let first = store.confirm_user(&token).await;
    let second = store.confirm_user(&token).await;

    // assert
    assert_ok!(first);
    assert!(matches!(second, Err(StoreError::NotFound)));
    assert!(store.find_user_by_email("a@example.com").await.unwrap().is_confirmed);
    assert!(matches!(
        store.find_token(tokens.confirm.as_ref()).await,
        Err(StoreError::NotFound)
    ));
}

#[tokio::test]
async fn batches_hold_confirmed_subscribers_of_one_frequency_oldest_first() {
    // arrange
    let store = spawn_postgres_store().await;
    let a = subscribe(&store, "a@example.com", "Kyiv", Frequency::Daily, true).await;
    subscribe(&store, "b@example.com", "Kyiv", Frequency::Hourly, true).await;
    subscribe(&store, "c@example.com", "Kyiv", Frequency::Daily, false).await;
    let d = subscribe(&store, "d@example.com", "London", Frequency::Daily, true).await;

    // act
    let all = store
        .confirmed_subscribers_batch(Frequency::Daily, 10, 0)
        .await
        .unwrap();
    let second_page = store
        .confirmed_subscribers_batch(Frequency::Daily, 1, 1)
        .await
        .unwrap();
    let past_the_end = store
        .confirmed_subscribers_batch(Frequency::Daily, 10, 2)
        .await
        .unwrap();

    // assert
    let emails: Vec<&str> = all.iter().map(|row| row.email.as_str()).collect();
    assert_eq!(emails, vec!["a@example.com", "d@example.com"]);
    assert_eq!(all[0].city, "Kyiv");
    assert_eq!(all[0].token_value, a.unsubscribe.as_ref());
    assert_eq!(all[1].city, "London");
    assert_eq!(all[1].token_value, d.unsubscribe.as_ref());
    assert_eq!(second_page, vec![all[1].clone()]);
    assert!(past_the_end.is_empty());
}

#[tokio::test]
async fn deleting_a_subscriber_removes_every_dependent_record() {
    // arrange
    let store = spawn_postgres_store().await;
    let tokens = subscribe(&store, "a@example.com", "Kyiv", Frequency::Daily, false).await;
    subscribe(&store, "b@example.com", "Kyiv", Frequency::Daily, true).await;
    let token = store.find_token(tokens.unsubscribe.as_ref()).await.unwrap();

    // act
    let first = store.delete_subscriber(&token).await;
    let second = store.delete_subscriber(&token).await;

    // assert
    assert_ok!(first);
    assert!(matches!(second, Err(StoreError::NotFound)));
    assert!(matches!(
        store.find_user_by_email("a@example.com").await,
        Err(StoreError::NotFound)
    ));
    assert!(matches!(
        store.find_token(tokens.confirm.as_ref()).await,
        Err(StoreError::NotFound)
    ));
    assert_some!(store
        .confirmed_subscribers_batch(Frequency::Daily, 10, 0)
        .await
        .unwrap()
        .first()
        .filter(|row| row.email == "b@example.com"));
}
