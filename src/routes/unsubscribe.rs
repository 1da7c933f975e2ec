use crate::services::{SubscriptionError, SubscriptionService};
use rocket::State;

#[get("/api/unsubscribe/<token>")]
pub async fn unsubscribe_subscriber(
    token: &str,
    subscriptions: &State<SubscriptionService>,
) -> Result<(), SubscriptionError> {
    subscriptions.unsubscribe(token).await
}

#[get("/api/unsubscribe/")]
pub async fn unsubscribe_empty_token(
    subscriptions: &State<SubscriptionService>,
) -> Result<(), SubscriptionError> {
    subscriptions.unsubscribe("").await
}
