use crate::services::{SubscriptionError, SubscriptionService};
use rocket::State;

#[get("/api/confirm/<token>")]
pub async fn confirm(
    token: &str,
    subscriptions: &State<SubscriptionService>,
) -> Result<(), SubscriptionError> {
    subscriptions.confirm(token).await
}

/// `<token>` never matches an empty segment, so a trailing slash lands here.
#[get("/api/confirm/")]
pub async fn confirm_empty_token(
    subscriptions: &State<SubscriptionService>,
) -> Result<(), SubscriptionError> {
    subscriptions.confirm("").await
}
