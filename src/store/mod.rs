mod memory;
mod postgres;

use crate::domain::{Frequency, NewSubscriber, SubscriptionToken};
use crate::models::{Subscription, Token, User};
use async_trait::async_trait;
pub use memory::InMemorySubscriberStore;
pub use postgres::{run_migrations, PgSubscriberStore};

/// Persistence for users, their subscription and their one-time tokens.
///
/// Every method that writes more than one record does so atomically: either all
/// writes become visible or none do.
#[async_trait]
pub trait SubscriberStore: Send + Sync {
    async fn find_user_by_email(&self, email: &str) -> Result<User, StoreError>;

    /// Creates the user, its subscription and both tokens with one shared timestamp.
    async fn create_subscriber(
        &self,
        subscriber: &NewSubscriber,
        tokens: &SubscriberTokens,
    ) -> Result<CreatedSubscriber, StoreError>;

    async fn find_token(&self, value: &str) -> Result<Token, StoreError>;

    /// Consumes `token` and marks its owner as confirmed.
    ///
    /// Returns [`StoreError::NotFound`] if the token was consumed concurrently.
    async fn confirm_user(&self, token: &Token) -> Result<(), StoreError>;

    /// Consumes `token` and removes its owner together with every dependent record.
    ///
    /// Returns [`StoreError::NotFound`] if the token was consumed concurrently.
    async fn delete_subscriber(&self, token: &Token) -> Result<(), StoreError>;

    /// One page of confirmed subscribers for `frequency`, oldest users first.
    async fn confirmed_subscribers_batch(
        &self,
        frequency: Frequency,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<UserEmailInfo>, StoreError>;
}

pub struct SubscriberTokens {
    pub confirm: SubscriptionToken,
    pub unsubscribe: SubscriptionToken,
}

impl SubscriberTokens {
    pub fn generate() -> SubscriberTokens {
        SubscriberTokens {
            confirm: SubscriptionToken::generate(),
            unsubscribe: SubscriptionToken::generate(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct CreatedSubscriber {
    pub user: User,
    pub subscription: Subscription,
    pub tokens: Vec<Token>,
}

/// Row handed to the dispatcher: where to send, for which city, and how to opt out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserEmailInfo {
    pub email: String,
    pub city: String,
    pub token_value: String,
}

#[derive(thiserror::Error)]
pub enum StoreError {
    #[error("The requested record does not exist.")]
    NotFound,
    #[error("A user with this email address already exists.")]
    DuplicateEmail,
    #[error("Duplicate {0}.")]
    Duplicate(&'static str),
    #[error(transparent)]
    Unexpected(#[from] anyhow::Error),
}

impl std::fmt::Debug for StoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        crate::routes::error_chain_fmt(self, f)
    }
}
