use crate::domain::{NewSubscriber, TokenKind};
use crate::email::templates::confirmation_email;
use crate::email::Email;
use crate::links::token_url;
use crate::models::Token;
use crate::startup::ApplicationBaseUrl;
use crate::store::{StoreError, SubscriberStore, SubscriberTokens};
use anyhow::{anyhow, Context};
use std::sync::Arc;

#[derive(thiserror::Error)]
pub enum SubscriptionError {
    #[error("{0}")]
    Validation(String),
    #[error("User already exists.")]
    UserAlreadyExists,
    #[error("Duplicate {0}.")]
    Conflict(&'static str),
    #[error("Token is empty.")]
    TokenEmpty,
    #[error("Token not found.")]
    TokenNotFound,
    #[error("Invalid token type.")]
    TokenWrongType,
    #[error("Failed to send a confirmation email.")]
    ConfirmationMail(#[source] anyhow::Error),
    #[error(transparent)]
    Unexpected(#[from] anyhow::Error),
}

impl std::fmt::Debug for SubscriptionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        crate::routes::error_chain_fmt(self, f)
    }
}

/// Signup, confirmation and unsubscription of weather subscribers.
pub struct SubscriptionService {
    store: Arc<dyn SubscriberStore>,
    email_client: Arc<dyn Email>,
    base_url: ApplicationBaseUrl,
}

impl SubscriptionService {
    pub fn new(
        store: Arc<dyn SubscriberStore>,
        email_client: Arc<dyn Email>,
        base_url: ApplicationBaseUrl,
    ) -> Self {
        Self {
            store,
            email_client,
            base_url,
        }
    }

    /// Registers a new, unconfirmed subscriber and mails them both of their links.
    ///
    /// A mail failure is reported as [`SubscriptionError::ConfirmationMail`] but
    /// the subscriber stays registered.
    #[tracing::instrument(
        name = "Adding a new subscriber",
        skip(self, new_subscriber),
        fields(
            subscriber_email = %new_subscriber.email,
            subscriber_city = %new_subscriber.city.as_ref(),
            frequency = %new_subscriber.frequency
        )
    )]
    pub async fn subscribe(&self, new_subscriber: NewSubscriber) -> Result<(), SubscriptionError> {
        match self
            .store
            .find_user_by_email(new_subscriber.email.as_ref())
            .await
        {
            Ok(_) => {
                tracing::info!("User already exists");
                return Err(SubscriptionError::UserAlreadyExists);
            }
            Err(StoreError::NotFound) => {}
            Err(e) => {
                return Err(anyhow::Error::new(e)
                    .context("Failed to look up the subscriber by email.")
                    .into())
            }
        }

        let tokens = SubscriberTokens::generate();
        self.store
            .create_subscriber(&new_subscriber, &tokens)
            .await
            .map_err(|e| match e {
                StoreError::DuplicateEmail => SubscriptionError::UserAlreadyExists,
                StoreError::Duplicate(what) => SubscriptionError::Conflict(what),
                e => anyhow::Error::new(e)
                    .context("Failed to store the new subscriber.")
                    .into(),
            })?;

        let confirm_url = token_url(&self.base_url.0, TokenKind::Confirm, tokens.confirm.as_ref())
            .context("Failed to build the confirmation link.")?;
        let unsubscribe_url = token_url(
            &self.base_url.0,
            TokenKind::Unsubscribe,
            tokens.unsubscribe.as_ref(),
        )
        .context("Failed to build the unsubscribe link.")?;

        self.send_confirmation_email(&new_subscriber, confirm_url.as_str(), unsubscribe_url.as_str())
            .await
            .map_err(SubscriptionError::ConfirmationMail)
    }

    #[tracing::instrument(
        name = "Send a confirmation email to a new subscriber",
        skip_all
    )]
    async fn send_confirmation_email(
        &self,
        new_subscriber: &NewSubscriber,
        confirm_url: &str,
        unsubscribe_url: &str,
    ) -> anyhow::Result<()> {
        let email = confirmation_email(confirm_url, unsubscribe_url);
        self.email_client
            .send_email(&new_subscriber.email, &email.subject, &email.html, &email.text)
            .await
    }

    /// Consumes a confirm token and marks its owner as confirmed.
    #[tracing::instrument(name = "Confirm a pending subscriber", skip(self, token_value))]
    pub async fn confirm(&self, token_value: &str) -> Result<(), SubscriptionError> {
        let token = self.token_of_kind(token_value, TokenKind::Confirm).await?;
        self.store
            .confirm_user(&token)
            .await
            .map_err(|e| consumption_error(e, "Failed to confirm the subscriber."))
    }

    /// Consumes an unsubscribe token and deletes its owner with all dependent records.
    #[tracing::instrument(name = "Remove a subscriber", skip(self, token_value))]
    pub async fn unsubscribe(&self, token_value: &str) -> Result<(), SubscriptionError> {
        let token = self.token_of_kind(token_value, TokenKind::Unsubscribe).await?;
        self.store
            .delete_subscriber(&token)
            .await
            .map_err(|e| consumption_error(e, "Failed to delete the subscriber."))
    }

    /// A mismatching token is left untouched so it stays usable for its own purpose.
    async fn token_of_kind(
        &self,
        token_value: &str,
        kind: TokenKind,
    ) -> Result<Token, SubscriptionError> {
        if token_value.is_empty() {
            return Err(SubscriptionError::TokenEmpty);
        }
        let token = self
            .store
            .find_token(token_value)
            .await
            .map_err(|e| match e {
                StoreError::NotFound => SubscriptionError::TokenNotFound,
                e => anyhow::Error::new(e)
                    .context("Failed to retrieve the token.")
                    .into(),
            })?;
        match TokenKind::try_from(token.token_type.clone()) {
            Ok(token_kind) if token_kind == kind => Ok(token),
            Ok(_) => Err(SubscriptionError::TokenWrongType),
            Err(e) => Err(anyhow!(e).context("Stored token has an unknown type.").into()),
        }
    }
}

fn consumption_error(e: StoreError, context: &'static str) -> SubscriptionError {
    match e {
        StoreError::NotFound => SubscriptionError::TokenNotFound,
        e => anyhow::Error::new(e).context(context).into(),
    }
}
