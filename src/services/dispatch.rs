use crate::domain::{Frequency, SubscriberEmail, TokenKind};
use crate::email::templates::weather_update_email;
use crate::email::Email;
use crate::links::token_url;
use crate::startup::ApplicationBaseUrl;
use crate::store::{StoreError, SubscriberStore, UserEmailInfo};
use crate::weather::{WeatherError, WeatherProvider};
use std::sync::Arc;

pub const DEFAULT_PAGE_SIZE: i64 = 100;

#[derive(thiserror::Error)]
pub enum DispatchError {
    #[error("Failed to load a batch of subscribers.")]
    BatchRetrieval(#[source] StoreError),
    #[error(transparent)]
    Weather(#[from] WeatherError),
    #[error("Stored recipient {0} is not a valid email address.")]
    InvalidRecipient(String),
    #[error("Failed to build the unsubscribe link.")]
    Link(#[source] anyhow::Error),
    #[error("Failed to send a weather update.")]
    Mail(#[source] anyhow::Error),
}

impl std::fmt::Debug for DispatchError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        crate::routes::error_chain_fmt(self, f)
    }
}

/// Sends weather updates to every confirmed subscriber of a frequency class.
pub struct WeatherDispatcher {
    store: Arc<dyn SubscriberStore>,
    weather: Arc<dyn WeatherProvider>,
    email_client: Arc<dyn Email>,
    base_url: ApplicationBaseUrl,
    page_size: i64,
}

impl WeatherDispatcher {
    pub fn new(
        store: Arc<dyn SubscriberStore>,
        weather: Arc<dyn WeatherProvider>,
        email_client: Arc<dyn Email>,
        base_url: ApplicationBaseUrl,
    ) -> Self {
        Self {
            store,
            weather,
            email_client,
            base_url,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }

    pub fn with_page_size(mut self, page_size: i64) -> Self {
        self.page_size = page_size.max(1);
        self
    }

    /// One complete sweep over the confirmed subscribers of `frequency`.
    ///
    /// A failing recipient is logged and skipped; once every page has been
    /// processed the last such failure is returned. Only a failure to load a
    /// page ends the sweep early.
    #[tracing::instrument(name = "Send weather updates", skip(self))]
    pub async fn send_weather_update(&self, frequency: Frequency) -> Result<(), DispatchError> {
        let mut offset = 0;
        let mut last_error = None;
        loop {
            let batch = self
                .store
                .confirmed_subscribers_batch(frequency, self.page_size, offset)
                .await
                .map_err(DispatchError::BatchRetrieval)?;
            if batch.is_empty() {
                break;
            }

            for entry in &batch {
                if let Err(e) = self.notify(entry).await {
                    tracing::warn!(
                        error.cause_chain = ?e,
                        city = %entry.city,
                        "Skipping a subscriber. Their weather update could not be sent",
                    );
                    last_error = Some(e);
                }
            }
            offset += self.page_size;
        }

        match last_error {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }

    async fn notify(&self, entry: &UserEmailInfo) -> Result<(), DispatchError> {
        let recipient = SubscriberEmail::parse(entry.email.clone())
            .map_err(|_| DispatchError::InvalidRecipient(entry.email.clone()))?;
        let weather = self.weather.current_weather(&entry.city).await?;
        let unsubscribe_url = token_url(&self.base_url.0, TokenKind::Unsubscribe, &entry.token_value)
            .map_err(DispatchError::Link)?;

        let email = weather_update_email(&entry.city, &weather, unsubscribe_url.as_str());
        self.email_client
            .send_email(&recipient, &email.subject, &email.html, &email.text)
            .await
            .map_err(DispatchError::Mail)
    }
}
