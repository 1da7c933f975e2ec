use crate::configuration::EmailClientSettings;
use crate::domain::SubscriberEmail;
use crate::email::Email;
use anyhow::{anyhow, Context};
use async_trait::async_trait;
use aws_config::TimeoutConfig;
use aws_sdk_sesv2 as ses;
use aws_sdk_sesv2::model::{Body, Content, Destination, EmailContent, Message};

pub struct SesEmailClient {
    ses_client: ses::Client,
    sender: SubscriberEmail,
}

impl SesEmailClient {
    pub fn new(ses_client: ses::Client, sender: SubscriberEmail) -> Self {
        Self { ses_client, sender }
    }

    /// Loads AWS credentials and region from the environment.
    pub async fn from_settings(settings: &EmailClientSettings) -> anyhow::Result<Self> {
        let sender = settings
            .sender()
            .map_err(|e| anyhow!(e).context("Invalid sender email address."))?;
        let timeout_config = TimeoutConfig::new().with_api_call_timeout(Some(settings.timeout()));
        let shared_config = aws_config::from_env()
            .timeout_config(timeout_config)
            .load()
            .await;
        Ok(Self::new(ses::Client::new(&shared_config), sender))
    }
}

fn utf8(data: &str) -> Content {
    Content::builder().data(data).charset("UTF-8").build()
}

#[async_trait]
impl Email for SesEmailClient {
    #[tracing::instrument(
        name = "Send an email through SES",
        skip_all,
        fields(recipient = %recipient, subject = %subject, message_id = tracing::field::Empty)
    )]
    async fn send_email(
        &self,
        recipient: &SubscriberEmail,
        subject: &str,
        html_content: &str,
        text_content: &str,
    ) -> anyhow::Result<()> {
        let message = Message::builder()
            .subject(utf8(subject))
            .body(
                Body::builder()
                    .html(utf8(html_content))
                    .text(utf8(text_content))
                    .build(),
            )
            .build();

        let output = self
            .ses_client
            .send_email()
            .from_email_address(self.sender.as_ref())
            .destination(
                Destination::builder()
                    .to_addresses(recipient.as_ref())
                    .build(),
            )
            .content(EmailContent::builder().simple(message).build())
            .send()
            .await
            .with_context(|| format!("SES rejected the email to {}.", recipient))?;

        if let Some(message_id) = output.message_id() {
            tracing::Span::current().record("message_id", &message_id);
        }
        Ok(())
    }
}
