mod city;
mod frequency;
mod new_subscriber;
mod subscriber_email;
mod subscription_token;

pub use city::City;
pub use frequency::Frequency;
pub use new_subscriber::NewSubscriber;
pub use subscriber_email::SubscriberEmail;
pub use subscription_token::{SubscriptionToken, TokenKind};
