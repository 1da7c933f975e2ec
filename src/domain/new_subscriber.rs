use crate::domain::{City, Frequency, SubscriberEmail};

pub struct NewSubscriber {
    pub email: SubscriberEmail,
    pub city: City,
    pub frequency: Frequency,
}
