use crate::domain::{City, Frequency, NewSubscriber, SubscriberEmail};
use crate::services::{SubscriptionError, SubscriptionService};
use rocket::form::Form;
use rocket::State;

#[derive(FromForm)]
pub struct FormData {
    email: String,
    city: String,
    frequency: String,
}

impl TryFrom<FormData> for NewSubscriber {
    type Error = String;

    fn try_from(form: FormData) -> Result<Self, Self::Error> {
        let email = SubscriberEmail::parse(form.email)?;
        let city = City::parse(form.city)?;
        let frequency = Frequency::try_from(form.frequency)?;
        Ok(NewSubscriber {
            email,
            city,
            frequency,
        })
    }
}

#[post("/api/subscribe", data = "<form>")]
pub async fn subscribe(
    form: Form<FormData>,
    subscriptions: &State<SubscriptionService>,
) -> Result<(), SubscriptionError> {
    let new_subscriber =
        NewSubscriber::try_from(form.into_inner()).map_err(SubscriptionError::Validation)?;
    subscriptions.subscribe(new_subscriber).await
}
