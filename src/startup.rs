use crate::catchers::*;
use crate::configuration::Settings;
use crate::email::{Email, SesEmailClient};
use crate::routes::*;
use crate::services::SubscriptionService;
use crate::store::{run_migrations, PgSubscriberStore, SubscriberStore};
use crate::weather::{CachedWeatherProvider, OpenWeatherClient, WeatherProvider};
use rocket::{Build, Config, Rocket};
use std::sync::Arc;

/// Public URL prefix of the API, used to build links sent by email.
#[derive(Debug, Clone)]
pub struct ApplicationBaseUrl(pub String);

pub struct Application {
    server: Rocket<Build>,
}

impl Application {
    pub async fn build(configuration: &Settings) -> Result<Application, anyhow::Error> {
        let store = PgSubscriberStore::connect_lazy(&configuration.database);
        run_migrations(&store).await?;

        let email_client = SesEmailClient::from_settings(&configuration.email_client).await?;
        let weather_provider = CachedWeatherProvider::new(
            OpenWeatherClient::from_settings(&configuration.weather_client)?,
            configuration.weather_client.cache_ttl(),
        );

        let subscriptions = SubscriptionService::new(
            Arc::new(store) as Arc<dyn SubscriberStore>,
            Arc::new(email_client) as Arc<dyn Email>,
            ApplicationBaseUrl(configuration.application.base_url.clone()),
        );
        let rocket_config = Config {
            address: configuration.application.host,
            port: configuration.application.port.unwrap_or(0),
            ..Config::release_default()
        };

        Ok(Application {
            server: build_rocket(rocket_config, subscriptions, Arc::new(weather_provider)),
        })
    }

    pub async fn run_until_stopped(self) -> Result<(), rocket::Error> {
        self.server.launch().await.map(|_| ())
    }
}

pub fn build_rocket(
    config: Config,
    subscriptions: SubscriptionService,
    weather_provider: Arc<dyn WeatherProvider>,
) -> Rocket<Build> {
    rocket::custom(config)
        .manage(subscriptions)
        .manage(weather_provider)
        .mount(
            "/",
            routes![
                health,
                subscribe,
                confirm,
                confirm_empty_token,
                unsubscribe_subscriber,
                unsubscribe_empty_token,
                current_weather,
                subscribe_get,
                subscribe_put,
                subscribe_delete,
                subscribe_patch,
                confirm_post,
                confirm_put,
                confirm_delete,
                confirm_patch,
                unsubscribe_post,
                unsubscribe_put,
                unsubscribe_delete,
                unsubscribe_patch,
                weather_post,
                weather_put,
                weather_delete,
                weather_patch,
            ],
        )
        .register("/", catchers![unprocessable_entity_to_bad_request])
}
