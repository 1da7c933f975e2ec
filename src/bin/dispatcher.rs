use chrono::{DateTime, Timelike, Utc};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use weather_subscriptions::configuration::get_configuration;
use weather_subscriptions::domain::Frequency;
use weather_subscriptions::email::SesEmailClient;
use weather_subscriptions::scheduler;
use weather_subscriptions::services::{DispatchError, WeatherDispatcher};
use weather_subscriptions::startup::ApplicationBaseUrl;
use weather_subscriptions::store::{run_migrations, PgSubscriberStore};
use weather_subscriptions::telemetry::{get_subscriber, init_subscriber};
use weather_subscriptions::weather::{CachedWeatherProvider, OpenWeatherClient};

const TICK_INTERVAL: Duration = Duration::from_secs(60 * 60);

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let subscriber = get_subscriber("weather_dispatcher".into(), "info".into(), std::io::stdout);
    init_subscriber(subscriber);

    let configuration = get_configuration().expect("Failed to read configuration.");
    let store = PgSubscriberStore::connect_lazy(&configuration.database);
    run_migrations(&store).await?;
    let email_client = SesEmailClient::from_settings(&configuration.email_client).await?;
    let weather_provider = CachedWeatherProvider::new(
        OpenWeatherClient::from_settings(&configuration.weather_client)?,
        configuration.weather_client.cache_ttl(),
    );
    let dispatcher = Arc::new(
        WeatherDispatcher::new(
            Arc::new(store),
            Arc::new(weather_provider),
            Arc::new(email_client),
            ApplicationBaseUrl(configuration.application.base_url.clone()),
        )
        .with_page_size(configuration.dispatcher.page_size),
    );
    let daily_hour = configuration.dispatcher.daily_hour;

    let (cancel_tx, cancel_rx) = watch::channel(false);
    let scheduler = tokio::spawn(scheduler::run(TICK_INTERVAL, cancel_rx, move |tick| {
        let dispatcher = Arc::clone(&dispatcher);
        async move { dispatch_tick(&dispatcher, tick, daily_hour).await }
    }));
    tracing::info!(daily_hour, "Weather dispatcher started");

    tokio::signal::ctrl_c().await?;
    tracing::info!("Shutting down the weather dispatcher");
    let _ = cancel_tx.send(true);
    scheduler.await?;
    Ok(())
}

/// Hourly subscribers are served on every tick, daily ones alongside them once a day.
async fn dispatch_tick(dispatcher: &WeatherDispatcher, tick: DateTime<Utc>, daily_hour: u32) {
    if tick.hour() == daily_hour {
        let (hourly, daily) = tokio::join!(
            dispatcher.send_weather_update(Frequency::Hourly),
            dispatcher.send_weather_update(Frequency::Daily)
        );
        log_outcome(Frequency::Hourly, hourly);
        log_outcome(Frequency::Daily, daily);
    } else {
        log_outcome(
            Frequency::Hourly,
            dispatcher.send_weather_update(Frequency::Hourly).await,
        );
    }
}

fn log_outcome(frequency: Frequency, outcome: Result<(), DispatchError>) {
    if let Err(e) = outcome {
        tracing::error!(error.cause_chain = ?e, %frequency, "Weather update run failed");
    }
}
