use weather_subscriptions::configuration::get_configuration;
use weather_subscriptions::startup::Application;
use weather_subscriptions::telemetry::{get_subscriber, init_subscriber};

#[rocket::main]
async fn main() -> anyhow::Result<()> {
    let subscriber = get_subscriber(
        "weather_subscriptions".into(),
        "info".into(),
        std::io::stdout,
    );
    init_subscriber(subscriber);

    let configuration = get_configuration().expect("Failed to read configuration.");
    let application = Application::build(&configuration).await?;
    application.run_until_stopped().await?;
    Ok(())
}
