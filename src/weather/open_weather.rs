use crate::configuration::WeatherClientSettings;
use crate::weather::{WeatherData, WeatherError, WeatherProvider};
use anyhow::{anyhow, Context};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use secrecy::{ExposeSecret, Secret};

/// Client for OpenWeatherMap's "current weather" endpoint.
pub struct OpenWeatherClient {
    http_client: Client,
    base_url: String,
    api_key: Secret<String>,
}

#[derive(serde::Deserialize)]
struct CurrentWeatherResponse {
    main: MainReadings,
    weather: Vec<Condition>,
}

#[derive(serde::Deserialize)]
struct MainReadings {
    temp: f64,
    humidity: u32,
}

#[derive(serde::Deserialize)]
struct Condition {
    description: String,
}

impl OpenWeatherClient {
    pub fn new(http_client: Client, base_url: String, api_key: Secret<String>) -> Self {
        Self {
            http_client,
            base_url,
            api_key,
        }
    }

    pub fn from_settings(settings: &WeatherClientSettings) -> anyhow::Result<Self> {
        let http_client = Client::builder()
            .timeout(settings.timeout())
            .build()
            .context("Failed to build the weather HTTP client.")?;
        Ok(Self::new(
            http_client,
            settings.base_url.clone(),
            settings.api_key.clone(),
        ))
    }
}

#[async_trait]
impl WeatherProvider for OpenWeatherClient {
    #[tracing::instrument(name = "Fetch current weather", skip(self))]
    async fn current_weather(&self, city: &str) -> Result<WeatherData, WeatherError> {
        let response = self
            .http_client
            .get(&self.base_url)
            .query(&[
                ("q", city),
                ("appid", self.api_key.expose_secret().as_str()),
                ("units", "metric"),
            ])
            .send()
            .await
            .context("Failed to reach the weather provider.")?;

        match response.status() {
            StatusCode::NOT_FOUND => return Err(WeatherError::CityNotFound(city.to_string())),
            status if !status.is_success() => {
                let body = response.text().await.unwrap_or_default();
                return Err(WeatherError::Unexpected(anyhow!(
                    "The weather provider answered {}: {}",
                    status,
                    body
                )));
            }
            _ => {}
        }

        let body = response
            .json::<CurrentWeatherResponse>()
            .await
            .context("The weather provider returned an invalid response body.")?;
        let condition = body
            .weather
            .into_iter()
            .next()
            .ok_or_else(|| anyhow!("The weather provider returned no conditions for {}.", city))?;

        Ok(WeatherData {
            temperature: body.main.temp,
            humidity: body.main.humidity,
            description: condition.description,
        })
    }
}
