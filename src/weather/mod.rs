mod cache;
mod open_weather;

use async_trait::async_trait;
pub use cache::CachedWeatherProvider;
pub use open_weather::OpenWeatherClient;

#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct WeatherData {
    pub temperature: f64,
    pub humidity: u32,
    pub description: String,
}

#[async_trait]
pub trait WeatherProvider: Send + Sync {
    async fn current_weather(&self, city: &str) -> Result<WeatherData, WeatherError>;
}

#[derive(thiserror::Error)]
pub enum WeatherError {
    #[error("City {0} was not found.")]
    CityNotFound(String),
    #[error(transparent)]
    Unexpected(#[from] anyhow::Error),
}

impl std::fmt::Debug for WeatherError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        crate::routes::error_chain_fmt(self, f)
    }
}
