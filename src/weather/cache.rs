use crate::weather::{WeatherData, WeatherError, WeatherProvider};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::RwLock;
use std::time::{Duration, Instant};

struct CacheEntry {
    data: WeatherData,
    expires_at: Instant,
}

/// Remembers successful lookups per city for `ttl`. Failures are never cached.
pub struct CachedWeatherProvider<P> {
    inner: P,
    ttl: Duration,
    entries: RwLock<HashMap<String, CacheEntry>>,
}

impl<P: WeatherProvider> CachedWeatherProvider<P> {
    pub fn new(inner: P, ttl: Duration) -> Self {
        Self {
            inner,
            ttl,
            entries: RwLock::new(HashMap::new()),
        }
    }

    fn cached(&self, key: &str) -> Option<WeatherData> {
        let entries = self.entries.read().ok()?;
        entries
            .get(key)
            .filter(|entry| entry.expires_at > Instant::now())
            .map(|entry| entry.data.clone())
    }
}

#[async_trait]
impl<P: WeatherProvider> WeatherProvider for CachedWeatherProvider<P> {
    async fn current_weather(&self, city: &str) -> Result<WeatherData, WeatherError> {
        let key = city.to_lowercase();
        if let Some(data) = self.cached(&key) {
            tracing::debug!(city, "Weather cache hit");
            return Ok(data);
        }

        let data = self.inner.current_weather(city).await?;
        if let Ok(mut entries) = self.entries.write() {
            entries.retain(|_, entry| entry.expires_at > Instant::now());
            entries.insert(
                key,
                CacheEntry {
                    data: data.clone(),
                    expires_at: Instant::now() + self.ttl,
                },
            );
        }
        Ok(data)
    }
}
