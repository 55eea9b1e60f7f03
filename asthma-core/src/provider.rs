use crate::{AirQualitySample, Config, WeatherReading, provider::openweather::OpenWeatherProvider};
use async_trait::async_trait;
use std::fmt::Debug;
use tracing::warn;

pub mod openweather;

/// Source of current outdoor conditions for a fixed location.
///
/// Both operations degrade malformed payloads to missing data instead of
/// failing; only transport-level problems are returned as errors.
#[async_trait]
pub trait ConditionsProvider: Send + Sync + Debug {
    /// Current weather. An upstream payload without usable data yields an
    /// empty [`WeatherReading`].
    async fn fetch_weather(&self) -> anyhow::Result<WeatherReading>;

    /// Current air pollution. `None` when the upstream payload carries no
    /// sample list at all.
    async fn fetch_air_quality(&self) -> anyhow::Result<Option<AirQualitySample>>;
}

/// Construct the provider for the configured location.
pub fn provider_from_config(config: &Config) -> anyhow::Result<Box<dyn ConditionsProvider>> {
    config.validate()?;

    let api_key = config.resolve_api_key().unwrap_or_else(|| {
        warn!(
            "No OpenWeather API key configured; requests will be rejected upstream. \
             Set {} or run `asthma-risk configure`.",
            crate::config::API_KEY_ENV
        );
        String::new()
    });

    Ok(Box::new(OpenWeatherProvider::new(api_key, config.location.clone())))
}
