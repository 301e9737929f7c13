use crate::{Config, FetchError, WeatherReading};
use async_trait::async_trait;
use std::fmt::Debug;

pub mod openweather;

pub use openweather::OpenWeatherProvider;

#[async_trait]
pub trait WeatherProvider: Send + Sync + Debug {
    /// Current conditions for `city`, or the reason there are none.
    async fn current(&self, city: &str) -> Result<WeatherReading, FetchError>;
}

/// Construct the OpenWeather provider from config and an already-resolved API key.
pub fn provider_from_config(
    config: &Config,
    api_key: String,
) -> anyhow::Result<Box<dyn WeatherProvider>> {
    let provider = OpenWeatherProvider::new(api_key, config.api.clone(), &config.http)?;
    Ok(Box::new(provider))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn provider_from_config_builds_with_defaults() {
        let cfg = Config::default();
        let provider = provider_from_config(&cfg, "KEY".to_string());
        assert!(provider.is_ok());
    }

    #[test]
    fn provider_from_config_rejects_bad_base_url() {
        let mut cfg = Config::default();
        cfg.api.base_url = "not a url".to_string();

        let err = provider_from_config(&cfg, "KEY".to_string()).unwrap_err();
        assert!(err.to_string().contains("Invalid OpenWeather base URL"));
    }
}
