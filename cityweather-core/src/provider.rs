use async_trait::async_trait;
use std::{fmt::Debug, sync::Arc};

use crate::{
    Config,
    error::{Result, TrackerError},
    model::{CurrentConditions, ForecastSample, LocationCandidate, LocationQuery},
    provider::openweather::OpenWeatherProvider,
};

pub mod openweather;

/// Upstream weather and geocoding source.
#[async_trait]
pub trait WeatherProvider: Send + Sync + Debug {
    /// Raw geocoding lookup, at most `limit` matches.
    async fn geocode(&self, query: &str, limit: usize) -> Result<Vec<LocationCandidate>>;

    async fn current(&self, location: &LocationQuery) -> Result<CurrentConditions>;

    async fn forecast(&self, location: &LocationQuery) -> Result<Vec<ForecastSample>>;
}

/// Construct the OpenWeather provider from config.
pub fn provider_from_config(config: &Config) -> Result<Arc<dyn WeatherProvider>> {
    let api_key = config.resolved_api_key().ok_or(TrackerError::MissingApiKey)?;
    let provider = OpenWeatherProvider::from_config(api_key, config)?;
    Ok(Arc::new(provider))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn provider_from_config_errors_when_missing_api_key() {
        if std::env::var(crate::config::API_KEY_ENV).is_ok() {
            return;
        }
        let cfg = Config::default();
        let err = provider_from_config(&cfg).unwrap_err();
        assert!(matches!(err, TrackerError::MissingApiKey));
    }

    #[test]
    fn provider_from_config_works_when_configured() {
        let mut cfg = Config::default();
        cfg.set_api_key("KEY".to_string());

        assert!(provider_from_config(&cfg).is_ok());
    }
}
