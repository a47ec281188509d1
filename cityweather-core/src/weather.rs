//! Current conditions plus raw forecast for a chosen location.

use std::sync::Arc;

use crate::{
    error::Result,
    model::{CityWeather, LocationCandidate, LocationQuery},
    provider::WeatherProvider,
};

#[derive(Debug, Clone)]
pub struct WeatherFetcher {
    provider: Arc<dyn WeatherProvider>,
}

impl WeatherFetcher {
    pub fn new(provider: Arc<dyn WeatherProvider>) -> Self {
        Self { provider }
    }

    /// Fetch by coordinates. The candidate's display name replaces the
    /// provider's station name when one is given.
    pub async fn fetch(
        &self,
        latitude: f64,
        longitude: f64,
        candidate: Option<&LocationCandidate>,
    ) -> Result<CityWeather> {
        let location = LocationQuery::Coordinates { latitude, longitude };
        let mut weather = self.fetch_location(&location).await?;

        if let Some(candidate) = candidate.filter(|c| !c.display_name.is_empty()) {
            weather.current.display_name = candidate.display_name.clone();
        }

        Ok(weather)
    }

    pub async fn fetch_candidate(&self, candidate: &LocationCandidate) -> Result<CityWeather> {
        self.fetch(candidate.latitude, candidate.longitude, Some(candidate)).await
    }

    /// Fetch by free-text city name, keeping the provider's name.
    pub async fn fetch_by_name(&self, name: &str) -> Result<CityWeather> {
        self.fetch_location(&LocationQuery::Name(name.trim().to_string())).await
    }

    // Current first: a failure there skips the forecast request entirely.
    async fn fetch_location(&self, location: &LocationQuery) -> Result<CityWeather> {
        let current = self.provider.current(location).await?;
        let samples = self.provider.forecast(location).await?;

        tracing::debug!(
            city_id = %current.city_id,
            samples = samples.len(),
            "weather fetched"
        );

        Ok(CityWeather { current, samples })
    }
}
