use serde::{Deserialize, Serialize};
use std::fmt;

/// Stable city identifier assigned by the weather provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CityId(pub u64);

impl fmt::Display for CityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A geocoding match offered to the user while they type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocationCandidate {
    pub name: String,
    pub country: String,
    pub state: Option<String>,
    pub latitude: f64,
    pub longitude: f64,
    pub display_name: String,
}

impl LocationCandidate {
    pub fn new(
        name: String,
        country: String,
        state: Option<String>,
        latitude: f64,
        longitude: f64,
    ) -> Self {
        let display_name = compose_display_name(&name, state.as_deref(), &country);
        Self { name, country, state, latitude, longitude, display_name }
    }
}

/// "name, state, country", skipping a missing or blank state.
pub fn compose_display_name(name: &str, state: Option<&str>, country: &str) -> String {
    match state.filter(|s| !s.trim().is_empty()) {
        Some(state) => format!("{name}, {state}, {country}"),
        None => format!("{name}, {country}"),
    }
}

/// Coarse weather category used to pick an icon.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConditionCategory {
    Cloud,
    Rain,
    #[default]
    Sun,
}

impl ConditionCategory {
    /// Classify a provider description. "cloud" wins over "rain"; anything
    /// else falls back to `Sun`.
    pub fn classify(description: &str) -> Self {
        if description.contains("cloud") {
            Self::Cloud
        } else if description.contains("rain") {
            Self::Rain
        } else {
            Self::Sun
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrentConditions {
    pub city_id: CityId,
    pub display_name: String,
    pub temperature_c: f64,
    pub humidity_pct: u8,
    pub wind_speed_ms: f64,
    pub description: String,
    pub category: ConditionCategory,
}

/// One raw 3-hour point from the forecast endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastSample {
    pub timestamp_secs: i64,
    pub temperature_c: f64,
    pub description: String,
}

/// The representative sample kept for a calendar day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastDayPoint {
    pub timestamp_secs: i64,
    pub temperature_c: f64,
    pub description: String,
}

impl ForecastDayPoint {
    pub fn category(&self) -> ConditionCategory {
        ConditionCategory::classify(&self.description)
    }
}

impl From<ForecastSample> for ForecastDayPoint {
    fn from(sample: ForecastSample) -> Self {
        Self {
            timestamp_secs: sample.timestamp_secs,
            temperature_c: sample.temperature_c,
            description: sample.description,
        }
    }
}

/// A city the user has added to their list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackedCity {
    pub current: CurrentConditions,
    pub forecast: Vec<ForecastDayPoint>,
}

impl TrackedCity {
    pub fn id(&self) -> CityId {
        self.current.city_id
    }
}

/// Result of a weather fetch, before the forecast is grouped by day.
#[derive(Debug, Clone, PartialEq)]
pub struct CityWeather {
    pub current: CurrentConditions,
    pub samples: Vec<ForecastSample>,
}

/// How a location is addressed on the weather endpoints.
#[derive(Debug, Clone, PartialEq)]
pub enum LocationQuery {
    Name(String),
    Coordinates { latitude: f64, longitude: f64 },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_name_includes_state_when_present() {
        let c = LocationCandidate::new(
            "Springfield".into(),
            "US".into(),
            Some("Illinois".into()),
            39.8,
            -89.6,
        );
        assert_eq!(c.display_name, "Springfield, Illinois, US");
    }

    #[test]
    fn display_name_without_state() {
        let c = LocationCandidate::new("Paris".into(), "FR".into(), None, 48.85, 2.35);
        assert_eq!(c.display_name, "Paris, FR");

        assert_eq!(compose_display_name("Paris", Some("  "), "FR"), "Paris, FR");
    }

    #[test]
    fn classify_checks_cloud_before_rain() {
        assert_eq!(ConditionCategory::classify("broken clouds"), ConditionCategory::Cloud);
        assert_eq!(ConditionCategory::classify("light rain"), ConditionCategory::Rain);
        assert_eq!(ConditionCategory::classify("rain and clouds"), ConditionCategory::Cloud);
        assert_eq!(ConditionCategory::classify("clear sky"), ConditionCategory::Sun);
        assert_eq!(ConditionCategory::classify(""), ConditionCategory::Sun);
    }

    #[test]
    fn classify_is_case_sensitive() {
        assert_eq!(ConditionCategory::classify("Clouds"), ConditionCategory::Sun);
    }
}
