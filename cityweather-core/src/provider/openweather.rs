use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, de::DeserializeOwned};

use crate::{
    Config,
    error::{Result, TrackerError},
    model::{
        CityId, ConditionCategory, CurrentConditions, ForecastSample, LocationCandidate,
        LocationQuery,
    },
};

use super::WeatherProvider;

#[derive(Debug, Clone)]
pub struct OpenWeatherProvider {
    api_key: String,
    geocoding_base: String,
    weather_base: String,
    http: Client,
}

impl OpenWeatherProvider {
    pub fn new(api_key: String) -> Self {
        let defaults = Config::default();
        Self {
            api_key,
            geocoding_base: defaults.geocoding_base,
            weather_base: defaults.weather_base,
            http: Client::new(),
        }
    }

    pub fn from_config(api_key: String, config: &Config) -> Result<Self> {
        let mut builder = Client::builder();
        if let Some(timeout) = config.request_timeout() {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            api_key,
            geocoding_base: trim_base(&config.geocoding_base),
            weather_base: trim_base(&config.weather_base),
            http: builder.build()?,
        })
    }

    /// Override the endpoint bases, e.g. to target a mock server.
    pub fn with_base_urls(mut self, geocoding_base: &str, weather_base: &str) -> Self {
        self.geocoding_base = trim_base(geocoding_base);
        self.weather_base = trim_base(weather_base);
        self
    }

    fn location_params(&self, location: &LocationQuery) -> Vec<(&'static str, String)> {
        let mut params = match location {
            LocationQuery::Name(name) => vec![("q", name.clone())],
            LocationQuery::Coordinates { latitude, longitude } => {
                vec![("lat", latitude.to_string()), ("lon", longitude.to_string())]
            }
        };
        params.push(("units", "metric".to_string()));
        params.push(("appid", self.api_key.clone()));
        params
    }

    /// GET `url`, returning the status and body text.
    async fn get_text(&self, url: &str, params: &[(&str, String)]) -> Result<(StatusCode, String)> {
        tracing::debug!(%url, "OpenWeather request");

        let res = self.http.get(url).query(params).send().await?;
        let status = res.status();
        let body = res.text().await?;

        Ok((status, body))
    }
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum OwCod {
    Number(i64),
    Text(String),
}

impl OwCod {
    fn code(&self) -> Option<i64> {
        match self {
            OwCod::Number(n) => Some(*n),
            OwCod::Text(s) => s.trim().parse().ok(),
        }
    }
}

/// Fields OpenWeather puts on both success and error bodies.
#[derive(Debug, Default, Deserialize)]
struct OwEnvelope {
    cod: Option<OwCod>,
    message: Option<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
struct OwGeoResult {
    name: String,
    country: String,
    state: Option<String>,
    lat: f64,
    lon: f64,
}

#[derive(Debug, Deserialize)]
struct OwMain {
    temp: f64,
    #[serde(default)]
    humidity: u8,
}

#[derive(Debug, Deserialize)]
struct OwWeather {
    description: String,
}

#[derive(Debug, Deserialize)]
struct OwWind {
    speed: f64,
}

#[derive(Debug, Deserialize)]
struct OwCurrentResponse {
    id: u64,
    name: String,
    main: OwMain,
    weather: Vec<OwWeather>,
    wind: OwWind,
}

#[derive(Debug, Deserialize)]
struct OwForecastEntry {
    dt: i64,
    main: OwMain,
    weather: Vec<OwWeather>,
}

#[derive(Debug, Deserialize)]
struct OwForecastResponse {
    list: Vec<OwForecastEntry>,
}

#[async_trait]
impl WeatherProvider for OpenWeatherProvider {
    async fn geocode(&self, query: &str, limit: usize) -> Result<Vec<LocationCandidate>> {
        let url = format!("{}/direct", self.geocoding_base);
        let params = [
            ("q", query.to_string()),
            ("limit", limit.to_string()),
            ("appid", self.api_key.clone()),
        ];

        let (status, body) = self.get_text(&url, &params).await?;
        if !status.is_success() {
            return Err(upstream_failure("geocoding", status, &body));
        }

        let results: Vec<OwGeoResult> = parse_body("geocoding", &body)?;

        Ok(results
            .into_iter()
            .take(limit)
            .map(|r| LocationCandidate::new(r.name, r.country, r.state, r.lat, r.lon))
            .collect())
    }

    async fn current(&self, location: &LocationQuery) -> Result<CurrentConditions> {
        let url = format!("{}/weather", self.weather_base);
        let (status, body) = self.get_text(&url, &self.location_params(location)).await?;

        let envelope: OwEnvelope = serde_json::from_str(&body).unwrap_or_default();
        let cod = envelope.cod.as_ref().and_then(OwCod::code);
        if cod != Some(200) || !status.is_success() {
            return Err(match envelope.message {
                Some(message) => TrackerError::Upstream(message_text(message)),
                None => upstream_failure("current weather", status, &body),
            });
        }

        let parsed: OwCurrentResponse = parse_body("current weather", &body)?;
        let description = first_description(&parsed.weather);

        Ok(CurrentConditions {
            city_id: CityId(parsed.id),
            display_name: parsed.name,
            temperature_c: parsed.main.temp,
            humidity_pct: parsed.main.humidity,
            wind_speed_ms: parsed.wind.speed,
            category: ConditionCategory::classify(&description),
            description,
        })
    }

    async fn forecast(&self, location: &LocationQuery) -> Result<Vec<ForecastSample>> {
        let url = format!("{}/forecast", self.weather_base);
        let (status, body) = self.get_text(&url, &self.location_params(location)).await?;

        if !status.is_success() {
            return Err(upstream_failure("forecast", status, &body));
        }

        let parsed: OwForecastResponse = parse_body("forecast", &body)?;

        Ok(parsed
            .list
            .into_iter()
            .map(|entry| ForecastSample {
                timestamp_secs: entry.dt,
                temperature_c: entry.main.temp,
                description: first_description(&entry.weather),
            })
            .collect())
    }
}

fn parse_body<T: DeserializeOwned>(what: &str, body: &str) -> Result<T> {
    serde_json::from_str(body).map_err(|e| {
        TrackerError::Upstream(format!("Failed to parse OpenWeather {what} JSON: {e}"))
    })
}

fn upstream_failure(what: &str, status: StatusCode, body: &str) -> TrackerError {
    TrackerError::Upstream(format!(
        "OpenWeather {what} request failed with status {status}: {}",
        truncate_body(body)
    ))
}

fn message_text(message: serde_json::Value) -> String {
    match message {
        serde_json::Value::String(s) => s,
        other => other.to_string(),
    }
}

fn first_description(weather: &[OwWeather]) -> String {
    weather
        .first()
        .map(|w| w.description.clone())
        .unwrap_or_else(|| "unknown".to_string())
}

fn trim_base(base: &str) -> String {
    base.trim_end_matches('/').to_string()
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    match body.char_indices().nth(MAX) {
        Some((cut, _)) => format!("{}...", &body[..cut]),
        None => body.to_string(),
    }
}
