//! Core library for the `cityweather` CLI.
//!
//! This crate defines:
//! - Configuration & credentials handling
//! - The OpenWeather provider behind a `WeatherProvider` trait
//! - The search pipeline: debounced suggestions, weather fetch, daily
//!   forecast grouping and the tracked-city store
//!
//! It is used by `cityweather-cli`, but any front end can drive a
//! [`CityTracker`] and render its [`AppState`] snapshots.

pub mod config;
pub mod debounce;
pub mod error;
pub mod forecast;
pub mod model;
pub mod provider;
pub mod store;
pub mod suggest;
pub mod tracker;
pub mod weather;

pub use config::{Config, Theme};
pub use debounce::Debouncer;
pub use error::TrackerError;
pub use forecast::{daily_forecast, daily_forecast_local};
pub use model::{
    CityId, CityWeather, ConditionCategory, CurrentConditions, ForecastDayPoint, ForecastSample,
    LocationCandidate, LocationQuery, TrackedCity,
};
pub use provider::{WeatherProvider, openweather::OpenWeatherProvider, provider_from_config};
pub use store::{AppState, CityList, Store};
pub use suggest::SuggestionFetcher;
pub use tracker::CityTracker;
pub use weather::WeatherFetcher;
