//! Error kinds for the search-and-track pipeline.

use thiserror::Error;

use crate::model::CityId;

pub const DUPLICATE_CITY_MESSAGE: &str = "City already added to the list";
pub const FETCH_FAILED_MESSAGE: &str = "City not found or API error. Please try again.";

#[derive(Error, Debug)]
pub enum TrackerError {
    /// Non-success `cod` or an unreadable payload from the provider.
    #[error("Upstream error: {0}")]
    Upstream(String),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("City {0} is already tracked")]
    DuplicateCity(CityId),

    #[error(
        "No API key configured.\n\
         Hint: run `cityweather configure` or set CITYWEATHER_API_KEY."
    )]
    MissingApiKey,
}

impl TrackerError {
    /// Text shown to the user. Upstream and network failures look the same.
    pub fn user_message(&self) -> String {
        match self {
            Self::Upstream(_) | Self::Network(_) => FETCH_FAILED_MESSAGE.to_string(),
            Self::DuplicateCity(_) => DUPLICATE_CITY_MESSAGE.to_string(),
            Self::MissingApiKey => self.to_string(),
        }
    }

    pub fn is_duplicate(&self) -> bool {
        matches!(self, Self::DuplicateCity(_))
    }
}

pub type Result<T, E = TrackerError> = std::result::Result<T, E>;
