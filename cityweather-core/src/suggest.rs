//! City-name suggestions while the user types.

use std::sync::Arc;

use crate::{model::LocationCandidate, provider::WeatherProvider};

/// Queries shorter than this (after trimming) never reach the network.
pub const MIN_QUERY_LEN: usize = 3;
pub const SUGGESTION_LIMIT: usize = 5;

#[derive(Debug, Clone)]
pub struct SuggestionFetcher {
    provider: Arc<dyn WeatherProvider>,
}

impl SuggestionFetcher {
    pub fn new(provider: Arc<dyn WeatherProvider>) -> Self {
        Self { provider }
    }

    /// Up to [`SUGGESTION_LIMIT`] candidates for `query`.
    ///
    /// Suggestions are advisory, so failures are logged and reported as an
    /// empty list.
    pub async fn suggest(&self, query: &str) -> Vec<LocationCandidate> {
        let query = query.trim();
        if !is_searchable(query) {
            return Vec::new();
        }

        match self.provider.geocode(query, SUGGESTION_LIMIT).await {
            Ok(mut candidates) => {
                candidates.truncate(SUGGESTION_LIMIT);
                tracing::debug!(query, count = candidates.len(), "suggestions fetched");
                candidates
            }
            Err(err) => {
                tracing::warn!(query, error = %err, "suggestion lookup failed");
                Vec::new()
            }
        }
    }
}

pub fn is_searchable(query: &str) -> bool {
    query.trim().chars().count() >= MIN_QUERY_LEN
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_queries_are_not_searchable() {
        assert!(!is_searchable(""));
        assert!(!is_searchable("  ab  "));
        assert!(!is_searchable("zü"));
        assert!(is_searchable("Rom"));
        assert!(is_searchable(" Oslo "));
    }
}
