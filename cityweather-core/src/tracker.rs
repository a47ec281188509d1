//! Drives search → fetch → aggregate → store for the presentation layer.
//!
//! The tracker owns the loading flags and the user-facing error message:
//! `search_loading` brackets every suggestion lookup and `loading` brackets
//! every weather fetch, and both are cleared whether or not the request
//! succeeded.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use tokio::sync::watch;

use crate::{
    Config,
    debounce::Debouncer,
    error::Result,
    forecast::daily_forecast_local,
    model::{CityId, CityWeather, LocationCandidate},
    provider::WeatherProvider,
    store::{AppState, Store},
    suggest::{SuggestionFetcher, is_searchable},
    weather::WeatherFetcher,
};

/// Suggestion lookup, cloned into each debounced task.
#[derive(Debug, Clone)]
struct SuggestionLookup {
    fetcher: SuggestionFetcher,
    store: Store,
    /// Number of the most recently issued lookup.
    latest: Arc<AtomicU64>,
}

impl SuggestionLookup {
    /// Claim the next sequence number; every lookup issued earlier is stale.
    fn issue(&self) -> u64 {
        self.latest.fetch_add(1, Ordering::SeqCst) + 1
    }

    fn is_latest(&self, seq: u64) -> bool {
        self.latest.load(Ordering::SeqCst) == seq
    }

    async fn run(&self, query: String, seq: u64) {
        if !self.is_latest(seq) {
            return;
        }
        self.store.update(|s| s.search_loading = true);
        let suggestions = self.fetcher.suggest(&query).await;

        // A newer lookup owns the flag and the list; it clears both when done.
        if !self.is_latest(seq) {
            tracing::debug!(%query, seq, "discarding stale suggestions");
            return;
        }

        self.store.update(|s| {
            s.suggestions = suggestions;
            s.search_loading = false;
        });
    }
}

#[derive(Debug)]
pub struct CityTracker {
    weather: WeatherFetcher,
    lookup: SuggestionLookup,
    store: Store,
    debouncer: Mutex<Debouncer>,
}

impl CityTracker {
    /// Must be called from within a tokio runtime.
    pub fn new(provider: Arc<dyn WeatherProvider>, debounce: Duration) -> Self {
        let store = Store::default();
        Self {
            weather: WeatherFetcher::new(provider.clone()),
            lookup: SuggestionLookup {
                fetcher: SuggestionFetcher::new(provider),
                store: store.clone(),
                latest: Arc::new(AtomicU64::new(0)),
            },
            store,
            debouncer: Mutex::new(Debouncer::new(debounce)),
        }
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        let provider = crate::provider::provider_from_config(config)?;
        Ok(Self::new(provider, config.debounce_interval()))
    }

    pub fn store(&self) -> &Store {
        &self.store
    }

    pub fn snapshot(&self) -> AppState {
        self.store.snapshot()
    }

    pub fn subscribe(&self) -> watch::Receiver<AppState> {
        self.store.subscribe()
    }

    /// Record new query text and debounce a suggestion lookup for it.
    ///
    /// Text too short to search clears the suggestions right away.
    pub fn set_query(&self, text: &str) {
        let text = text.to_string();
        let searchable = is_searchable(&text);

        self.store.update_if(|s| {
            let changed = s.query != text;
            s.query.clone_from(&text);
            if !searchable && !s.suggestions.is_empty() {
                s.suggestions.clear();
                return true;
            }
            changed
        });

        // Responses for any earlier text no longer match the query.
        let seq = self.lookup.issue();
        let mut debouncer = self.debouncer();
        if !searchable {
            debouncer.cancel();
            self.store.update_if(|s| std::mem::replace(&mut s.search_loading, false));
            return;
        }

        let lookup = self.lookup.clone();
        debouncer.schedule(async move { lookup.run(text, seq).await });
    }

    /// Undebounced lookup, applied to the store like a debounced one.
    pub async fn lookup_suggestions(&self, query: &str) -> Vec<LocationCandidate> {
        let seq = self.lookup.issue();
        self.lookup.run(query.to_string(), seq).await;
        self.store.read(|s| s.suggestions.clone())
    }

    /// Fetch weather for a chosen suggestion and track it.
    pub async fn add_candidate(&self, candidate: &LocationCandidate) -> Result<CityId> {
        self.begin_fetch();
        let fetched = self.weather.fetch_candidate(candidate).await;
        self.finish_fetch(fetched)
    }

    /// Fetch weather by free-text city name and track it. Blank names are
    /// ignored and yield `Ok(None)`.
    pub async fn add_city_by_name(&self, name: &str) -> Result<Option<CityId>> {
        if name.trim().is_empty() {
            return Ok(None);
        }

        self.begin_fetch();
        let fetched = self.weather.fetch_by_name(name).await;
        self.finish_fetch(fetched).map(Some)
    }

    pub fn remove(&self, id: CityId) -> bool {
        self.store.remove(id)
    }

    pub fn toggle_expand(&self, id: CityId) {
        self.store.toggle_expand(id);
    }

    fn debouncer(&self) -> MutexGuard<'_, Debouncer> {
        self.debouncer.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn begin_fetch(&self) {
        self.store.update(|s| {
            s.loading = true;
            s.error = None;
        });
    }

    fn finish_fetch(&self, fetched: Result<CityWeather>) -> Result<CityId> {
        let outcome = fetched.and_then(|CityWeather { current, samples }| {
            let id = current.city_id;
            let forecast = daily_forecast_local(&samples);
            self.store.add(current, forecast).map(|()| id)
        });

        if outcome.is_ok() {
            // Lookups pending or in flight belong to the search that just ended.
            self.debouncer().cancel();
            self.lookup.issue();
        }

        self.store.update(|s| {
            s.loading = false;
            match &outcome {
                Ok(_) => {
                    s.clear_search();
                    s.search_loading = false;
                }
                Err(err) => s.error = Some(err.user_message()),
            }
        });

        if let Err(err) = &outcome {
            tracing::warn!(error = %err, "failed to add city");
        }
        outcome
    }
}
