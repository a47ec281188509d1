//! Tracked cities and the observable state around them.

use std::sync::Arc;

use tokio::sync::watch;

use crate::{
    error::{Result, TrackerError},
    model::{CityId, CurrentConditions, ForecastDayPoint, LocationCandidate, TrackedCity},
};

/// Ordered list of tracked cities, unique by [`CityId`], with at most one
/// expanded entry.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CityList {
    cities: Vec<TrackedCity>,
    expanded: Option<CityId>,
}

impl CityList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a city; fails if its id is already tracked.
    pub fn add(
        &mut self,
        current: CurrentConditions,
        forecast: Vec<ForecastDayPoint>,
    ) -> Result<()> {
        let id = current.city_id;
        if self.contains(id) {
            return Err(TrackerError::DuplicateCity(id));
        }

        self.cities.push(TrackedCity { current, forecast });
        Ok(())
    }

    /// Returns whether anything was removed. Absent ids are a no-op.
    pub fn remove(&mut self, id: CityId) -> bool {
        let before = self.cities.len();
        self.cities.retain(|c| c.id() != id);

        if self.expanded == Some(id) {
            self.expanded = None;
        }

        self.cities.len() != before
    }

    /// Expand `id`, or collapse it if it is already the expanded one.
    /// Expanding another city replaces the current one.
    pub fn toggle_expand(&mut self, id: CityId) {
        if self.expanded == Some(id) {
            self.expanded = None;
        } else if self.contains(id) {
            self.expanded = Some(id);
        }
    }

    pub fn cities(&self) -> &[TrackedCity] {
        &self.cities
    }

    pub fn expanded(&self) -> Option<CityId> {
        self.expanded
    }

    pub fn is_expanded(&self, id: CityId) -> bool {
        self.expanded == Some(id)
    }

    pub fn get(&self, id: CityId) -> Option<&TrackedCity> {
        self.cities.iter().find(|c| c.id() == id)
    }

    pub fn contains(&self, id: CityId) -> bool {
        self.get(id).is_some()
    }

    pub fn len(&self) -> usize {
        self.cities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cities.is_empty()
    }
}

/// Everything the presentation layer renders.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AppState {
    pub cities: CityList,
    pub query: String,
    pub suggestions: Vec<LocationCandidate>,
    /// A weather fetch is in flight.
    pub loading: bool,
    /// A suggestion lookup is in flight.
    pub search_loading: bool,
    pub error: Option<String>,
}

impl AppState {
    pub fn clear_search(&mut self) {
        self.query.clear();
        self.suggestions.clear();
    }
}

/// Shared handle to [`AppState`]. Every mutation replaces the state in one
/// step and wakes subscribers.
#[derive(Debug, Clone)]
pub struct Store {
    tx: Arc<watch::Sender<AppState>>,
}

impl Default for Store {
    fn default() -> Self {
        Self::new(AppState::default())
    }
}

impl Store {
    pub fn new(initial: AppState) -> Self {
        let (tx, _) = watch::channel(initial);
        Self { tx: Arc::new(tx) }
    }

    pub fn snapshot(&self) -> AppState {
        self.tx.borrow().clone()
    }

    /// Read without cloning. Do not hold across an `.await`.
    pub fn read<R>(&self, f: impl FnOnce(&AppState) -> R) -> R {
        f(&self.tx.borrow())
    }

    pub fn subscribe(&self) -> watch::Receiver<AppState> {
        self.tx.subscribe()
    }

    pub fn update(&self, f: impl FnOnce(&mut AppState)) {
        self.tx.send_modify(f);
    }

    /// Like [`Store::update`], notifying only when `f` returns true.
    pub fn update_if(&self, f: impl FnOnce(&mut AppState) -> bool) -> bool {
        self.tx.send_if_modified(f)
    }

    pub fn add(&self, current: CurrentConditions, forecast: Vec<ForecastDayPoint>) -> Result<()> {
        let mut outcome = Ok(());
        self.update_if(|state| {
            outcome = state.cities.add(current, forecast);
            outcome.is_ok()
        });

        if outcome.is_ok() {
            tracing::info!(count = self.read(|s| s.cities.len()), "city added");
        }
        outcome
    }

    pub fn remove(&self, id: CityId) -> bool {
        let removed = self.update_if(|state| state.cities.remove(id));
        if removed {
            tracing::info!(city_id = %id, "city removed");
        }
        removed
    }

    pub fn toggle_expand(&self, id: CityId) {
        self.update_if(|state| {
            let before = state.cities.expanded();
            state.cities.toggle_expand(id);
            state.cities.expanded() != before
        });
    }
}
