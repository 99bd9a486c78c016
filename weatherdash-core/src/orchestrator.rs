//! Search orchestration: the state machine behind a weather search.
//!
//! A search runs two dependent lookups, current conditions and then hourly
//! history at the returned coordinates. Every search takes a fresh request
//! token; a result is applied only while its token is still the latest one,
//! so an earlier, slower search can never overwrite a later one.
//!
//! The orchestrator is meant to be driven from a single task. State lives in
//! a `RefCell` and no borrow is held across an `.await`.

use chrono::{FixedOffset, Offset, Utc};
use std::{cell::RefCell, sync::Arc};

use crate::{
    error::SearchError,
    history::{self, DisplaySeries},
    model::{LocationQuery, WeatherSnapshot},
    provider::{HistoricalSamples, Services, WeatherLookup},
    recent::{DuplicatePolicy, RecentSearches},
    units::UnitSystem,
};

/// What the presentation layer renders.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum OrchestrationState {
    #[default]
    Idle,
    Loading,
    Error(String),
    Loaded { snapshot: WeatherSnapshot, history: Option<DisplaySeries> },
}

impl OrchestrationState {
    pub fn snapshot(&self) -> Option<&WeatherSnapshot> {
        match self {
            OrchestrationState::Loaded { snapshot, .. } => Some(snapshot),
            _ => None,
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, OrchestrationState::Loading)
    }
}

/// Monotonically increasing search identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub struct RequestToken(u64);

impl RequestToken {
    fn next(self) -> Self {
        Self(self.0 + 1)
    }
}

/// Result of a search that did not fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchOutcome {
    /// The result reached `current_state()`.
    Applied,
    /// A newer search started before this one finished; nothing was applied.
    Superseded,
}

#[derive(Debug)]
struct Inner {
    state: OrchestrationState,
    unit: UnitSystem,
    recent: RecentSearches,
    latest: RequestToken,
    history_diagnostic: Option<String>,
}

#[derive(Debug)]
pub struct Orchestrator {
    lookup: Arc<dyn WeatherLookup>,
    history: Arc<dyn HistoricalSamples>,
    inner: RefCell<Inner>,
}

impl Orchestrator {
    pub fn new(
        lookup: Arc<dyn WeatherLookup>,
        history: Arc<dyn HistoricalSamples>,
        unit: UnitSystem,
        policy: DuplicatePolicy,
    ) -> Self {
        Self {
            lookup,
            history,
            inner: RefCell::new(Inner {
                state: OrchestrationState::Idle,
                unit,
                recent: RecentSearches::new(policy),
                latest: RequestToken::default(),
                history_diagnostic: None,
            }),
        }
    }

    pub fn from_services(services: Services, unit: UnitSystem, policy: DuplicatePolicy) -> Self {
        Self::new(services.lookup, services.history, unit, policy)
    }

    pub fn current_state(&self) -> OrchestrationState {
        self.inner.borrow().state.clone()
    }

    pub fn unit_system(&self) -> UnitSystem {
        self.inner.borrow().unit
    }

    pub fn recent_searches(&self) -> Vec<String> {
        self.inner.borrow().recent.list()
    }

    /// Why the last applied search has no history series, if it failed to load.
    pub fn history_diagnostic(&self) -> Option<String> {
        self.inner.borrow().history_diagnostic.clone()
    }

    /// Flip the unit system and forget recent searches. The displayed
    /// snapshot is left alone until the next search.
    pub fn toggle_unit_system(&self) -> UnitSystem {
        let mut inner = self.inner.borrow_mut();
        inner.unit = inner.unit.toggled();
        inner.recent.clear();
        tracing::debug!(unit = %inner.unit, "unit system toggled, recent searches cleared");
        inner.unit
    }

    pub async fn submit_search(&self, raw: &str) -> Result<SearchOutcome, SearchError> {
        let Some(query) = LocationQuery::parse(raw) else {
            let mut inner = self.inner.borrow_mut();
            // Invalidate anything still in flight so it cannot replace this error.
            inner.latest = inner.latest.next();
            inner.history_diagnostic = None;
            inner.state = OrchestrationState::Error(SearchError::Validation.to_string());
            return Err(SearchError::Validation);
        };

        let (token, unit) = {
            let mut inner = self.inner.borrow_mut();
            inner.latest = inner.latest.next();
            inner.state = OrchestrationState::Loading;
            inner.history_diagnostic = None;
            (inner.latest, inner.unit)
        };
        tracing::debug!(?token, %query, %unit, "search issued");

        let looked_up = self.lookup.current(&query, unit).await;

        let snapshot = {
            let mut inner = self.inner.borrow_mut();
            if inner.latest != token {
                tracing::debug!(?token, %query, "discarding stale lookup result");
                return Ok(SearchOutcome::Superseded);
            }

            match looked_up {
                Ok(snapshot) => {
                    let canonical = LocationQuery::parse(&snapshot.location_name).unwrap_or(query);
                    inner.recent.record(canonical);
                    inner.state =
                        OrchestrationState::Loaded { snapshot: snapshot.clone(), history: None };
                    tracing::info!(location = %snapshot.location_name, "current conditions loaded");
                    snapshot
                }
                Err(err) => {
                    tracing::info!(error = %err, "lookup failed");
                    let err = SearchError::from(err);
                    inner.state = OrchestrationState::Error(err.to_string());
                    return Err(err);
                }
            }
        };

        let fetched = self.history.hourly(snapshot.coordinates, Utc::now()).await;

        let mut inner = self.inner.borrow_mut();
        if inner.latest != token {
            tracing::debug!(?token, "discarding stale history result");
            return Ok(SearchOutcome::Superseded);
        }

        let transformed = fetched.map_err(|e| e.to_string()).and_then(|series| {
            let offset = FixedOffset::east_opt(series.utc_offset_seconds).unwrap_or_else(|| {
                tracing::warn!(
                    offset = series.utc_offset_seconds,
                    "invalid UTC offset from history service, labelling in UTC"
                );
                Utc.fix()
            });
            // Chart in the same unit as the snapshot it belongs to.
            let unit = snapshot.observed_at_unit_system;
            history::transform_with_offset(&series.samples, unit, offset).map_err(|e| e.to_string())
        });

        match transformed {
            Ok(series) => {
                inner.state = OrchestrationState::Loaded { snapshot, history: Some(series) };
            }
            Err(reason) => {
                tracing::warn!(%reason, "history unavailable, keeping current conditions");
                inner.history_diagnostic = Some(reason);
            }
        }

        Ok(SearchOutcome::Applied)
    }
}
