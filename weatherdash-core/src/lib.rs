//! Core library for the `weatherdash` CLI.
//!
//! This crate defines:
//! - The search orchestrator and the state it exposes to a presentation layer
//! - A bounded recent-search list
//! - Unit conversion and the hourly history transform
//! - Service traits with an OpenWeather implementation
//! - Configuration & credentials handling
//!
//! It is used by `weatherdash-cli`, but can also be reused by other frontends.

pub mod config;
pub mod error;
pub mod history;
pub mod model;
pub mod orchestrator;
pub mod provider;
pub mod recent;
pub mod units;

pub use config::{Config, RecentConfig};
pub use error::{HistoricalFetchError, LookupError, MalformedSampleError, SearchError};
pub use history::DisplaySeries;
pub use model::{Coordinates, HistoricalSample, HistoricalSeries, LocationQuery, WeatherSnapshot};
pub use orchestrator::{OrchestrationState, Orchestrator, RequestToken, SearchOutcome};
pub use provider::{HistoricalSamples, Services, WeatherLookup, services_from_config};
pub use recent::{DuplicatePolicy, RecentSearches};
pub use units::UnitSystem;
