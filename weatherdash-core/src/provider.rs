use crate::{
    Config,
    error::{HistoricalFetchError, LookupError},
    model::{Coordinates, HistoricalSeries, LocationQuery, WeatherSnapshot},
    provider::openweather::OpenWeatherClient,
    units::UnitSystem,
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::{fmt::Debug, sync::Arc};

pub mod openweather;

/// Resolves a location name to current conditions and coordinates.
#[async_trait]
pub trait WeatherLookup: Send + Sync + Debug {
    async fn current(
        &self,
        query: &LocationQuery,
        unit: UnitSystem,
    ) -> Result<WeatherSnapshot, LookupError>;
}

/// Resolves coordinates and a reference time to hourly temperature samples.
#[async_trait]
pub trait HistoricalSamples: Send + Sync + Debug {
    async fn hourly(
        &self,
        at: Coordinates,
        reference: DateTime<Utc>,
    ) -> Result<HistoricalSeries, HistoricalFetchError>;
}

/// Both service handles, built from config.
#[derive(Debug, Clone)]
pub struct Services {
    pub lookup: Arc<dyn WeatherLookup>,
    pub history: Arc<dyn HistoricalSamples>,
}

/// Construct the OpenWeather-backed services from config.
pub fn services_from_config(config: &Config) -> anyhow::Result<Services> {
    let api_key = config.api_key().ok_or_else(|| {
        anyhow::anyhow!(
            "No API key configured.\n\
             Hint: run `weatherdash configure` or set WEATHER_API_KEY."
        )
    })?;

    let client = Arc::new(OpenWeatherClient::new(config.base_url(), api_key)?);

    Ok(Services { lookup: client.clone(), history: client })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn services_from_config_errors_when_missing_api_key() {
        let cfg = Config::default();
        let err = services_from_config(&cfg).unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("No API key configured"));
        assert!(msg.contains("weatherdash configure"));
    }

    #[test]
    fn services_from_config_works_when_key_set() {
        let cfg = Config { api_key: Some("KEY".into()), ..Config::default() };
        assert!(services_from_config(&cfg).is_ok());
    }
}
