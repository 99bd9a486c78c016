use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::units::UnitSystem;

/// A trimmed, non-empty location name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct LocationQuery(String);

impl LocationQuery {
    /// Trim `raw`; returns `None` when nothing is left.
    pub fn parse(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(Self(trimmed.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for LocationQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

/// Current conditions for one location, in the unit system it was requested in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherSnapshot {
    pub location_name: String,
    pub coordinates: Coordinates,
    pub condition_code: u32,
    pub condition_label: String,
    pub temperature: f64,
    pub feels_like: f64,
    pub humidity_pct: u8,
    pub wind_speed: f64,
    pub observed_at_unit_system: UnitSystem,
    pub observed_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HistoricalSample {
    pub timestamp: i64,
    pub temperature_kelvin: f64,
}

/// Hourly samples in service order, plus the location's offset from UTC.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct HistoricalSeries {
    pub samples: Vec<HistoricalSample>,
    pub utc_offset_seconds: i32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn location_query_trims() {
        let q = LocationQuery::parse("  Paris \n").expect("non-empty");
        assert_eq!(q.as_str(), "Paris");
        assert_eq!(q.to_string(), "Paris");
    }

    #[test]
    fn location_query_rejects_blank() {
        assert!(LocationQuery::parse("").is_none());
        assert!(LocationQuery::parse(" \t\n ").is_none());
    }
}
