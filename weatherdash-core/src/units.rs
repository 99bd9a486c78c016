use serde::{Deserialize, Serialize};
use std::fmt;

const KELVIN_OFFSET: f64 = 273.15;

/// Unit system used for display and for current-conditions requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnitSystem {
    #[default]
    Metric,
    Imperial,
}

impl UnitSystem {
    /// Name used on the wire and in the config file.
    pub fn as_str(&self) -> &'static str {
        match self {
            UnitSystem::Metric => "metric",
            UnitSystem::Imperial => "imperial",
        }
    }

    pub const fn all() -> &'static [UnitSystem] {
        &[UnitSystem::Metric, UnitSystem::Imperial]
    }

    pub fn toggled(self) -> Self {
        match self {
            UnitSystem::Metric => UnitSystem::Imperial,
            UnitSystem::Imperial => UnitSystem::Metric,
        }
    }

    pub fn temperature_symbol(&self) -> &'static str {
        match self {
            UnitSystem::Metric => "°C",
            UnitSystem::Imperial => "°F",
        }
    }

    /// Convert an absolute Kelvin reading to this system's display unit.
    pub fn kelvin_to_display(&self, kelvin: f64) -> i64 {
        match self {
            UnitSystem::Metric => to_celsius(kelvin),
            UnitSystem::Imperial => to_fahrenheit(kelvin),
        }
    }
}

impl fmt::Display for UnitSystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for UnitSystem {
    type Error = anyhow::Error;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim().to_lowercase().as_str() {
            "metric" => Ok(UnitSystem::Metric),
            "imperial" => Ok(UnitSystem::Imperial),
            _ => Err(anyhow::anyhow!(
                "Unknown unit system '{value}'. Supported: metric, imperial."
            )),
        }
    }
}

pub fn to_celsius(kelvin: f64) -> i64 {
    (kelvin - KELVIN_OFFSET).round() as i64
}

pub fn to_fahrenheit(kelvin: f64) -> i64 {
    ((kelvin - KELVIN_OFFSET) * 9.0 / 5.0 + 32.0).round() as i64
}

pub fn speed_label(system: UnitSystem) -> &'static str {
    match system {
        UnitSystem::Metric => "m/s",
        UnitSystem::Imperial => "MPH",
    }
}
