//! Turns raw hourly samples into chart-ready label/value columns.

use chrono::{DateTime, FixedOffset, Offset, Utc};
use serde::{Deserialize, Serialize};

use crate::{error::MalformedSampleError, model::HistoricalSample, units::UnitSystem};

const LABEL_FORMAT: &str = "%H:%M";

/// Parallel columns: `labels[i]` is the time of day for `values[i]`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DisplaySeries {
    pub labels: Vec<String>,
    pub values: Vec<i64>,
    pub unit: UnitSystem,
}

impl DisplaySeries {
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn points(&self) -> impl Iterator<Item = (&str, i64)> {
        self.labels.iter().map(String::as_str).zip(self.values.iter().copied())
    }
}

/// Same as [`transform_with_offset`], with labels in UTC.
pub fn transform(
    samples: &[HistoricalSample],
    unit: UnitSystem,
) -> Result<DisplaySeries, MalformedSampleError> {
    transform_with_offset(samples, unit, Utc.fix())
}

pub fn transform_with_offset(
    samples: &[HistoricalSample],
    unit: UnitSystem,
    offset: FixedOffset,
) -> Result<DisplaySeries, MalformedSampleError> {
    let mut labels = Vec::with_capacity(samples.len());
    let mut values = Vec::with_capacity(samples.len());

    for (index, sample) in samples.iter().enumerate() {
        if !sample.temperature_kelvin.is_finite() {
            return Err(MalformedSampleError::NonFiniteTemperature {
                index,
                value: sample.temperature_kelvin,
            });
        }

        let at: DateTime<Utc> = DateTime::from_timestamp(sample.timestamp, 0).ok_or(
            MalformedSampleError::TimestampOutOfRange { index, timestamp: sample.timestamp },
        )?;

        labels.push(at.with_timezone(&offset).format(LABEL_FORMAT).to_string());
        values.push(unit.kelvin_to_display(sample.temperature_kelvin));
    }

    Ok(DisplaySeries { labels, values, unit })
}
