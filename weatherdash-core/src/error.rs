//! Error taxonomy for lookups, history transforms and searches.

/// Failure of a current-conditions lookup.
#[derive(Debug, thiserror::Error)]
pub enum LookupError {
    #[error("Location '{0}' not found")]
    NotFound(String),
    #[error("Weather service unavailable: {0}")]
    Unavailable(String),
}

/// Failure of a historical sample lookup. Never fatal to a search.
#[derive(Debug, thiserror::Error)]
#[error("Historical sample lookup failed: {0}")]
pub struct HistoricalFetchError(pub String);

/// A sample that cannot be turned into a chart point.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum MalformedSampleError {
    #[error("sample {index} has a non-finite temperature ({value})")]
    NonFiniteTemperature { index: usize, value: f64 },
    #[error("sample {index} has an out-of-range timestamp ({timestamp})")]
    TimestampOutOfRange { index: usize, timestamp: i64 },
}

/// User-visible outcome of a failed search. The message is what gets shown.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SearchError {
    #[error("empty location")]
    Validation,
    #[error("location not found")]
    NotFound,
    #[error("weather service unavailable")]
    ServiceUnavailable,
}

impl From<LookupError> for SearchError {
    fn from(err: LookupError) -> Self {
        match err {
            LookupError::NotFound(_) => SearchError::NotFound,
            LookupError::Unavailable(_) => SearchError::ServiceUnavailable,
        }
    }
}
