use thiserror::Error;

/// Errors that can occur while searching or looking up meals
#[derive(Error, Debug)]
pub enum MealError {
    /// Query parameters were rejected before any request was sent
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Network-level failure or non-success HTTP status
    #[error("Failed to reach meal API: {0}")]
    TransportFailure(reqwest::Error),

    /// The API answered with an empty body
    #[error("Meal API returned an empty response")]
    EmptyResponse,

    /// The payload did not match the expected shape
    #[error("Failed to decode meal API response: {0}")]
    DecodeFailure(String),

    /// One branch of a multi-area query failed, so the whole query failed
    #[error("Search for area '{area}' failed: {source}")]
    PartialAggregationFailure {
        area: String,
        #[source]
        source: Box<MealError>,
    },

    /// A request or branch did not finish in time
    #[error("Meal API request timed out")]
    Timeout,

    /// The query was cancelled or superseded by a newer one
    #[error("Query was cancelled")]
    Cancelled,

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigError(#[from] config::ConfigError),
}

/// Flat classification of [`MealError`] for presentation code
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    InvalidRequest,
    TransportFailure,
    EmptyResponse,
    DecodeFailure,
    PartialAggregationFailure,
    Timeout,
    Cancelled,
    Config,
}

impl MealError {
    pub fn kind(&self) -> FailureKind {
        match self {
            MealError::InvalidRequest(_) => FailureKind::InvalidRequest,
            MealError::TransportFailure(_) => FailureKind::TransportFailure,
            MealError::EmptyResponse => FailureKind::EmptyResponse,
            MealError::DecodeFailure(_) => FailureKind::DecodeFailure,
            MealError::PartialAggregationFailure { .. } => FailureKind::PartialAggregationFailure,
            MealError::Timeout => FailureKind::Timeout,
            MealError::Cancelled => FailureKind::Cancelled,
            MealError::ConfigError(_) => FailureKind::Config,
        }
    }

    /// The failure underneath any aggregation wrapper
    pub fn root_cause(&self) -> &MealError {
        match self {
            MealError::PartialAggregationFailure { source, .. } => source.root_cause(),
            other => other,
        }
    }
}

impl From<reqwest::Error> for MealError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            MealError::Timeout
        } else {
            MealError::TransportFailure(err)
        }
    }
}

impl From<serde_json::Error> for MealError {
    fn from(err: serde_json::Error) -> Self {
        MealError::DecodeFailure(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_of_aggregation_failure() {
        let err = MealError::PartialAggregationFailure {
            area: "Indian".to_string(),
            source: Box::new(MealError::EmptyResponse),
        };
        assert_eq!(err.kind(), FailureKind::PartialAggregationFailure);
        assert_eq!(err.root_cause().kind(), FailureKind::EmptyResponse);
        assert!(err.to_string().contains("Indian"));
    }

    #[test]
    fn test_decode_failure_from_serde() {
        let err: MealError = serde_json::from_str::<serde_json::Value>("{not json")
            .unwrap_err()
            .into();
        assert_eq!(err.kind(), FailureKind::DecodeFailure);
    }
}
