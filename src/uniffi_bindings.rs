//! UniFFI bindings for tastoro
//!
//! This module provides FFI-compatible types and functions for the iOS app.
//! It wraps the async Rust API with blocking functions that manage their own tokio runtime.

use std::fmt;
use std::sync::Arc;

use crate::{
    FailurePolicy, Meal, MealAggregator, MealDbConfig, MealError, QueryOutcome, QuerySession,
};

// Re-export UniFFI macro
#[cfg(feature = "uniffi")]
uniffi::setup_scaffolding!();

/// FFI-compatible meal structure
#[derive(Debug, Clone)]
#[cfg_attr(feature = "uniffi", derive(uniffi::Record))]
pub struct FfiMeal {
    pub id: String,
    pub name: String,
    pub thumbnail_url: String,
    pub area: Option<String>,
    pub ingredients: Option<Vec<String>>,
    pub instructions: Option<String>,
    pub category: Option<String>,
    pub tags: Option<Vec<String>>,
}

impl From<Meal> for FfiMeal {
    fn from(meal: Meal) -> Self {
        FfiMeal {
            id: meal.id,
            name: meal.name,
            thumbnail_url: meal.thumbnail_url,
            area: meal.area,
            ingredients: meal.ingredients,
            instructions: meal.instructions,
            category: meal.category,
            tags: meal.tags,
        }
    }
}

/// FFI-compatible outcome of a session search
#[derive(Debug, Clone)]
#[cfg_attr(feature = "uniffi", derive(uniffi::Enum))]
pub enum FfiQueryOutcome {
    /// Results of the latest search
    Current { generation: u64, meals: Vec<FfiMeal> },
    /// A newer search replaced this one; do not display anything
    Superseded { generation: u64 },
}

impl From<QueryOutcome> for FfiQueryOutcome {
    fn from(outcome: QueryOutcome) -> Self {
        match outcome {
            QueryOutcome::Current { generation, meals } => FfiQueryOutcome::Current {
                generation,
                meals: meals.into_iter().map(FfiMeal::from).collect(),
            },
            QueryOutcome::Superseded { generation } => FfiQueryOutcome::Superseded { generation },
        }
    }
}

/// FFI-compatible error type
#[derive(Debug, Clone)]
#[cfg_attr(feature = "uniffi", derive(uniffi::Error))]
pub enum FfiMealError {
    /// Query parameters were rejected
    InvalidRequest { message: String },
    /// Network failure or HTTP error status
    TransportFailure { message: String },
    /// The API answered with no body
    EmptyResponse { message: String },
    /// The API answered with something that is not a meal payload
    DecodeFailure { message: String },
    /// One area of a multi-area search failed
    PartialAggregationFailure { area: String, message: String },
    /// A request did not finish in time
    Timeout { message: String },
    /// The search was cancelled
    Cancelled { message: String },
    /// Configuration error
    ConfigError { message: String },
    /// Runtime error (tokio)
    RuntimeError { message: String },
}

impl fmt::Display for FfiMealError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FfiMealError::InvalidRequest { message } => write!(f, "Invalid request: {}", message),
            FfiMealError::TransportFailure { message } => {
                write!(f, "Transport failure: {}", message)
            }
            FfiMealError::EmptyResponse { message } => write!(f, "Empty response: {}", message),
            FfiMealError::DecodeFailure { message } => write!(f, "Decode failure: {}", message),
            FfiMealError::PartialAggregationFailure { area, message } => {
                write!(f, "Search for area '{}' failed: {}", area, message)
            }
            FfiMealError::Timeout { message } => write!(f, "Timeout: {}", message),
            FfiMealError::Cancelled { message } => write!(f, "Cancelled: {}", message),
            FfiMealError::ConfigError { message } => write!(f, "Config error: {}", message),
            FfiMealError::RuntimeError { message } => write!(f, "Runtime error: {}", message),
        }
    }
}

impl std::error::Error for FfiMealError {}

impl From<MealError> for FfiMealError {
    fn from(err: MealError) -> Self {
        let message = err.to_string();
        match err {
            MealError::InvalidRequest(msg) => FfiMealError::InvalidRequest { message: msg },
            MealError::TransportFailure(_) => FfiMealError::TransportFailure { message },
            MealError::EmptyResponse => FfiMealError::EmptyResponse { message },
            MealError::DecodeFailure(msg) => FfiMealError::DecodeFailure { message: msg },
            MealError::PartialAggregationFailure { area, source } => {
                FfiMealError::PartialAggregationFailure {
                    area,
                    message: source.to_string(),
                }
            }
            MealError::Timeout => FfiMealError::Timeout { message },
            MealError::Cancelled => FfiMealError::Cancelled { message },
            MealError::ConfigError(_) => FfiMealError::ConfigError { message },
        }
    }
}

/// Configuration for searches; unset fields fall back to `tastoro.toml` / environment
#[derive(Debug, Clone, Default)]
#[cfg_attr(feature = "uniffi", derive(uniffi::Record))]
pub struct FfiSearchConfig {
    /// Optional API root (uses TheMealDB if not specified)
    pub base_url: Option<String>,
    /// Optional keyword used when a search has none
    pub default_keyword: Option<String>,
    /// Optional timeout in seconds for each request
    pub timeout_seconds: Option<u64>,
    /// If true, failed areas are skipped instead of failing the search
    pub allow_partial_results: bool,
}

impl FfiSearchConfig {
    fn resolve(self) -> Result<MealDbConfig, FfiMealError> {
        let mut config = MealDbConfig::load().map_err(MealError::from)?;

        if let Some(base_url) = self.base_url {
            config.base_url = base_url;
        }
        if let Some(keyword) = self.default_keyword {
            config.default_keyword = keyword;
        }
        if let Some(timeout_secs) = self.timeout_seconds {
            config.timeout = timeout_secs;
            config.branch_timeout = timeout_secs;
        }
        if self.allow_partial_results {
            config.failure_policy = FailurePolicy::Partial;
        }

        Ok(config)
    }
}

/// Create a new tokio runtime for FFI calls
fn create_runtime() -> Result<tokio::runtime::Runtime, FfiMealError> {
    tokio::runtime::Runtime::new().map_err(|e| FfiMealError::RuntimeError {
        message: format!("Failed to create async runtime: {}", e),
    })
}

fn aggregator_for(config: Option<FfiSearchConfig>) -> Result<MealAggregator, FfiMealError> {
    let config = config.unwrap_or_default().resolve()?;
    Ok(MealAggregator::from_config(&config)?)
}

/// Search meals by keyword, optionally across several areas
///
/// # Arguments
/// * `keyword` - Matched case-insensitively against meal names
/// * `areas` - Areas to search; empty means a plain keyword search
/// * `config` - Optional configuration for the search
#[cfg_attr(feature = "uniffi", uniffi::export)]
pub fn search_meals(
    keyword: String,
    areas: Vec<String>,
    config: Option<FfiSearchConfig>,
) -> Result<Vec<FfiMeal>, FfiMealError> {
    let aggregator = aggregator_for(config)?;
    let rt = create_runtime()?;
    let meals = rt.block_on(aggregator.query(&keyword, &areas))?;
    Ok(meals.into_iter().map(FfiMeal::from).collect())
}

/// Fetch one meal with its ingredients and instructions
#[cfg_attr(feature = "uniffi", uniffi::export)]
pub fn fetch_meal_detail(
    id: String,
    config: Option<FfiSearchConfig>,
) -> Result<FfiMeal, FfiMealError> {
    let aggregator = aggregator_for(config)?;
    let rt = create_runtime()?;
    let meal = rt.block_on(aggregator.fetch_detail(&id))?;
    Ok(meal.into())
}

/// List the areas (cuisines) available for filtering
#[cfg_attr(feature = "uniffi", uniffi::export)]
pub fn list_areas(config: Option<FfiSearchConfig>) -> Result<Vec<String>, FfiMealError> {
    let aggregator = aggregator_for(config)?;
    let rt = create_runtime()?;
    Ok(rt.block_on(aggregator.list_areas())?)
}

/// Get the library version
#[cfg_attr(feature = "uniffi", uniffi::export)]
pub fn get_version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

/// Long-lived search session for a search screen.
///
/// Each `search` replaces the previous one: a search still running when a
/// newer one starts is cancelled and reports `Superseded`.
#[cfg_attr(feature = "uniffi", derive(uniffi::Object))]
pub struct FfiMealSession {
    runtime: tokio::runtime::Runtime,
    session: QuerySession,
}

#[cfg_attr(feature = "uniffi", uniffi::export)]
impl FfiMealSession {
    #[cfg_attr(feature = "uniffi", uniffi::constructor)]
    pub fn new(config: Option<FfiSearchConfig>) -> Result<Arc<Self>, FfiMealError> {
        let aggregator = aggregator_for(config)?;
        Ok(Arc::new(FfiMealSession {
            runtime: create_runtime()?,
            session: QuerySession::new(aggregator),
        }))
    }

    pub fn search(
        &self,
        keyword: String,
        areas: Vec<String>,
    ) -> Result<FfiQueryOutcome, FfiMealError> {
        let outcome = self
            .runtime
            .block_on(self.session.submit(&keyword, &areas))?;
        Ok(outcome.into())
    }

    pub fn fetch_detail(&self, id: String) -> Result<FfiMeal, FfiMealError> {
        let meal = self
            .runtime
            .block_on(self.session.aggregator().fetch_detail(&id))?;
        Ok(meal.into())
    }

    /// Cancel the running search, if any
    pub fn cancel(&self) {
        self.session.cancel();
    }

    pub fn latest_generation(&self) -> u64 {
        self.session.latest_generation()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ffi_meal_conversion() {
        let meal = Meal {
            ingredients: Some(vec!["Salt".to_string(), "Pepper".to_string()]),
            ..Meal::new("52940", "Brown Stew Chicken", "https://img/stew.jpg")
        }
        .with_area("Jamaican");

        let ffi: FfiMeal = meal.into();
        assert_eq!(ffi.id, "52940");
        assert_eq!(ffi.area.as_deref(), Some("Jamaican"));
        assert_eq!(ffi.ingredients.unwrap().len(), 2);
        assert!(ffi.instructions.is_none());
    }

    #[test]
    fn test_error_conversion_keeps_area() {
        let err = MealError::PartialAggregationFailure {
            area: "Thai".to_string(),
            source: Box::new(MealError::Timeout),
        };

        match FfiMealError::from(err) {
            FfiMealError::PartialAggregationFailure { area, message } => {
                assert_eq!(area, "Thai");
                assert!(message.contains("timed out"));
            }
            other => panic!("unexpected error: {}", other),
        }
    }

    #[test]
    fn test_superseded_outcome_conversion() {
        let outcome: FfiQueryOutcome = QueryOutcome::Superseded { generation: 3 }.into();
        assert!(matches!(outcome, FfiQueryOutcome::Superseded { generation: 3 }));
    }

    #[test]
    fn test_get_version() {
        let version = get_version();
        assert!(!version.is_empty());
    }
}
