pub mod aggregator;
pub mod builder;
pub mod config;
pub mod error;
pub mod model;
pub mod session;
pub mod source;
pub mod uniffi_bindings;

pub use aggregator::MealAggregator;
pub use builder::{MealSearch, MealSearchBuilder, SearchResult};
pub use config::{FailurePolicy, MealDbConfig};
pub use error::{FailureKind, MealError};
pub use model::Meal;
pub use session::{QueryOutcome, QuerySession};
pub use source::{MealDbSource, MealSource};

// Re-export UniFFI types when feature is enabled
#[cfg(feature = "uniffi")]
pub use uniffi_bindings::*;

/// Search TheMealDB using configuration from `tastoro.toml` / `TASTORO__*`.
///
/// With no `areas` this is a keyword search; otherwise one request per area
/// is issued concurrently and the merged list is filtered by `keyword`.
///
/// # Example
/// ```no_run
/// # #[tokio::main]
/// # async fn main() -> Result<(), tastoro::MealError> {
/// let areas = vec!["Indian".to_string(), "Chinese".to_string()];
/// let meals = tastoro::search_meals("chicken", &areas).await?;
/// for meal in meals {
///     println!("{} ({})", meal.name, meal.area.unwrap_or_default());
/// }
/// # Ok(())
/// # }
/// ```
pub async fn search_meals(keyword: &str, areas: &[String]) -> Result<Vec<Meal>, MealError> {
    let config = MealDbConfig::load()?;
    MealAggregator::from_config(&config)?
        .query(keyword, areas)
        .await
}

/// Fetch one meal with its ingredients and instructions
pub async fn fetch_meal_detail(id: &str) -> Result<Meal, MealError> {
    let config = MealDbConfig::load()?;
    MealAggregator::from_config(&config)?.fetch_detail(id).await
}

/// List the areas (cuisines) known to TheMealDB
pub async fn list_areas() -> Result<Vec<String>, MealError> {
    let config = MealDbConfig::load()?;
    MealAggregator::from_config(&config)?.list_areas().await
}
