#[cfg(test)]
pub(crate) mod fake;
mod mealdb;
pub mod wire;

pub use mealdb::MealDbSource;

use crate::error::MealError;
use crate::model::Meal;
use async_trait::async_trait;

/// Read-only access to a remote recipe catalogue.
///
/// Implementations hold no mutable state and may be called concurrently
/// from any number of in-flight queries. Failures are surfaced as-is;
/// there are no retries and no caching.
#[async_trait]
pub trait MealSource: Send + Sync {
    /// Name search. Returned meals carry no area.
    async fn search_by_keyword(&self, keyword: &str) -> Result<Vec<Meal>, MealError>;

    /// Cuisine filter. The API does not tag the records with the area,
    /// callers stamp it themselves.
    async fn search_by_area(&self, area: &str) -> Result<Vec<Meal>, MealError>;

    /// Full record for one meal, including ingredients and instructions
    async fn lookup_detail(&self, id: &str) -> Result<Meal, MealError>;

    /// Every cuisine the catalogue knows about
    async fn list_areas(&self) -> Result<Vec<String>, MealError>;
}
