use std::sync::Arc;
use std::time::Duration;

use crate::config::{FailurePolicy, MealDbConfig};
use crate::source::MealDbSource;
use crate::{Meal, MealAggregator, MealError};

/// What a [`MealSearch`] should fetch
#[derive(Debug, Clone)]
enum SearchTarget {
    /// Keyword and/or area search
    Meals {
        keyword: Option<String>,
        areas: Vec<String>,
    },
    /// Detail lookup by meal id
    Detail(String),
}

impl Default for SearchTarget {
    fn default() -> Self {
        SearchTarget::Meals {
            keyword: None,
            areas: Vec::new(),
        }
    }
}

/// Result of a [`MealSearch`]
#[derive(Debug, Clone)]
pub enum SearchResult {
    /// Filtered, deduplicated search results
    Meals(Vec<Meal>),
    /// A single meal with ingredients and instructions
    Detail(Meal),
}

/// Builder for configuring and executing a one-shot meal search
#[derive(Debug, Default)]
pub struct MealSearchBuilder {
    target: SearchTarget,
    conflict: bool,
    config: Option<MealDbConfig>,
    base_url: Option<String>,
    timeout: Option<Duration>,
    failure_policy: Option<FailurePolicy>,
}

impl MealSearchBuilder {
    /// Set the keyword matched against meal names
    ///
    /// # Example
    /// ```
    /// use tastoro::MealSearch;
    ///
    /// let builder = MealSearch::builder().keyword("chicken");
    /// ```
    pub fn keyword(mut self, keyword: impl Into<String>) -> Self {
        match &mut self.target {
            SearchTarget::Meals { keyword: k, .. } => *k = Some(keyword.into()),
            SearchTarget::Detail(_) => self.conflict = true,
        }
        self
    }

    /// Restrict the search to an area (cuisine). Call repeatedly to
    /// search several areas at once.
    ///
    /// # Example
    /// ```
    /// use tastoro::MealSearch;
    ///
    /// let builder = MealSearch::builder()
    ///     .keyword("chicken")
    ///     .area("Indian")
    ///     .area("Chinese");
    /// ```
    pub fn area(mut self, area: impl Into<String>) -> Self {
        match &mut self.target {
            SearchTarget::Meals { areas, .. } => areas.push(area.into()),
            SearchTarget::Detail(_) => self.conflict = true,
        }
        self
    }

    /// Add several areas at once
    pub fn areas<I, S>(self, areas: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        areas.into_iter().fold(self, |builder, area| builder.area(area))
    }

    /// Look up a single meal by id instead of searching
    ///
    /// Cannot be combined with [`keyword`](Self::keyword) or
    /// [`area`](Self::area).
    ///
    /// # Example
    /// ```
    /// use tastoro::MealSearch;
    ///
    /// let builder = MealSearch::builder().detail("52940");
    /// ```
    pub fn detail(mut self, id: impl Into<String>) -> Self {
        match &self.target {
            SearchTarget::Meals { keyword, areas } if keyword.is_none() && areas.is_empty() => {}
            _ => self.conflict = true,
        }
        self.target = SearchTarget::Detail(id.into());
        self
    }

    /// Use an explicit configuration instead of [`MealDbConfig::load`]
    pub fn config(mut self, config: MealDbConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Point the search at a different API root
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Set a timeout for HTTP requests
    ///
    /// # Example
    /// ```
    /// use tastoro::MealSearch;
    /// use std::time::Duration;
    ///
    /// let builder = MealSearch::builder()
    ///     .keyword("pie")
    ///     .timeout(Duration::from_secs(10));
    /// ```
    pub fn timeout(mut self, duration: Duration) -> Self {
        self.timeout = Some(duration);
        self
    }

    pub fn failure_policy(mut self, policy: FailurePolicy) -> Self {
        self.failure_policy = Some(policy);
        self
    }

    /// Build and execute the search
    ///
    /// # Errors
    /// Returns `MealError` if:
    /// - `detail()` was combined with `keyword()` or `area()`
    /// - configuration cannot be loaded
    /// - any request fails (see [`MealAggregator::query`])
    ///
    /// # Example
    /// ```no_run
    /// # use tastoro::MealSearch;
    /// # #[tokio::main]
    /// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
    /// let result = MealSearch::builder()
    ///     .keyword("chicken")
    ///     .area("Indian")
    ///     .build()
    ///     .await?;
    /// # Ok(())
    /// # }
    /// ```
    pub async fn build(self) -> Result<SearchResult, MealError> {
        if self.conflict {
            return Err(MealError::InvalidRequest(
                "detail() cannot be combined with keyword() or area()".to_string(),
            ));
        }

        let mut config = match self.config {
            Some(config) => config,
            None => MealDbConfig::load()?,
        };
        if let Some(url) = self.base_url {
            config.base_url = url;
        }
        if let Some(policy) = self.failure_policy {
            config.failure_policy = policy;
        }

        let source = MealDbSource::new(
            config.base_url.clone(),
            Some(self.timeout.unwrap_or_else(|| config.request_timeout())),
        )?;
        let aggregator = MealAggregator::with_config(Arc::new(source), &config);

        match self.target {
            SearchTarget::Meals { keyword, areas } => {
                let keyword = keyword.unwrap_or_default();
                let meals = aggregator.query(&keyword, &areas).await?;
                Ok(SearchResult::Meals(meals))
            }
            SearchTarget::Detail(id) => {
                let meal = aggregator.fetch_detail(&id).await?;
                Ok(SearchResult::Detail(meal))
            }
        }
    }
}

/// Main entry point for the builder API
pub struct MealSearch;

impl MealSearch {
    /// Creates a new builder for a meal search
    ///
    /// # Example
    /// ```
    /// use tastoro::MealSearch;
    ///
    /// let builder = MealSearch::builder();
    /// ```
    pub fn builder() -> MealSearchBuilder {
        MealSearchBuilder::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_detail_conflicts_with_keyword() {
        let result = MealSearch::builder()
            .keyword("chicken")
            .detail("52940")
            .config(MealDbConfig::default())
            .build()
            .await;

        assert!(matches!(result, Err(MealError::InvalidRequest(_))));
    }

    #[tokio::test]
    async fn test_area_after_detail_conflicts() {
        let result = MealSearch::builder()
            .detail("52940")
            .area("Indian")
            .config(MealDbConfig::default())
            .build()
            .await;

        assert!(matches!(result, Err(MealError::InvalidRequest(_))));
    }

    #[test]
    fn test_areas_collects_every_area() {
        let builder = MealSearch::builder().areas(["Indian", "Chinese"]);
        match builder.target {
            SearchTarget::Meals { areas, keyword } => {
                assert_eq!(areas, vec!["Indian", "Chinese"]);
                assert!(keyword.is_none());
            }
            SearchTarget::Detail(_) => panic!("expected a meal search"),
        }
    }
}
