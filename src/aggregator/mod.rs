pub mod merge;

use log::{debug, info, warn};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;

use crate::config::{FailurePolicy, MealDbConfig};
use crate::error::MealError;
use crate::model::Meal;
use crate::source::{MealDbSource, MealSource};

/// Fans a query out over a [`MealSource`] and shapes the merged result.
///
/// The aggregator keeps no state between calls; every `query` is an
/// independent unit of work and clones share the same source.
#[derive(Clone)]
pub struct MealAggregator {
    source: Arc<dyn MealSource>,
    default_keyword: String,
    branch_timeout: Duration,
    max_concurrent_branches: usize,
    failure_policy: FailurePolicy,
}

impl MealAggregator {
    /// Create an aggregator over `source` with default settings
    pub fn new(source: Arc<dyn MealSource>) -> Self {
        Self::with_config(source, &MealDbConfig::default())
    }

    pub fn with_config(source: Arc<dyn MealSource>, config: &MealDbConfig) -> Self {
        MealAggregator {
            source,
            default_keyword: config.default_keyword.clone(),
            branch_timeout: config.branch_timeout(),
            max_concurrent_branches: config.max_concurrent_branches.max(1),
            failure_policy: config.failure_policy,
        }
    }

    /// Build an aggregator talking to TheMealDB as described by `config`
    pub fn from_config(config: &MealDbConfig) -> Result<Self, MealError> {
        let source = MealDbSource::from_config(config)?;
        Ok(Self::with_config(Arc::new(source), config))
    }

    pub fn with_failure_policy(mut self, policy: FailurePolicy) -> Self {
        self.failure_policy = policy;
        self
    }

    pub fn with_branch_timeout(mut self, timeout: Duration) -> Self {
        self.branch_timeout = timeout;
        self
    }

    pub fn with_default_keyword(mut self, keyword: impl Into<String>) -> Self {
        self.default_keyword = keyword.into();
        self
    }

    pub fn with_max_concurrent_branches(mut self, limit: usize) -> Self {
        self.max_concurrent_branches = limit.max(1);
        self
    }

    pub fn failure_policy(&self) -> FailurePolicy {
        self.failure_policy
    }

    /// Search meals by keyword, optionally restricted to a set of areas.
    ///
    /// With no areas a single keyword search is issued. Otherwise one
    /// area search per area runs concurrently, each result is stamped with
    /// its area, and the merged list is filtered by `keyword` (case
    /// insensitive, empty keeps all) and deduplicated by id keeping the
    /// first record seen in area order.
    pub async fn query(&self, keyword: &str, areas: &[String]) -> Result<Vec<Meal>, MealError> {
        self.query_with_cancellation(keyword, areas, CancellationToken::new())
            .await
    }

    /// Like [`query`](Self::query), but gives up with
    /// [`MealError::Cancelled`] as soon as `token` is cancelled. In-flight
    /// branches are aborted.
    pub async fn query_with_cancellation(
        &self,
        keyword: &str,
        areas: &[String],
        token: CancellationToken,
    ) -> Result<Vec<Meal>, MealError> {
        let areas = merge::normalize_areas(areas)?;
        let keyword = keyword.trim();

        tokio::select! {
            biased;
            _ = token.cancelled() => {
                debug!("Query '{}' cancelled", keyword);
                Err(MealError::Cancelled)
            }
            result = self.run(keyword, areas) => result,
        }
    }

    /// Full record for one meal. No aggregation takes place.
    pub async fn fetch_detail(&self, id: &str) -> Result<Meal, MealError> {
        self.source.lookup_detail(id).await
    }

    pub async fn list_areas(&self) -> Result<Vec<String>, MealError> {
        self.source.list_areas().await
    }

    async fn run(&self, keyword: &str, areas: Vec<String>) -> Result<Vec<Meal>, MealError> {
        if areas.is_empty() {
            let keyword = if keyword.is_empty() {
                self.default_keyword.as_str()
            } else {
                keyword
            };
            let meals = within(self.branch_timeout, self.source.search_by_keyword(keyword)).await?;
            let meals = merge::dedup_first_seen(merge::filter_by_keyword(meals, keyword));
            info!("Keyword search '{}' returned {} meals", keyword, meals.len());
            return Ok(meals);
        }

        let candidates = self.fan_out(&areas).await?;
        let meals = merge::dedup_first_seen(merge::filter_by_keyword(candidates, keyword));
        info!(
            "Query '{}' over {} areas returned {} meals",
            keyword,
            areas.len(),
            meals.len()
        );
        Ok(meals)
    }

    /// Run one area search per area and concatenate the results in area
    /// order. Branch outcomes are gathered here and merged by this single
    /// task; branches never touch shared results.
    async fn fan_out(&self, areas: &[String]) -> Result<Vec<Meal>, MealError> {
        let semaphore = Arc::new(Semaphore::new(self.max_concurrent_branches));
        let mut join_set = JoinSet::new();

        for (index, area) in areas.iter().enumerate() {
            let source = Arc::clone(&self.source);
            let semaphore = Arc::clone(&semaphore);
            let area = area.clone();
            let timeout = self.branch_timeout;

            join_set.spawn(async move {
                let outcome = match semaphore.acquire_owned().await {
                    Ok(permit) => {
                        let result = within(timeout, source.search_by_area(&area)).await;
                        drop(permit);
                        result
                    }
                    Err(_) => Err(MealError::Cancelled),
                };
                (index, area, outcome)
            });
        }

        let mut branches: Vec<Option<Vec<Meal>>> = vec![None; areas.len()];
        let mut failures: Vec<(usize, MealError)> = Vec::new();

        while let Some(joined) = join_set.join_next().await {
            let (index, area, outcome) = match joined {
                Ok(branch) => branch,
                Err(e) if e.is_panic() => std::panic::resume_unwind(e.into_panic()),
                Err(_) => return Err(MealError::Cancelled),
            };

            match outcome {
                Ok(meals) => {
                    debug!("Area '{}' returned {} meals", area, meals.len());
                    branches[index] = Some(merge::stamp_area(meals, &area));
                }
                Err(err) => {
                    warn!("Area '{}' failed: {}", area, err);
                    let failure = MealError::PartialAggregationFailure {
                        area,
                        source: Box::new(err),
                    };
                    match self.failure_policy {
                        FailurePolicy::FailFast => {
                            join_set.abort_all();
                            return Err(failure);
                        }
                        FailurePolicy::Partial => failures.push((index, failure)),
                    }
                }
            }
        }

        if branches.iter().all(Option::is_none) {
            if let Some((_, failure)) = failures.into_iter().min_by_key(|(index, _)| *index) {
                return Err(failure);
            }
        } else if !failures.is_empty() {
            warn!(
                "Returning partial results: {} of {} areas failed",
                failures.len(),
                areas.len()
            );
        }

        Ok(branches.into_iter().flatten().flatten().collect())
    }
}

async fn within<T>(
    timeout: Duration,
    request: impl std::future::Future<Output = Result<T, MealError>>,
) -> Result<T, MealError> {
    match tokio::time::timeout(timeout, request).await {
        Ok(result) => result,
        Err(_) => Err(MealError::Timeout),
    }
}
