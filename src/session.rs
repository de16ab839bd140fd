//! Ordering of overlapping queries from one consumer.
//!
//! A search screen fires a new query every time the keyword or the area
//! selection changes. Without coordination a slow, older query can finish
//! after a newer one and overwrite its results. [`QuerySession`] numbers
//! every submission, cancels the one it replaces, and only hands back
//! results that belong to the latest submission.

use log::debug;
use std::sync::Mutex;
use tokio_util::sync::CancellationToken;

use crate::aggregator::MealAggregator;
use crate::error::MealError;
use crate::model::Meal;

/// What became of a submitted query
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryOutcome {
    /// The query is still the latest one; these are its results
    Current { generation: u64, meals: Vec<Meal> },
    /// A newer submission (or `cancel`) replaced this query; discard it
    Superseded { generation: u64 },
}

impl QueryOutcome {
    pub fn generation(&self) -> u64 {
        match self {
            QueryOutcome::Current { generation, .. } | QueryOutcome::Superseded { generation } => {
                *generation
            }
        }
    }

    pub fn into_meals(self) -> Option<Vec<Meal>> {
        match self {
            QueryOutcome::Current { meals, .. } => Some(meals),
            QueryOutcome::Superseded { .. } => None,
        }
    }
}

struct Latest {
    generation: u64,
    token: CancellationToken,
}

pub struct QuerySession {
    aggregator: MealAggregator,
    latest: Mutex<Latest>,
}

impl QuerySession {
    pub fn new(aggregator: MealAggregator) -> Self {
        QuerySession {
            aggregator,
            latest: Mutex::new(Latest {
                generation: 0,
                token: CancellationToken::new(),
            }),
        }
    }

    pub fn aggregator(&self) -> &MealAggregator {
        &self.aggregator
    }

    /// Generation number of the most recent submission (0 before any)
    pub fn latest_generation(&self) -> u64 {
        self.lock().generation
    }

    /// Run a query, replacing whichever query this session ran before.
    ///
    /// Errors of a superseded query are swallowed along with its results.
    pub async fn submit(&self, keyword: &str, areas: &[String]) -> Result<QueryOutcome, MealError> {
        let (generation, token) = {
            let mut latest = self.lock();
            latest.token.cancel();
            latest.generation += 1;
            latest.token = CancellationToken::new();
            (latest.generation, latest.token.clone())
        };

        let result = self
            .aggregator
            .query_with_cancellation(keyword, areas, token)
            .await;

        if !self.is_latest(generation) {
            debug!("Discarding superseded query #{}", generation);
            return Ok(QueryOutcome::Superseded { generation });
        }

        match result {
            Ok(meals) => Ok(QueryOutcome::Current { generation, meals }),
            Err(MealError::Cancelled) => Ok(QueryOutcome::Superseded { generation }),
            Err(e) => Err(e),
        }
    }

    /// Cancel the in-flight query, if any. Its `submit` call reports
    /// `Superseded`.
    pub fn cancel(&self) {
        let mut latest = self.lock();
        latest.token.cancel();
        latest.generation += 1;
    }

    fn is_latest(&self, generation: u64) -> bool {
        self.lock().generation == generation
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Latest> {
        // The guarded state is two plain fields that are always left
        // consistent, so a poisoned lock is still usable.
        self.latest.lock().unwrap_or_else(|e| e.into_inner())
    }
}
