use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::Mutex;
use std::time::Duration;

use super::MealSource;
use crate::error::MealError;
use crate::model::Meal;

/// In-memory source for aggregator and session tests
#[derive(Default)]
pub struct FakeSource {
    pub keyword_meals: Vec<Meal>,
    pub area_meals: HashMap<String, Vec<Meal>>,
    pub failing_areas: HashSet<String>,
    pub delays: HashMap<String, Duration>,
    calls: Mutex<Vec<String>>,
}

impl FakeSource {
    pub fn with_area(mut self, area: &str, meals: Vec<Meal>) -> Self {
        self.area_meals.insert(area.to_string(), meals);
        self
    }

    pub fn with_keyword_meals(mut self, meals: Vec<Meal>) -> Self {
        self.keyword_meals = meals;
        self
    }

    pub fn failing(mut self, area: &str) -> Self {
        self.failing_areas.insert(area.to_string());
        self
    }

    pub fn delayed(mut self, key: &str, delay: Duration) -> Self {
        self.delays.insert(key.to_string(), delay);
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    async fn record(&self, call: String, key: &str) {
        self.calls.lock().unwrap().push(call);
        if let Some(delay) = self.delays.get(key) {
            tokio::time::sleep(*delay).await;
        }
    }
}

#[async_trait]
impl MealSource for FakeSource {
    async fn search_by_keyword(&self, keyword: &str) -> Result<Vec<Meal>, MealError> {
        self.record(format!("s={}", keyword), keyword).await;
        Ok(self.keyword_meals.clone())
    }

    async fn search_by_area(&self, area: &str) -> Result<Vec<Meal>, MealError> {
        self.record(format!("a={}", area), area).await;
        if self.failing_areas.contains(area) {
            return Err(MealError::EmptyResponse);
        }
        Ok(self.area_meals.get(area).cloned().unwrap_or_default())
    }

    async fn lookup_detail(&self, id: &str) -> Result<Meal, MealError> {
        self.record(format!("i={}", id), id).await;
        self.keyword_meals
            .iter()
            .chain(self.area_meals.values().flatten())
            .find(|meal| meal.id == id)
            .cloned()
            .ok_or_else(|| MealError::DecodeFailure(format!("no meal {}", id)))
    }

    async fn list_areas(&self) -> Result<Vec<String>, MealError> {
        self.record("list".to_string(), "list").await;
        let mut areas: Vec<String> = self.area_meals.keys().cloned().collect();
        areas.sort();
        Ok(areas)
    }
}
