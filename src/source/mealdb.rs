use async_trait::async_trait;
use log::debug;
use reqwest::Client;
use std::time::Duration;

use super::{wire, MealSource};
use crate::config::MealDbConfig;
use crate::error::MealError;
use crate::model::Meal;

/// [`MealSource`] backed by TheMealDB's public JSON API
#[derive(Debug, Clone)]
pub struct MealDbSource {
    client: Client,
    base_url: String,
}

impl MealDbSource {
    pub fn new(base_url: impl Into<String>, timeout: Option<Duration>) -> Result<Self, MealError> {
        let timeout = timeout.unwrap_or(Duration::from_secs(30));
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("tastoro/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    pub fn from_config(config: &MealDbConfig) -> Result<Self, MealError> {
        Self::new(config.base_url.clone(), Some(config.request_timeout()))
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn get(&self, endpoint: &str, query: &[(&str, &str)]) -> Result<Vec<u8>, MealError> {
        let url = format!("{}/{}", self.base_url, endpoint);
        debug!("GET {} {:?}", url, query);

        let response = self
            .client
            .get(&url)
            .query(query)
            .send()
            .await?
            .error_for_status()?;

        let body = response.bytes().await?;
        debug!("{} answered with {} bytes", endpoint, body.len());
        Ok(body.to_vec())
    }
}

fn require(value: &str, what: &str) -> Result<(), MealError> {
    if value.trim().is_empty() {
        return Err(MealError::InvalidRequest(format!("{} cannot be empty", what)));
    }
    Ok(())
}

#[async_trait]
impl MealSource for MealDbSource {
    async fn search_by_keyword(&self, keyword: &str) -> Result<Vec<Meal>, MealError> {
        require(keyword, "Search keyword")?;
        let body = self.get("search.php", &[("s", keyword.trim())]).await?;
        wire::parse_meal_list(&body)
    }

    async fn search_by_area(&self, area: &str) -> Result<Vec<Meal>, MealError> {
        require(area, "Area")?;
        let body = self.get("filter.php", &[("a", area.trim())]).await?;
        wire::parse_meal_list(&body)
    }

    async fn lookup_detail(&self, id: &str) -> Result<Meal, MealError> {
        require(id, "Meal id")?;
        let body = self.get("lookup.php", &[("i", id.trim())]).await?;
        wire::parse_meal_detail(&body, id.trim())
    }

    async fn list_areas(&self) -> Result<Vec<String>, MealError> {
        let body = self.get("list.php", &[("a", "list")]).await?;
        wire::parse_area_list(&body)
    }
}
