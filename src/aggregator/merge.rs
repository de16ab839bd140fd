use std::collections::HashSet;

use crate::error::MealError;
use crate::model::Meal;

/// Trim the requested areas and drop repeats, keeping first occurrence.
pub fn normalize_areas(areas: &[String]) -> Result<Vec<String>, MealError> {
    let mut seen = HashSet::new();
    let mut normalized = Vec::with_capacity(areas.len());

    for area in areas {
        let area = area.trim();
        if area.is_empty() {
            return Err(MealError::InvalidRequest(
                "Area names cannot be blank".to_string(),
            ));
        }
        if seen.insert(area.to_string()) {
            normalized.push(area.to_string());
        }
    }

    Ok(normalized)
}

pub fn stamp_area(meals: Vec<Meal>, area: &str) -> Vec<Meal> {
    meals.into_iter().map(|meal| meal.with_area(area)).collect()
}

/// Keep meals whose name contains `keyword`, ignoring case.
/// An empty keyword keeps everything.
pub fn filter_by_keyword(meals: Vec<Meal>, keyword: &str) -> Vec<Meal> {
    if keyword.is_empty() {
        return meals;
    }
    meals
        .into_iter()
        .filter(|meal| meal.name_contains(keyword))
        .collect()
}

/// One meal per id. The first record seen wins and the output keeps
/// first-seen order.
pub fn dedup_first_seen(meals: Vec<Meal>) -> Vec<Meal> {
    let mut seen = HashSet::new();
    meals
        .into_iter()
        .filter(|meal| seen.insert(meal.id.clone()))
        .collect()
}
