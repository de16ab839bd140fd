//! Decoding of TheMealDB JSON payloads.
//!
//! Every endpoint answers with `{ "meals": [...] }`. A `null` or absent
//! `meals` field means "nothing found" and decodes to an empty list.

use log::warn;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{Map, Value};

use crate::error::MealError;
use crate::model::Meal;

/// Number of `strIngredientN` fields on a detail record
pub const INGREDIENT_SLOTS: usize = 20;

#[derive(Debug, Deserialize)]
struct Envelope<T> {
    meals: Option<Vec<T>>,
}

#[derive(Debug, Deserialize)]
struct SummaryRecord {
    #[serde(rename = "idMeal")]
    id: Option<String>,
    #[serde(rename = "strMeal")]
    name: Option<String>,
    #[serde(rename = "strMealThumb")]
    thumbnail: Option<String>,
}

#[derive(Debug, Deserialize)]
struct AreaRecord {
    #[serde(rename = "strArea")]
    area: Option<String>,
}

fn decode_envelope<T: DeserializeOwned>(body: &[u8]) -> Result<Vec<T>, MealError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Err(MealError::EmptyResponse);
    }

    let envelope: Envelope<T> = serde_json::from_slice(body)?;
    Ok(envelope.meals.unwrap_or_default())
}

fn non_blank(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
}

/// Parse a search or filter response into meal summaries.
///
/// Records without an id or a name are dropped with a warning.
pub fn parse_meal_list(body: &[u8]) -> Result<Vec<Meal>, MealError> {
    let records: Vec<SummaryRecord> = decode_envelope(body)?;

    let meals = records
        .into_iter()
        .filter_map(|record| {
            let id = non_blank(record.id.as_deref());
            let name = non_blank(record.name.as_deref());
            match (id, name) {
                (Some(id), Some(name)) => Some(Meal::new(
                    id,
                    name,
                    record.thumbnail.unwrap_or_default(),
                )),
                (id, _) => {
                    warn!("Skipping meal record without id or name (id: {:?})", id);
                    None
                }
            }
        })
        .collect();

    Ok(meals)
}

/// Parse a `lookup.php` response. An empty or missing `meals` array is a
/// decode failure here: a lookup by id must yield exactly one record.
pub fn parse_meal_detail(body: &[u8], id: &str) -> Result<Meal, MealError> {
    let records: Vec<Map<String, Value>> = decode_envelope(body)?;
    let record = records.into_iter().next().ok_or_else(|| {
        MealError::DecodeFailure(format!("lookup for meal '{}' returned no meals", id))
    })?;

    meal_from_detail(&record)
}

/// Parse a `list.php?a=list` response into area names
pub fn parse_area_list(body: &[u8]) -> Result<Vec<String>, MealError> {
    let records: Vec<AreaRecord> = decode_envelope(body)?;
    Ok(records
        .into_iter()
        .filter_map(|record| non_blank(record.area.as_deref()))
        .collect())
}

fn field(record: &Map<String, Value>, key: &str) -> Option<String> {
    non_blank(record.get(key).and_then(Value::as_str))
}

fn meal_from_detail(record: &Map<String, Value>) -> Result<Meal, MealError> {
    let id = field(record, "idMeal")
        .ok_or_else(|| MealError::DecodeFailure("detail record has no idMeal".to_string()))?;
    let name = field(record, "strMeal")
        .ok_or_else(|| MealError::DecodeFailure(format!("meal '{}' has no strMeal", id)))?;

    Ok(Meal {
        thumbnail_url: field(record, "strMealThumb").unwrap_or_default(),
        area: field(record, "strArea"),
        ingredients: Some(parse_ingredients(record)),
        instructions: field(record, "strInstructions"),
        category: field(record, "strCategory"),
        tags: field(record, "strTags").map(|tags| split_tags(&tags)),
        id,
        name,
    })
}

/// Collect `strIngredient1..=strIngredient20` in slot order.
///
/// Absent, null and whitespace-only slots are skipped; a gap does not end
/// the scan, every slot is checked.
pub fn parse_ingredients(record: &Map<String, Value>) -> Vec<String> {
    (1..=INGREDIENT_SLOTS)
        .filter_map(|slot| field(record, &format!("strIngredient{}", slot)))
        .collect()
}

fn split_tags(tags: &str) -> Vec<String> {
    tags.split(',')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(String::from)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FailureKind;
    use serde_json::json;

    #[test]
    fn test_null_meals_is_empty_list() {
        let meals = parse_meal_list(br#"{"meals": null}"#).unwrap();
        assert!(meals.is_empty());
    }

    #[test]
    fn test_missing_meals_is_empty_list() {
        let meals = parse_meal_list(b"{}").unwrap();
        assert!(meals.is_empty());
    }

    #[test]
    fn test_empty_body() {
        let err = parse_meal_list(b"").unwrap_err();
        assert_eq!(err.kind(), FailureKind::EmptyResponse);

        let err = parse_meal_list(b"  \n").unwrap_err();
        assert_eq!(err.kind(), FailureKind::EmptyResponse);
    }

    #[test]
    fn test_malformed_body() {
        let err = parse_meal_list(b"<html>oops</html>").unwrap_err();
        assert_eq!(err.kind(), FailureKind::DecodeFailure);

        let err = parse_meal_list(br#"{"meals": "Invalid ID"}"#).unwrap_err();
        assert_eq!(err.kind(), FailureKind::DecodeFailure);
    }

    #[test]
    fn test_parse_meal_list() {
        let body = json!({
            "meals": [
                {"idMeal": "52795", "strMeal": "Chicken Handi", "strMealThumb": "https://img/handi.jpg"},
                {"idMeal": "52956", "strMeal": "Chicken Congee", "strMealThumb": null},
                {"idMeal": "", "strMeal": "Nameless id"},
                {"strMeal": "No id at all"}
            ]
        })
        .to_string();

        let meals = parse_meal_list(body.as_bytes()).unwrap();
        assert_eq!(meals.len(), 2);
        assert_eq!(meals[0].id, "52795");
        assert_eq!(meals[0].thumbnail_url, "https://img/handi.jpg");
        assert_eq!(meals[1].thumbnail_url, "");
        assert!(meals.iter().all(|m| m.area.is_none() && m.ingredients.is_none()));
    }

    #[test]
    fn test_ingredients_skip_blanks_and_keep_order() {
        let mut record = Map::new();
        record.insert("strIngredient1".into(), json!("Salt"));
        record.insert("strIngredient2".into(), json!(""));
        record.insert("strIngredient3".into(), json!("Pepper"));

        assert_eq!(parse_ingredients(&record), vec!["Salt", "Pepper"]);
    }

    #[test]
    fn test_ingredients_scan_all_slots() {
        let mut record = Map::new();
        record.insert("strIngredient1".into(), json!("Rice"));
        record.insert("strIngredient2".into(), json!("   "));
        record.insert("strIngredient3".into(), Value::Null);
        record.insert("strIngredient19".into(), json!(" Lime "));
        record.insert("strIngredient20".into(), json!("Coriander"));
        record.insert("strIngredient21".into(), json!("Ignored"));

        assert_eq!(parse_ingredients(&record), vec!["Rice", "Lime", "Coriander"]);
    }

    #[test]
    fn test_parse_detail() {
        let body = json!({
            "meals": [{
                "idMeal": "52940",
                "strMeal": "Brown Stew Chicken",
                "strCategory": "Chicken",
                "strArea": "Jamaican",
                "strInstructions": "Squeeze lime over chicken.",
                "strMealThumb": "https://img/stew.jpg",
                "strTags": "Stew, ,Caribbean",
                "strIngredient1": "Chicken",
                "strIngredient2": "Tomato",
                "strIngredient3": "",
                "strIngredient4": null
            }]
        })
        .to_string();

        let meal = parse_meal_detail(body.as_bytes(), "52940").unwrap();
        assert_eq!(meal.id, "52940");
        assert_eq!(meal.area.as_deref(), Some("Jamaican"));
        assert_eq!(meal.category.as_deref(), Some("Chicken"));
        assert_eq!(meal.instructions.as_deref(), Some("Squeeze lime over chicken."));
        assert_eq!(meal.ingredients.unwrap(), vec!["Chicken", "Tomato"]);
        assert_eq!(meal.tags.unwrap(), vec!["Stew", "Caribbean"]);
    }

    #[test]
    fn test_detail_requires_a_record() {
        let err = parse_meal_detail(br#"{"meals": null}"#, "1").unwrap_err();
        assert_eq!(err.kind(), FailureKind::DecodeFailure);

        let err = parse_meal_detail(br#"{"meals": []}"#, "1").unwrap_err();
        assert_eq!(err.kind(), FailureKind::DecodeFailure);
    }

    #[test]
    fn test_parse_area_list() {
        let body = br#"{"meals": [{"strArea": "American"}, {"strArea": ""}, {"strArea": "British"}]}"#;
        assert_eq!(parse_area_list(body).unwrap(), vec!["American", "British"]);
    }
}
