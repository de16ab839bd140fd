use serde::Serialize;
use std::hash::{Hash, Hasher};

/// One recipe result.
///
/// `id` is the identity of a meal: two records with the same id compare
/// equal and hash the same regardless of the other fields.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Meal {
    pub id: String,
    pub name: String,
    pub thumbnail_url: String,
    /// Cuisine tag, set by detail lookup or stamped by an area search
    #[serde(skip_serializing_if = "Option::is_none")]
    pub area: Option<String>,
    /// Ordered ingredient names, detail lookup only
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ingredients: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub instructions: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
}

impl Meal {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        thumbnail_url: impl Into<String>,
    ) -> Self {
        Meal {
            id: id.into(),
            name: name.into(),
            thumbnail_url: thumbnail_url.into(),
            ..Default::default()
        }
    }

    pub fn with_area(mut self, area: impl Into<String>) -> Self {
        self.area = Some(area.into());
        self
    }

    /// Case-insensitive substring match on the meal name
    pub fn name_contains(&self, keyword: &str) -> bool {
        self.name.to_lowercase().contains(&keyword.to_lowercase())
    }
}

impl PartialEq for Meal {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Meal {}

impl Hash for Meal {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}
