use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::collections::HashMap;
use uuid::Uuid;

/// One tracked entry in a category, owned by exactly one user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Item {
    pub id: Uuid,
    pub title: String,
    pub rating: f64,
    pub status: String,
    pub cover: String,
    pub user_id: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Item {
    /// Build a fresh item for `owner` with server-assigned id and timestamps
    pub fn new(owner: &str, fields: NewItem) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            title: fields.title,
            rating: fields.rating,
            status: fields.status,
            cover: fields.cover,
            user_id: owner.to_string(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Apply a partial update in place. Identity fields are never touched.
    pub fn apply(&mut self, patch: ItemPatch) {
        if let Some(title) = patch.title {
            self.title = title;
        }
        if let Some(rating) = patch.rating {
            self.rating = rating;
        }
        if let Some(status) = patch.status {
            self.status = status;
        }
        if let Some(cover) = patch.cover {
            self.cover = cover;
        }
        self.updated_at = Utc::now();
    }
}

/// Client payload for creating an item. Unknown fields (userId, id,
/// timestamps) are dropped by serde.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewItem {
    pub title: String,
    pub rating: f64,
    pub status: String,
    pub cover: String,
}

impl NewItem {
    pub fn validate(&self) -> Result<(), HashMap<String, String>> {
        let mut errors = HashMap::new();
        check_text(&mut errors, "title", Some(&self.title));
        check_text(&mut errors, "status", Some(&self.status));
        check_text(&mut errors, "cover", Some(&self.cover));
        check_rating(&mut errors, Some(self.rating));
        if errors.is_empty() { Ok(()) } else { Err(errors) }
    }
}

/// Partial update; absent fields keep their stored value
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ItemPatch {
    pub title: Option<String>,
    pub rating: Option<f64>,
    pub status: Option<String>,
    pub cover: Option<String>,
}

impl ItemPatch {
    pub fn validate(&self) -> Result<(), HashMap<String, String>> {
        let mut errors = HashMap::new();
        check_text(&mut errors, "title", self.title.as_deref());
        check_text(&mut errors, "status", self.status.as_deref());
        check_text(&mut errors, "cover", self.cover.as_deref());
        check_rating(&mut errors, self.rating);
        if errors.is_empty() { Ok(()) } else { Err(errors) }
    }
}

fn check_text(errors: &mut HashMap<String, String>, field: &str, value: Option<&str>) {
    if let Some(v) = value {
        if v.trim().is_empty() {
            errors.insert(field.to_string(), "must not be empty".to_string());
        }
    }
}

fn check_rating(errors: &mut HashMap<String, String>, value: Option<f64>) {
    if let Some(v) = value {
        if !v.is_finite() {
            errors.insert("rating".to_string(), "must be a finite number".to_string());
        }
    }
}
