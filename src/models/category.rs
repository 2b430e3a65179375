use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Deserialize, Serialize, sqlx::FromRow, Clone, PartialEq)]
pub struct Category {
    pub id: Uuid,
    #[serde(rename = "parent")]
    pub parent_id: Option<Uuid>,
    pub name: String,
    pub title: Option<String>,
    pub description: Option<String>,
    pub thumbnail: Option<String>,
    pub slug: String,
}

/// Body for creating a category and for replacing one with PUT.
#[derive(Debug, Deserialize, Validate, Clone, Default)]
pub struct CategoryDto {
    pub parent: Option<Uuid>,
    #[validate(length(min = 1, max = 255, message = "Name must be between 1 and 255 characters"))]
    pub name: String,
    #[validate(length(max = 255, message = "Title must be at most 255 characters"))]
    pub title: Option<String>,
    pub description: Option<String>,
    #[validate(length(max = 128, message = "Slug must be at most 128 characters"))]
    pub slug: Option<String>,
}

#[derive(Debug, Deserialize, Default, Clone)]
pub struct CategoryFilter {
    pub search: Option<String>,
    pub parent: Option<Uuid>,
}
