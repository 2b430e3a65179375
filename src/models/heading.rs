use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Deserialize, Serialize, sqlx::FromRow, Clone, PartialEq)]
pub struct Heading {
    pub id: Uuid,
    #[serde(rename = "post")]
    pub post_id: Uuid,
    pub title: String,
    pub slug: String,
    pub level: i16,
    pub order: i32,
}

#[derive(Debug, Deserialize, Validate, Clone)]
pub struct CreateHeadingDto {
    #[validate(length(min = 1, max = 255, message = "Title must be between 1 and 255 characters"))]
    pub title: String,
    #[validate(length(max = 255, message = "Slug must be at most 255 characters"))]
    pub slug: Option<String>,
    #[validate(range(min = 1, max = 6, message = "Level must be between 1 and 6"))]
    pub level: i16,
    #[validate(range(min = 0, message = "Order must be zero or positive"))]
    pub order: i32,
}

#[derive(Debug, Deserialize, Validate, Clone, Default)]
pub struct UpdateHeadingDto {
    #[validate(length(min = 1, max = 255, message = "Title must be between 1 and 255 characters"))]
    pub title: Option<String>,
    #[validate(length(max = 255, message = "Slug must be at most 255 characters"))]
    pub slug: Option<String>,
    #[validate(range(min = 1, max = 6, message = "Level must be between 1 and 6"))]
    pub level: Option<i16>,
    #[validate(range(min = 0, message = "Order must be zero or positive"))]
    pub order: Option<i32>,
}
