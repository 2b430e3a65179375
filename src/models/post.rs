use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::media::media_url;

#[derive(
    Debug, Default, Deserialize, Serialize, Clone, Copy, sqlx::Type, PartialEq, Eq, PartialOrd, Ord,
)]
#[sqlx(type_name = "post_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum PostStatus {
    #[default]
    Draft,
    Published,
}

/// Which posts a query may return. Every post query states this explicitly.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visibility {
    Published,
    All,
}

impl Visibility {
    pub fn admits(self, status: PostStatus) -> bool {
        match self {
            Self::Published => status == PostStatus::Published,
            Self::All => true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PostOrdering {
    /// status, then newest first
    #[default]
    StatusThenNewest,
    Newest,
}

#[derive(Debug, Deserialize, Serialize, sqlx::FromRow, Clone, PartialEq)]
pub struct Post {
    pub id: Uuid,
    #[serde(rename = "category")]
    pub category_id: Uuid,
    pub title: String,
    pub description: String,
    pub content: String,
    pub thumbnail: String,
    pub keywords: String,
    pub slug: String,
    pub status: PostStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Public list entry. `content` is left out to keep listings small.
#[derive(Debug, Serialize)]
pub struct PostSummary {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub thumbnail: String,
    pub slug: String,
    pub category: Uuid,
}

impl PostSummary {
    pub fn from_post(post: Post, media_base: &str) -> Self {
        Self {
            id: post.id,
            thumbnail: media_url(media_base, &post.thumbnail),
            title: post.title,
            description: post.description,
            slug: post.slug,
            category: post.category_id,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct PostDetail {
    pub id: Uuid,
    pub category: Uuid,
    pub title: String,
    pub description: String,
    pub content: String,
    pub thumbnail: String,
    pub keywords: String,
    pub slug: String,
    pub status: PostStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl PostDetail {
    pub fn from_post(post: Post, media_base: &str) -> Self {
        Self {
            id: post.id,
            category: post.category_id,
            thumbnail: media_url(media_base, &post.thumbnail),
            title: post.title,
            description: post.description,
            content: post.content,
            keywords: post.keywords,
            slug: post.slug,
            status: post.status,
            created_at: post.created_at,
            updated_at: post.updated_at,
        }
    }
}

#[derive(Debug, Deserialize, Validate, Clone)]
pub struct CreatePostDto {
    pub category: Uuid,
    #[validate(length(min = 1, max = 128, message = "Title must be between 1 and 128 characters"))]
    pub title: String,
    #[validate(length(
        min = 1,
        max = 256,
        message = "Description must be between 1 and 256 characters"
    ))]
    pub description: String,
    #[validate(length(min = 1, message = "Content is required"))]
    pub content: String,
    #[validate(length(min = 1, max = 255, message = "Thumbnail is required"))]
    pub thumbnail: String,
    #[validate(length(min = 1, max = 128, message = "Keywords must be between 1 and 128 characters"))]
    pub keywords: String,
    #[validate(length(max = 128, message = "Slug must be at most 128 characters"))]
    pub slug: Option<String>,
    pub status: Option<PostStatus>,
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize, Validate, Clone, Default)]
pub struct UpdatePostDto {
    pub category: Option<Uuid>,
    #[validate(length(min = 1, max = 128, message = "Title must be between 1 and 128 characters"))]
    pub title: Option<String>,
    #[validate(length(
        min = 1,
        max = 256,
        message = "Description must be between 1 and 256 characters"
    ))]
    pub description: Option<String>,
    #[validate(length(min = 1, message = "Content is required"))]
    pub content: Option<String>,
    #[validate(length(min = 1, max = 255, message = "Thumbnail is required"))]
    pub thumbnail: Option<String>,
    #[validate(length(min = 1, max = 128, message = "Keywords must be between 1 and 128 characters"))]
    pub keywords: Option<String>,
    #[validate(length(max = 128, message = "Slug must be at most 128 characters"))]
    pub slug: Option<String>,
    pub status: Option<PostStatus>,
}

#[derive(Debug, Deserialize, Default, Clone)]
pub struct PostFilter {
    pub search: Option<String>,
    pub status: Option<PostStatus>,
    pub category: Option<Uuid>,
    pub updated_since: Option<DateTime<Utc>>,
}
