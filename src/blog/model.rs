use serde::{Deserialize, Serialize};
use sqlx::types::chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::utils::nullable;

pub const STATUS_PUBLISHED: &str = "published";
pub const STATUS_DRAFT: &str = "draft";

#[derive(Debug, Serialize, Deserialize, sqlx::FromRow, Clone)]
pub struct BlogPost {
    pub id: Uuid,
    pub title: String,
    pub slug: String,
    pub excerpt: Option<String>,
    pub content: String,
    pub status: String,
    pub published_at: Option<DateTime<Utc>>,
    pub reading_time_minutes: Option<i32>,
    pub view_count: i32,
    pub featured: bool,
    pub series: Option<String>,
    pub series_order: Option<i32>,
    pub cover_image_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
pub struct CreateBlogPostRequest {
    #[serde(default)]
    pub title: String,
    pub slug: Option<String>,
    pub excerpt: Option<String>,
    #[serde(default)]
    pub content: String,
    pub status: Option<String>,
    pub published_at: Option<DateTime<Utc>>,
    pub reading_time_minutes: Option<i32>,
    #[serde(default)]
    pub featured: bool,
    pub series: Option<String>,
    pub series_order: Option<i32>,
    pub cover_image_url: Option<String>,
}

impl CreateBlogPostRequest {
    pub fn status(&self) -> &str {
        self.status
            .as_deref()
            .filter(|s| !s.is_empty())
            .unwrap_or(STATUS_DRAFT)
    }

    /// Publication time to store; published posts without one go out now.
    pub fn effective_published_at(&self, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
        match self.published_at {
            Some(at) => Some(at),
            None if self.status() == STATUS_PUBLISHED => Some(now),
            None => None,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct UpdateBlogPostRequest {
    pub title: Option<String>,
    pub slug: Option<String>,
    #[serde(default, deserialize_with = "nullable")]
    pub excerpt: Option<Option<String>>,
    pub content: Option<String>,
    pub status: Option<String>,
    #[serde(default, deserialize_with = "nullable")]
    pub published_at: Option<Option<DateTime<Utc>>>,
    #[serde(default, deserialize_with = "nullable")]
    pub reading_time_minutes: Option<Option<i32>>,
    pub featured: Option<bool>,
    #[serde(default, deserialize_with = "nullable")]
    pub series: Option<Option<String>>,
    #[serde(default, deserialize_with = "nullable")]
    pub series_order: Option<Option<i32>>,
    #[serde(default, deserialize_with = "nullable")]
    pub cover_image_url: Option<Option<String>>,
}
