use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::types::chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::utils::nullable;

/// A portfolio project
#[derive(Debug, Serialize, Deserialize, sqlx::FromRow, Clone)]
pub struct Project {
    pub id: Uuid,
    pub name: String,
    pub slug: String,
    pub short_description: Option<String>,
    pub full_description: Option<String>,
    pub status: String,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub github_url: Option<String>,
    pub live_url: Option<String>,
    pub featured: bool,
    pub difficulty_level: Option<String>,
    pub image_url: Option<String>,
    pub demo_video_url: Option<String>,
    pub display_order: i32,
    pub view_count: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Skill summary attached to a project
#[derive(Debug, Serialize, Deserialize, sqlx::FromRow, Clone)]
pub struct ProjectSkill {
    #[serde(skip)]
    pub project_id: Uuid,
    pub id: Uuid,
    pub name: String,
    pub category: Option<String>,
    pub proficiency_level: Option<i32>,
    pub icon: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ProjectWithSkills {
    pub project: Project,
    pub skills: Vec<ProjectSkill>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ProjectFilter {
    pub featured: Option<bool>,
}

#[derive(Debug, Deserialize)]
pub struct CreateProjectRequest {
    #[serde(default)]
    pub name: String,
    pub slug: Option<String>,
    pub short_description: Option<String>,
    pub full_description: Option<String>,
    pub status: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub github_url: Option<String>,
    pub live_url: Option<String>,
    #[serde(default)]
    pub featured: bool,
    pub difficulty_level: Option<String>,
    pub image_url: Option<String>,
    pub demo_video_url: Option<String>,
    pub display_order: Option<i32>,
    #[serde(default)]
    pub skill_ids: Vec<Uuid>,
}

#[derive(Debug, Default, Deserialize)]
pub struct UpdateProjectRequest {
    pub name: Option<String>,
    pub slug: Option<String>,
    #[serde(default, deserialize_with = "nullable")]
    pub short_description: Option<Option<String>>,
    #[serde(default, deserialize_with = "nullable")]
    pub full_description: Option<Option<String>>,
    pub status: Option<String>,
    #[serde(default, deserialize_with = "nullable")]
    pub start_date: Option<Option<NaiveDate>>,
    #[serde(default, deserialize_with = "nullable")]
    pub end_date: Option<Option<NaiveDate>>,
    #[serde(default, deserialize_with = "nullable")]
    pub github_url: Option<Option<String>>,
    #[serde(default, deserialize_with = "nullable")]
    pub live_url: Option<Option<String>>,
    pub featured: Option<bool>,
    #[serde(default, deserialize_with = "nullable")]
    pub difficulty_level: Option<Option<String>>,
    #[serde(default, deserialize_with = "nullable")]
    pub image_url: Option<Option<String>>,
    #[serde(default, deserialize_with = "nullable")]
    pub demo_video_url: Option<Option<String>>,
    pub display_order: Option<i32>,
    /// Replaces the project's skill links when present
    pub skill_ids: Option<Vec<Uuid>>,
}
