use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::types::chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::utils::nullable;

/// A degree or qualification
#[derive(Debug, Serialize, Deserialize, sqlx::FromRow, Clone)]
pub struct Education {
    pub id: Uuid,
    pub degree: String,
    pub institution: String,
    pub field_of_study: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub grade: Option<String>,
    pub description: Option<String>,
    pub slug: String,
    pub display_order: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A course taken as part of a degree
#[derive(Debug, Serialize, Deserialize, sqlx::FromRow, Clone)]
pub struct Module {
    pub id: Uuid,
    pub education_id: Uuid,
    pub name: String,
    pub code: Option<String>,
    pub grade: Option<String>,
    pub credits: Option<i32>,
    pub semester: Option<String>,
    pub description: Option<String>,
    pub detailed_content: Option<serde_json::Value>,
    pub display_order: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// List item: an education entry with its modules inlined
#[derive(Debug, Serialize)]
pub struct EducationWithModules {
    #[serde(flatten)]
    pub education: Education,
    pub modules: Vec<Module>,
}

/// Detail view returned by slug lookups
#[derive(Debug, Serialize)]
pub struct EducationDetail {
    pub education: Education,
    pub modules: Vec<Module>,
}

#[derive(Debug, Deserialize)]
pub struct CreateEducationRequest {
    #[serde(default)]
    pub degree: String,
    #[serde(default)]
    pub institution: String,
    pub field_of_study: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub grade: Option<String>,
    pub description: Option<String>,
    pub slug: Option<String>,
    pub display_order: Option<i32>,
}

#[derive(Debug, Default, Deserialize)]
pub struct UpdateEducationRequest {
    pub degree: Option<String>,
    pub institution: Option<String>,
    #[serde(default, deserialize_with = "nullable")]
    pub field_of_study: Option<Option<String>>,
    #[serde(default, deserialize_with = "nullable")]
    pub start_date: Option<Option<NaiveDate>>,
    #[serde(default, deserialize_with = "nullable")]
    pub end_date: Option<Option<NaiveDate>>,
    #[serde(default, deserialize_with = "nullable")]
    pub grade: Option<Option<String>>,
    #[serde(default, deserialize_with = "nullable")]
    pub description: Option<Option<String>>,
    pub slug: Option<String>,
    pub display_order: Option<i32>,
}

#[derive(Debug, Deserialize)]
pub struct CreateModuleRequest {
    pub education_id: Uuid,
    #[serde(default)]
    pub name: String,
    pub code: Option<String>,
    pub grade: Option<String>,
    pub credits: Option<i32>,
    pub semester: Option<String>,
    pub description: Option<String>,
    pub detailed_content: Option<serde_json::Value>,
    pub display_order: Option<i32>,
}

#[derive(Debug, Default, Deserialize)]
pub struct UpdateModuleRequest {
    pub name: Option<String>,
    #[serde(default, deserialize_with = "nullable")]
    pub code: Option<Option<String>>,
    #[serde(default, deserialize_with = "nullable")]
    pub grade: Option<Option<String>>,
    #[serde(default, deserialize_with = "nullable")]
    pub credits: Option<Option<i32>>,
    #[serde(default, deserialize_with = "nullable")]
    pub semester: Option<Option<String>>,
    #[serde(default, deserialize_with = "nullable")]
    pub description: Option<Option<String>>,
    #[serde(default, deserialize_with = "nullable")]
    pub detailed_content: Option<Option<serde_json::Value>>,
    pub display_order: Option<i32>,
}
