use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::types::chrono::{DateTime, Utc};
use std::collections::BTreeMap;
use uuid::Uuid;

use crate::utils::nullable;

/// Bucket for skills without a category
pub const UNCATEGORISED: &str = "Other";

/// A technical skill
#[derive(Debug, Serialize, Deserialize, sqlx::FromRow, Clone)]
pub struct Skill {
    pub id: Uuid,
    pub name: String,
    pub category: Option<String>,
    pub proficiency_level: Option<i32>,
    pub years_experience: Option<f64>,
    pub status: String,
    pub first_learned_date: Option<NaiveDate>,
    pub last_used_date: Option<NaiveDate>,
    pub description: Option<String>,
    pub icon: Option<String>,
    pub display_order: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
pub struct SkillFilter {
    pub category: Option<String>,
}

/// Skills list with a per-category grouping
#[derive(Debug, Serialize)]
pub struct SkillsResponse {
    pub success: bool,
    pub data: Vec<Skill>,
    pub by_category: BTreeMap<String, Vec<Skill>>,
    pub count: usize,
}

impl SkillsResponse {
    pub fn new(skills: Vec<Skill>) -> Self {
        Self {
            success: true,
            by_category: group_by_category(&skills),
            count: skills.len(),
            data: skills,
        }
    }
}

/// Group skills by category, keeping their order inside each group
pub fn group_by_category(skills: &[Skill]) -> BTreeMap<String, Vec<Skill>> {
    let mut groups: BTreeMap<String, Vec<Skill>> = BTreeMap::new();
    for skill in skills {
        let category = skill
            .category
            .clone()
            .unwrap_or_else(|| UNCATEGORISED.to_string());
        groups.entry(category).or_default().push(skill.clone());
    }
    groups
}

#[derive(Debug, Deserialize)]
pub struct CreateSkillRequest {
    #[serde(default)]
    pub name: String,
    pub category: Option<String>,
    pub proficiency_level: Option<i32>,
    pub years_experience: Option<f64>,
    pub status: Option<String>,
    pub first_learned_date: Option<NaiveDate>,
    pub last_used_date: Option<NaiveDate>,
    pub description: Option<String>,
    pub icon: Option<String>,
    pub display_order: Option<i32>,
}

#[derive(Debug, Default, Deserialize)]
pub struct UpdateSkillRequest {
    pub name: Option<String>,
    #[serde(default, deserialize_with = "nullable")]
    pub category: Option<Option<String>>,
    #[serde(default, deserialize_with = "nullable")]
    pub proficiency_level: Option<Option<i32>>,
    #[serde(default, deserialize_with = "nullable")]
    pub years_experience: Option<Option<f64>>,
    pub status: Option<String>,
    #[serde(default, deserialize_with = "nullable")]
    pub first_learned_date: Option<Option<NaiveDate>>,
    #[serde(default, deserialize_with = "nullable")]
    pub last_used_date: Option<Option<NaiveDate>>,
    #[serde(default, deserialize_with = "nullable")]
    pub description: Option<Option<String>>,
    #[serde(default, deserialize_with = "nullable")]
    pub icon: Option<Option<String>>,
    pub display_order: Option<i32>,
}
