use axum::{
    extract::{Query, State},
    http::StatusCode,
    Json,
};
use std::sync::Arc;
use uuid::Uuid;

use crate::error::ApiError;
use crate::extract::{AppJson, AppPath};
use crate::models::{ApiResponse, MessageResponse};
use crate::skills::{
    CreateSkillRequest, Skill, SkillFilter, SkillService, SkillsResponse, UpdateSkillRequest,
};

/// GET /skills - Active skills with a per-category grouping
pub async fn list_skills(
    State(service): State<Arc<SkillService>>,
    Query(filter): Query<SkillFilter>,
) -> Result<Json<SkillsResponse>, ApiError> {
    let skills = service.list_skills(filter).await?;
    Ok(Json(SkillsResponse::new(skills)))
}

pub async fn create_skill(
    State(service): State<Arc<SkillService>>,
    AppJson(request): AppJson<CreateSkillRequest>,
) -> Result<(StatusCode, Json<ApiResponse<Skill>>), ApiError> {
    let skill = service.create_skill(request).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::ok(skill))))
}

pub async fn update_skill(
    State(service): State<Arc<SkillService>>,
    AppPath(id): AppPath<Uuid>,
    AppJson(request): AppJson<UpdateSkillRequest>,
) -> Result<Json<ApiResponse<Skill>>, ApiError> {
    let skill = service.update_skill(id, request).await?;
    Ok(Json(ApiResponse::ok(skill)))
}

pub async fn delete_skill(
    State(service): State<Arc<SkillService>>,
    AppPath(id): AppPath<Uuid>,
) -> Result<Json<MessageResponse>, ApiError> {
    service.delete_skill(id).await?;
    Ok(Json(MessageResponse::new("Skill deleted successfully")))
}
