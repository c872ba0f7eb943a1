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
use crate::projects::{
    CreateProjectRequest, Project, ProjectFilter, ProjectService, ProjectWithSkills,
    UpdateProjectRequest,
};

pub async fn list_projects(
    State(service): State<Arc<ProjectService>>,
    Query(filter): Query<ProjectFilter>,
) -> Result<Json<ApiResponse<Vec<ProjectWithSkills>>>, ApiError> {
    let projects = service.list_projects(filter).await?;
    Ok(Json(ApiResponse::list(projects)))
}

pub async fn get_project(
    State(service): State<Arc<ProjectService>>,
    AppPath(slug): AppPath<String>,
) -> Result<Json<ApiResponse<ProjectWithSkills>>, ApiError> {
    let project = service.get_by_slug(&slug).await?;
    Ok(Json(ApiResponse::ok(project)))
}

pub async fn create_project(
    State(service): State<Arc<ProjectService>>,
    AppJson(request): AppJson<CreateProjectRequest>,
) -> Result<(StatusCode, Json<ApiResponse<Project>>), ApiError> {
    let project = service.create_project(request).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::ok(project))))
}

pub async fn update_project(
    State(service): State<Arc<ProjectService>>,
    AppPath(id): AppPath<Uuid>,
    AppJson(request): AppJson<UpdateProjectRequest>,
) -> Result<Json<ApiResponse<Project>>, ApiError> {
    let project = service.update_project(id, request).await?;
    Ok(Json(ApiResponse::ok(project)))
}

pub async fn delete_project(
    State(service): State<Arc<ProjectService>>,
    AppPath(id): AppPath<Uuid>,
) -> Result<Json<MessageResponse>, ApiError> {
    service.delete_project(id).await?;
    Ok(Json(MessageResponse::new("Project deleted successfully")))
}
