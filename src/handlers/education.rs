use axum::{extract::State, http::StatusCode, Json};
use std::sync::Arc;
use uuid::Uuid;

use crate::education::{
    CreateEducationRequest, CreateModuleRequest, Education, EducationDetail, EducationService,
    EducationWithModules, Module, UpdateEducationRequest, UpdateModuleRequest,
};
use crate::error::ApiError;
use crate::extract::{AppJson, AppPath};
use crate::models::{ApiResponse, MessageResponse};

pub async fn list_education(
    State(service): State<Arc<EducationService>>,
) -> Result<Json<ApiResponse<Vec<EducationWithModules>>>, ApiError> {
    let education = service.list_education().await?;
    Ok(Json(ApiResponse::list(education)))
}

pub async fn get_education(
    State(service): State<Arc<EducationService>>,
    AppPath(slug): AppPath<String>,
) -> Result<Json<ApiResponse<EducationDetail>>, ApiError> {
    let detail = service.get_by_slug(&slug).await?;
    Ok(Json(ApiResponse::ok(detail)))
}

pub async fn create_education(
    State(service): State<Arc<EducationService>>,
    AppJson(request): AppJson<CreateEducationRequest>,
) -> Result<(StatusCode, Json<ApiResponse<Education>>), ApiError> {
    let education = service.create_education(request).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::ok(education))))
}

pub async fn update_education(
    State(service): State<Arc<EducationService>>,
    AppPath(id): AppPath<Uuid>,
    AppJson(request): AppJson<UpdateEducationRequest>,
) -> Result<Json<ApiResponse<Education>>, ApiError> {
    let education = service.update_education(id, request).await?;
    Ok(Json(ApiResponse::ok(education)))
}

pub async fn delete_education(
    State(service): State<Arc<EducationService>>,
    AppPath(id): AppPath<Uuid>,
) -> Result<Json<MessageResponse>, ApiError> {
    service.delete_education(id).await?;
    Ok(Json(MessageResponse::new("Education deleted successfully")))
}

pub async fn create_module(
    State(service): State<Arc<EducationService>>,
    AppJson(request): AppJson<CreateModuleRequest>,
) -> Result<(StatusCode, Json<ApiResponse<Module>>), ApiError> {
    let module = service.create_module(request).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::ok(module))))
}

pub async fn update_module(
    State(service): State<Arc<EducationService>>,
    AppPath(id): AppPath<Uuid>,
    AppJson(request): AppJson<UpdateModuleRequest>,
) -> Result<Json<ApiResponse<Module>>, ApiError> {
    let module = service.update_module(id, request).await?;
    Ok(Json(ApiResponse::ok(module)))
}

pub async fn delete_module(
    State(service): State<Arc<EducationService>>,
    AppPath(id): AppPath<Uuid>,
) -> Result<Json<MessageResponse>, ApiError> {
    service.delete_module(id).await?;
    Ok(Json(MessageResponse::new("Module deleted successfully")))
}
