use axum::{extract::State, http::StatusCode, Json};
use std::sync::Arc;
use uuid::Uuid;

use crate::blog::{BlogPost, BlogService, CreateBlogPostRequest, UpdateBlogPostRequest};
use crate::error::ApiError;
use crate::extract::{AppJson, AppPath};
use crate::models::{ApiResponse, MessageResponse};

/// GET /blog - Published posts only
pub async fn list_posts(
    State(service): State<Arc<BlogService>>,
) -> Result<Json<ApiResponse<Vec<BlogPost>>>, ApiError> {
    let posts = service.list_published().await?;
    Ok(Json(ApiResponse::list(posts)))
}

pub async fn get_post(
    State(service): State<Arc<BlogService>>,
    AppPath(slug): AppPath<String>,
) -> Result<Json<ApiResponse<BlogPost>>, ApiError> {
    let post = service.get_by_slug(&slug).await?;
    Ok(Json(ApiResponse::ok(post)))
}

/// GET /admin/blog - Drafts included
pub async fn list_all_posts(
    State(service): State<Arc<BlogService>>,
) -> Result<Json<ApiResponse<Vec<BlogPost>>>, ApiError> {
    let posts = service.list_all().await?;
    Ok(Json(ApiResponse::list(posts)))
}

pub async fn create_post(
    State(service): State<Arc<BlogService>>,
    AppJson(request): AppJson<CreateBlogPostRequest>,
) -> Result<(StatusCode, Json<ApiResponse<BlogPost>>), ApiError> {
    let post = service.create_post(request).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::ok(post))))
}

pub async fn update_post(
    State(service): State<Arc<BlogService>>,
    AppPath(id): AppPath<Uuid>,
    AppJson(request): AppJson<UpdateBlogPostRequest>,
) -> Result<Json<ApiResponse<BlogPost>>, ApiError> {
    let post = service.update_post(id, request).await?;
    Ok(Json(ApiResponse::ok(post)))
}

pub async fn delete_post(
    State(service): State<Arc<BlogService>>,
    AppPath(id): AppPath<Uuid>,
) -> Result<Json<MessageResponse>, ApiError> {
    service.delete_post(id).await?;
    Ok(Json(MessageResponse::new("Blog post deleted successfully")))
}
