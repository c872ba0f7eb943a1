use chrono::Utc;
use sqlx::{PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use crate::blog::model::{BlogPost, CreateBlogPostRequest, UpdateBlogPostRequest};
use crate::error::ApiError;
use crate::utils::{is_blank, push_set, slug_or_generate};

const POST_COLUMNS: &str = "id, title, slug, excerpt, content, status, published_at, \
     reading_time_minutes, view_count, featured, series, series_order, cover_image_url, \
     created_at, updated_at";

#[derive(Clone)]
pub struct BlogService {
    db_pool: PgPool,
}

impl BlogService {
    pub fn new(db_pool: PgPool) -> Self {
        Self { db_pool }
    }

    /// Published posts whose publication time has passed, newest first
    pub async fn list_published(&self) -> Result<Vec<BlogPost>, ApiError> {
        let posts = sqlx::query_as::<_, BlogPost>(&format!(
            r#"
            SELECT {}
            FROM blog_posts
            WHERE status = 'published' AND published_at <= $1
            ORDER BY published_at DESC
            "#,
            POST_COLUMNS
        ))
        .bind(Utc::now())
        .fetch_all(&self.db_pool)
        .await?;

        Ok(posts)
    }

    pub async fn get_by_slug(&self, slug: &str) -> Result<BlogPost, ApiError> {
        let post = sqlx::query_as::<_, BlogPost>(&format!(
            "SELECT {} FROM blog_posts WHERE slug = $1 AND status = 'published'",
            POST_COLUMNS
        ))
        .bind(slug)
        .fetch_optional(&self.db_pool)
        .await?
        .ok_or_else(|| ApiError::NotFound("Blog post not found".to_string()))?;

        if let Err(e) =
            sqlx::query("UPDATE blog_posts SET view_count = view_count + 1 WHERE id = $1")
                .bind(post.id)
                .execute(&self.db_pool)
                .await
        {
            tracing::warn!(post_id = %post.id, error = %e, "Failed to bump view count");
        }

        Ok(post)
    }

    /// Every post including drafts, for the admin dashboard
    pub async fn list_all(&self) -> Result<Vec<BlogPost>, ApiError> {
        let posts = sqlx::query_as::<_, BlogPost>(&format!(
            "SELECT {} FROM blog_posts ORDER BY created_at DESC",
            POST_COLUMNS
        ))
        .fetch_all(&self.db_pool)
        .await?;

        Ok(posts)
    }

    pub async fn create_post(&self, request: CreateBlogPostRequest) -> Result<BlogPost, ApiError> {
        if is_blank(&request.title) || is_blank(&request.content) {
            return Err(ApiError::BadRequest(
                "Title and content are required".to_string(),
            ));
        }

        let slug = slug_or_generate(request.slug.clone(), &request.title);
        let published_at = request.effective_published_at(Utc::now());

        let post = sqlx::query_as::<_, BlogPost>(&format!(
            r#"
            INSERT INTO blog_posts (
                title, slug, excerpt, content, status, published_at,
                reading_time_minutes, featured, series, series_order, cover_image_url
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            RETURNING {}
            "#,
            POST_COLUMNS
        ))
        .bind(&request.title)
        .bind(&slug)
        .bind(&request.excerpt)
        .bind(&request.content)
        .bind(request.status())
        .bind(published_at)
        .bind(request.reading_time_minutes)
        .bind(request.featured)
        .bind(&request.series)
        .bind(request.series_order)
        .bind(&request.cover_image_url)
        .fetch_one(&self.db_pool)
        .await?;

        tracing::info!(post_id = %post.id, slug = %post.slug, status = %post.status, "Blog post created");

        Ok(post)
    }

    pub async fn update_post(
        &self,
        id: Uuid,
        request: UpdateBlogPostRequest,
    ) -> Result<BlogPost, ApiError> {
        let mut builder =
            QueryBuilder::<Postgres>::new("UPDATE blog_posts SET updated_at = NOW()");
        push_set(&mut builder, "title", request.title);
        push_set(&mut builder, "slug", request.slug);
        push_set(&mut builder, "excerpt", request.excerpt);
        push_set(&mut builder, "content", request.content);
        push_set(&mut builder, "status", request.status);
        push_set(&mut builder, "published_at", request.published_at);
        push_set(&mut builder, "reading_time_minutes", request.reading_time_minutes);
        push_set(&mut builder, "featured", request.featured);
        push_set(&mut builder, "series", request.series);
        push_set(&mut builder, "series_order", request.series_order);
        push_set(&mut builder, "cover_image_url", request.cover_image_url);
        builder
            .push(" WHERE id = ")
            .push_bind(id)
            .push(" RETURNING ")
            .push(POST_COLUMNS);

        builder
            .build_query_as::<BlogPost>()
            .fetch_optional(&self.db_pool)
            .await?
            .ok_or_else(|| ApiError::NotFound("Blog post not found".to_string()))
    }

    pub async fn delete_post(&self, id: Uuid) -> Result<(), ApiError> {
        let result = sqlx::query("DELETE FROM blog_posts WHERE id = $1")
            .bind(id)
            .execute(&self.db_pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(ApiError::NotFound("Blog post not found".to_string()));
        }

        Ok(())
    }
}
