//! Database-backed Service Tests
//!
//! These run against a real PostgreSQL instance and are ignored by default:
//!
//! ```text
//! TEST_DATABASE_URL=postgres://... cargo test -- --ignored
//! ```
//!
//! Each test creates the tables it needs and uses unique emails and slugs, so
//! tests can share one database and run in parallel.

use axum::http::HeaderValue;
use serde_json::json;
use sqlx::{postgres::PgPoolOptions, PgPool};
use std::sync::Arc;
use uuid::Uuid;

use portfolio_api::auth::{AuthService, JwtKeys, DEFAULT_TOKEN_TTL_DAYS};
use portfolio_api::blog::{BlogService, CreateBlogPostRequest, UpdateBlogPostRequest};
use portfolio_api::education::{
    CreateEducationRequest, CreateModuleRequest, EducationService, UpdateEducationRequest,
};
use portfolio_api::error::ApiError;
use portfolio_api::middleware::authorize;
use portfolio_api::models::LoginRequest;
use portfolio_api::projects::{
    CreateProjectRequest, ProjectFilter, ProjectService, UpdateProjectRequest,
};
use portfolio_api::skills::{CreateSkillRequest, SkillFilter, SkillService};

const SCHEMA: &[&str] = &[
    "SELECT pg_advisory_xact_lock(7270411)",
    r#"CREATE TABLE IF NOT EXISTS users (
        id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
        username TEXT NOT NULL,
        email TEXT NOT NULL UNIQUE,
        password_hash TEXT NOT NULL,
        is_admin BOOLEAN NOT NULL DEFAULT FALSE,
        created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
        updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
        last_login TIMESTAMPTZ
    )"#,
    r#"CREATE TABLE IF NOT EXISTS education (
        id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
        degree TEXT NOT NULL,
        institution TEXT NOT NULL,
        field_of_study TEXT,
        start_date DATE,
        end_date DATE,
        grade TEXT,
        description TEXT,
        slug TEXT NOT NULL UNIQUE,
        display_order INT NOT NULL DEFAULT 0,
        created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
        updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
    )"#,
    r#"CREATE TABLE IF NOT EXISTS modules (
        id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
        education_id UUID NOT NULL REFERENCES education(id) ON DELETE CASCADE,
        name TEXT NOT NULL,
        code TEXT,
        grade TEXT,
        credits INT,
        semester TEXT,
        description TEXT,
        detailed_content JSONB,
        display_order INT NOT NULL DEFAULT 0,
        created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
        updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
    )"#,
    r#"CREATE TABLE IF NOT EXISTS skills (
        id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
        name TEXT NOT NULL,
        category TEXT,
        proficiency_level INT,
        years_experience DOUBLE PRECISION,
        status TEXT NOT NULL DEFAULT 'active',
        first_learned_date DATE,
        last_used_date DATE,
        description TEXT,
        icon TEXT,
        display_order INT NOT NULL DEFAULT 0,
        created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
        updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
    )"#,
    r#"CREATE TABLE IF NOT EXISTS projects (
        id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
        name TEXT NOT NULL,
        slug TEXT NOT NULL UNIQUE,
        short_description TEXT,
        full_description TEXT,
        status TEXT NOT NULL DEFAULT 'active',
        start_date DATE,
        end_date DATE,
        github_url TEXT,
        live_url TEXT,
        featured BOOLEAN NOT NULL DEFAULT FALSE,
        difficulty_level TEXT,
        image_url TEXT,
        demo_video_url TEXT,
        display_order INT NOT NULL DEFAULT 0,
        view_count INT NOT NULL DEFAULT 0,
        created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
        updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
    )"#,
    r#"CREATE TABLE IF NOT EXISTS project_skills (
        project_id UUID NOT NULL REFERENCES projects(id) ON DELETE CASCADE,
        skill_id UUID NOT NULL REFERENCES skills(id) ON DELETE CASCADE,
        is_primary BOOLEAN NOT NULL DEFAULT FALSE,
        PRIMARY KEY (project_id, skill_id)
    )"#,
    r#"CREATE TABLE IF NOT EXISTS blog_posts (
        id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
        title TEXT NOT NULL,
        slug TEXT NOT NULL UNIQUE,
        excerpt TEXT,
        content TEXT NOT NULL,
        status TEXT NOT NULL DEFAULT 'draft',
        published_at TIMESTAMPTZ,
        reading_time_minutes INT,
        view_count INT NOT NULL DEFAULT 0,
        featured BOOLEAN NOT NULL DEFAULT FALSE,
        series TEXT,
        series_order INT,
        cover_image_url TEXT,
        created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
        updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
    )"#,
    // Lets a test make the last_login write fail for chosen users
    r#"CREATE OR REPLACE FUNCTION reject_last_login() RETURNS trigger AS $$
       BEGIN
           RAISE EXCEPTION 'last_login is read-only for %', NEW.username;
       END;
       $$ LANGUAGE plpgsql"#,
    "DROP TRIGGER IF EXISTS frozen_last_login ON users",
    r#"CREATE TRIGGER frozen_last_login
       BEFORE UPDATE OF last_login ON users
       FOR EACH ROW WHEN (NEW.username LIKE 'frozen-%')
       EXECUTE FUNCTION reject_last_login()"#,
];

async fn test_pool() -> PgPool {
    let url = std::env::var("TEST_DATABASE_URL").expect("TEST_DATABASE_URL must be set");
    let pool = PgPoolOptions::new()
        .max_connections(4)
        .connect(&url)
        .await
        .expect("Failed to connect to test database");

    let mut tx = pool.begin().await.unwrap();
    for statement in SCHEMA {
        sqlx::query(statement).execute(&mut *tx).await.unwrap();
    }
    tx.commit().await.unwrap();

    pool
}

fn unique(prefix: &str) -> String {
    format!("{}-{}", prefix, Uuid::new_v4().simple())
}

fn keys() -> Arc<JwtKeys> {
    Arc::new(JwtKeys::new("database-test-secret", DEFAULT_TOKEN_TTL_DAYS).unwrap())
}

/// Insert a user and return its email
async fn insert_user(pool: &PgPool, username: &str, password: &str, is_admin: bool) -> String {
    let email = format!("{}@example.com", unique("user"));
    let hash = bcrypt::hash(password, 4).unwrap();

    sqlx::query(
        "INSERT INTO users (username, email, password_hash, is_admin) VALUES ($1, $2, $3, $4)",
    )
    .bind(username)
    .bind(&email)
    .bind(&hash)
    .bind(is_admin)
    .execute(pool)
    .await
    .unwrap();

    email
}

fn login(email: &str, password: &str) -> LoginRequest {
    serde_json::from_value(json!({ "email": email, "password": password })).unwrap()
}

// ============================================================================
// Login flow
// ============================================================================

#[tokio::test]
#[ignore]
async fn test_login_unknown_email() {
    let pool = test_pool().await;
    let service = AuthService::new(pool, keys());

    let result = service
        .login(login(&format!("{}@example.com", unique("ghost")), "whatever"))
        .await;

    match result {
        Err(ApiError::BadRequest(message)) => assert_eq!(message, "Invalid credentials"),
        other => panic!("expected 400, got {:?}", other.map(|r| r.user)),
    }
}

#[tokio::test]
#[ignore]
async fn test_login_non_admin_is_forbidden() {
    let pool = test_pool().await;
    let email = insert_user(&pool, "visitor", "correct-password", false).await;
    let service = AuthService::new(pool, keys());

    // Privilege is checked before the password
    let result = service.login(login(&email, "wrong-password")).await;

    assert!(matches!(result, Err(ApiError::Forbidden(ref m)) if m == "Access denied"));
}

#[tokio::test]
#[ignore]
async fn test_login_wrong_password() {
    let pool = test_pool().await;
    let email = insert_user(&pool, "owner", "correct-password", true).await;
    let service = AuthService::new(pool, keys());

    let result = service.login(login(&email, "wrong-password")).await;

    assert!(matches!(result, Err(ApiError::Unauthorized(ref m)) if m == "Invalid credentials"));
}

#[tokio::test]
#[ignore]
async fn test_login_success_token_passes_guard() {
    let pool = test_pool().await;
    let email = insert_user(&pool, "owner", "correct-password", true).await;
    let keys = keys();
    let service = AuthService::new(pool.clone(), keys.clone());

    let response = service
        .login(login(&email, "correct-password"))
        .await
        .unwrap();

    assert_eq!(response.user.email, email);
    assert!(response.user.is_admin);

    let last_login: Option<chrono::DateTime<chrono::Utc>> =
        sqlx::query_scalar("SELECT last_login FROM users WHERE email = $1")
            .bind(&email)
            .fetch_one(&pool)
            .await
            .unwrap();
    assert!(last_login.is_some());

    let header = HeaderValue::from_str(&format!("Bearer {}", response.token)).unwrap();
    let identity = authorize(Some(&header), &keys).unwrap();
    assert_eq!(identity.user_id, response.user.id);
    assert_eq!(identity.username, "owner");
}

#[tokio::test]
#[ignore]
async fn test_login_survives_failed_last_login_update() {
    let pool = test_pool().await;
    let username = unique("frozen");
    let email = insert_user(&pool, &username, "correct-password", true).await;
    let service = AuthService::new(pool.clone(), keys());

    let response = service
        .login(login(&email, "correct-password"))
        .await
        .unwrap();
    assert!(!response.token.is_empty());

    let last_login: Option<chrono::DateTime<chrono::Utc>> =
        sqlx::query_scalar("SELECT last_login FROM users WHERE email = $1")
            .bind(&email)
            .fetch_one(&pool)
            .await
            .unwrap();
    assert!(last_login.is_none());
}

// ============================================================================
// Education
// ============================================================================

#[tokio::test]
#[ignore]
async fn test_education_slug_modules_and_patch() {
    let pool = test_pool().await;
    let service = EducationService::new(pool);
    let institution = unique("University");

    let education = service
        .create_education(
            serde_json::from_value::<CreateEducationRequest>(json!({
                "degree": "BSc Computer Science",
                "institution": institution,
                "end_date": "2024-06-30",
            }))
            .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(
        education.slug,
        format!("bsc-computer-science-{}", institution.to_lowercase())
    );

    service
        .create_module(
            serde_json::from_value::<CreateModuleRequest>(json!({
                "education_id": education.id,
                "name": "Operating Systems",
                "detailed_content": { "topics": ["scheduling", "paging"] },
            }))
            .unwrap(),
        )
        .await
        .unwrap();

    let detail = service.get_by_slug(&education.slug).await.unwrap();
    assert_eq!(detail.modules.len(), 1);
    assert_eq!(detail.modules[0].name, "Operating Systems");

    // null clears, absent keeps
    let patched = service
        .update_education(
            education.id,
            serde_json::from_value::<UpdateEducationRequest>(json!({
                "end_date": null,
                "grade": "First",
            }))
            .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(patched.end_date, None);
    assert_eq!(patched.grade.as_deref(), Some("First"));
    assert_eq!(patched.degree, "BSc Computer Science");

    service.delete_education(education.id).await.unwrap();
    assert!(matches!(
        service.delete_education(education.id).await,
        Err(ApiError::NotFound(_))
    ));
    assert!(matches!(
        service.get_by_slug(&education.slug).await,
        Err(ApiError::NotFound(_))
    ));
}

// ============================================================================
// Projects and skills
// ============================================================================

#[tokio::test]
#[ignore]
async fn test_project_skills_and_view_count() {
    let pool = test_pool().await;
    let skills = SkillService::new(pool.clone());
    let projects = ProjectService::new(pool);
    let category = unique("Lang");

    let rust = skills
        .create_skill(
            serde_json::from_value::<CreateSkillRequest>(json!({
                "name": "Rust",
                "category": category,
                "proficiency_level": 4,
            }))
            .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(rust.status, "active");

    let listed = skills
        .list_skills(SkillFilter {
            category: Some(category.clone()),
        })
        .await
        .unwrap();
    assert_eq!(listed.len(), 1);

    let name = unique("Portfolio Site");
    let project = projects
        .create_project(
            serde_json::from_value::<CreateProjectRequest>(json!({
                "name": name,
                "live_url": "https://example.com",
                "skill_ids": [rust.id],
            }))
            .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(project.slug, name.to_lowercase().replace(' ', "-"));

    let first = projects.get_by_slug(&project.slug).await.unwrap();
    assert_eq!(first.skills.len(), 1);
    assert_eq!(first.skills[0].id, rust.id);
    let second = projects.get_by_slug(&project.slug).await.unwrap();
    assert_eq!(second.project.view_count, first.project.view_count + 1);

    let all = projects.list_projects(ProjectFilter::default()).await.unwrap();
    let listed = all
        .iter()
        .find(|p| p.project.id == project.id)
        .expect("project listed");
    assert_eq!(listed.skills.len(), 1);

    // Replacing links with an empty list unlinks everything
    let patched = projects
        .update_project(
            project.id,
            serde_json::from_value::<UpdateProjectRequest>(json!({
                "skill_ids": [],
                "live_url": null,
            }))
            .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(patched.live_url, None);
    assert!(projects
        .get_by_slug(&project.slug)
        .await
        .unwrap()
        .skills
        .is_empty());

    // Archived and not featured drops out of the public views
    projects
        .update_project(
            project.id,
            serde_json::from_value::<UpdateProjectRequest>(json!({ "status": "archived" }))
                .unwrap(),
        )
        .await
        .unwrap();
    assert!(matches!(
        projects.get_by_slug(&project.slug).await,
        Err(ApiError::NotFound(_))
    ));
    let all = projects.list_projects(ProjectFilter::default()).await.unwrap();
    assert!(all.iter().all(|p| p.project.id != project.id));

    projects.delete_project(project.id).await.unwrap();
    skills.delete_skill(rust.id).await.unwrap();
}

// ============================================================================
// Blog
// ============================================================================

#[tokio::test]
#[ignore]
async fn test_blog_publication_rules() {
    let pool = test_pool().await;
    let blog = BlogService::new(pool);
    let title = unique("Hello World");

    let published = blog
        .create_post(
            serde_json::from_value::<CreateBlogPostRequest>(json!({
                "title": title,
                "content": "First post",
                "status": "published",
                "excerpt": "Short",
            }))
            .unwrap(),
        )
        .await
        .unwrap();
    assert!(published.published_at.is_some());

    let draft = blog
        .create_post(
            serde_json::from_value::<CreateBlogPostRequest>(json!({
                "title": unique("Draft"),
                "content": "Not yet",
            }))
            .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(draft.status, "draft");
    assert!(draft.published_at.is_none());

    let public = blog.list_published().await.unwrap();
    assert!(public.iter().any(|p| p.id == published.id));
    assert!(public.iter().all(|p| p.id != draft.id));

    let admin = blog.list_all().await.unwrap();
    assert!(admin.iter().any(|p| p.id == draft.id));

    assert!(matches!(
        blog.get_by_slug(&draft.slug).await,
        Err(ApiError::NotFound(_))
    ));
    let first = blog.get_by_slug(&published.slug).await.unwrap();
    let second = blog.get_by_slug(&published.slug).await.unwrap();
    assert_eq!(second.view_count, first.view_count + 1);

    // Same slug twice is a conflict
    let duplicate = blog
        .create_post(
            serde_json::from_value::<CreateBlogPostRequest>(json!({
                "title": "Anything",
                "slug": published.slug,
                "content": "Again",
            }))
            .unwrap(),
        )
        .await;
    assert!(matches!(duplicate, Err(ApiError::Conflict(_))));

    let patched = blog
        .update_post(
            published.id,
            serde_json::from_value::<UpdateBlogPostRequest>(json!({ "excerpt": null }))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(patched.excerpt, None);
    assert_eq!(patched.content, "First post");

    blog.delete_post(published.id).await.unwrap();
    blog.delete_post(draft.id).await.unwrap();
    assert!(matches!(
        blog.delete_post(draft.id).await,
        Err(ApiError::NotFound(_))
    ));
}
