use sqlx::{PgPool, Postgres, QueryBuilder, Transaction};
use std::collections::HashMap;
use uuid::Uuid;

use crate::error::ApiError;
use crate::projects::model::{
    CreateProjectRequest, Project, ProjectFilter, ProjectSkill, ProjectWithSkills,
    UpdateProjectRequest,
};
use crate::utils::{is_blank, push_set, slug_or_generate};

const PROJECT_COLUMNS: &str = "id, name, slug, short_description, full_description, status, \
     start_date, end_date, github_url, live_url, featured, difficulty_level, image_url, \
     demo_video_url, display_order, view_count, created_at, updated_at";

#[derive(Clone)]
pub struct ProjectService {
    db_pool: PgPool,
}

impl ProjectService {
    pub fn new(db_pool: PgPool) -> Self {
        Self { db_pool }
    }

    /// Active projects plus featured archived ones, each with linked skills
    pub async fn list_projects(
        &self,
        filter: ProjectFilter,
    ) -> Result<Vec<ProjectWithSkills>, ApiError> {
        let mut builder = QueryBuilder::<Postgres>::new("SELECT ");
        builder.push(PROJECT_COLUMNS).push(
            " FROM projects WHERE (status = 'active' OR (status = 'archived' AND featured = true))",
        );

        if filter.featured == Some(true) {
            builder.push(" AND featured = true");
        }

        builder.push(" ORDER BY display_order ASC, created_at DESC");

        let projects = builder
            .build_query_as::<Project>()
            .fetch_all(&self.db_pool)
            .await?;

        let ids: Vec<Uuid> = projects.iter().map(|p| p.id).collect();
        let mut skills = self.skills_for(&ids).await?;

        Ok(projects
            .into_iter()
            .map(|project| {
                let skills = skills.remove(&project.id).unwrap_or_default();
                ProjectWithSkills { project, skills }
            })
            .collect())
    }

    /// Active project by slug; counts as a view
    pub async fn get_by_slug(&self, slug: &str) -> Result<ProjectWithSkills, ApiError> {
        let project = sqlx::query_as::<_, Project>(&format!(
            "SELECT {} FROM projects WHERE slug = $1 AND status = 'active'",
            PROJECT_COLUMNS
        ))
        .bind(slug)
        .fetch_optional(&self.db_pool)
        .await?
        .ok_or_else(|| ApiError::NotFound("Project not found".to_string()))?;

        let skills = self
            .skills_for(&[project.id])
            .await?
            .remove(&project.id)
            .unwrap_or_default();

        if let Err(e) = sqlx::query("UPDATE projects SET view_count = view_count + 1 WHERE id = $1")
            .bind(project.id)
            .execute(&self.db_pool)
            .await
        {
            tracing::warn!(project_id = %project.id, error = %e, "Failed to bump view count");
        }

        Ok(ProjectWithSkills { project, skills })
    }

    async fn skills_for(
        &self,
        project_ids: &[Uuid],
    ) -> Result<HashMap<Uuid, Vec<ProjectSkill>>, ApiError> {
        let rows = sqlx::query_as::<_, ProjectSkill>(
            r#"
            SELECT ps.project_id, s.id, s.name, s.category, s.proficiency_level, s.icon
            FROM skills s
            INNER JOIN project_skills ps ON s.id = ps.skill_id
            WHERE ps.project_id = ANY($1)
            ORDER BY ps.is_primary DESC, s.name ASC
            "#,
        )
        .bind(project_ids)
        .fetch_all(&self.db_pool)
        .await?;

        let mut grouped: HashMap<Uuid, Vec<ProjectSkill>> = HashMap::new();
        for row in rows {
            grouped.entry(row.project_id).or_default().push(row);
        }
        Ok(grouped)
    }

    pub async fn create_project(
        &self,
        request: CreateProjectRequest,
    ) -> Result<Project, ApiError> {
        if is_blank(&request.name) {
            return Err(ApiError::BadRequest("name is required".to_string()));
        }

        let slug = slug_or_generate(request.slug.clone(), &request.name);
        let mut tx = self.db_pool.begin().await?;

        let project = sqlx::query_as::<_, Project>(&format!(
            r#"
            INSERT INTO projects (
                name, slug, short_description, full_description, status,
                start_date, end_date, github_url, live_url, featured,
                difficulty_level, image_url, demo_video_url, display_order
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14)
            RETURNING {}
            "#,
            PROJECT_COLUMNS
        ))
        .bind(&request.name)
        .bind(&slug)
        .bind(&request.short_description)
        .bind(&request.full_description)
        .bind(request.status.as_deref().unwrap_or("active"))
        .bind(request.start_date)
        .bind(request.end_date)
        .bind(&request.github_url)
        .bind(&request.live_url)
        .bind(request.featured)
        .bind(&request.difficulty_level)
        .bind(&request.image_url)
        .bind(&request.demo_video_url)
        .bind(request.display_order.unwrap_or(0))
        .fetch_one(&mut *tx)
        .await?;

        link_skills(&mut tx, project.id, &request.skill_ids).await?;

        tx.commit().await?;

        tracing::info!(project_id = %project.id, slug = %project.slug, "Project created");

        Ok(project)
    }

    pub async fn update_project(
        &self,
        id: Uuid,
        request: UpdateProjectRequest,
    ) -> Result<Project, ApiError> {
        let mut tx = self.db_pool.begin().await?;

        let mut builder = QueryBuilder::<Postgres>::new("UPDATE projects SET updated_at = NOW()");
        push_set(&mut builder, "name", request.name);
        push_set(&mut builder, "slug", request.slug);
        push_set(&mut builder, "short_description", request.short_description);
        push_set(&mut builder, "full_description", request.full_description);
        push_set(&mut builder, "status", request.status);
        push_set(&mut builder, "start_date", request.start_date);
        push_set(&mut builder, "end_date", request.end_date);
        push_set(&mut builder, "github_url", request.github_url);
        push_set(&mut builder, "live_url", request.live_url);
        push_set(&mut builder, "featured", request.featured);
        push_set(&mut builder, "difficulty_level", request.difficulty_level);
        push_set(&mut builder, "image_url", request.image_url);
        push_set(&mut builder, "demo_video_url", request.demo_video_url);
        push_set(&mut builder, "display_order", request.display_order);
        builder
            .push(" WHERE id = ")
            .push_bind(id)
            .push(" RETURNING ")
            .push(PROJECT_COLUMNS);

        let project = builder
            .build_query_as::<Project>()
            .fetch_optional(&mut *tx)
            .await?
            .ok_or_else(|| ApiError::NotFound("Project not found".to_string()))?;

        if let Some(skill_ids) = request.skill_ids {
            sqlx::query("DELETE FROM project_skills WHERE project_id = $1")
                .bind(id)
                .execute(&mut *tx)
                .await?;
            link_skills(&mut tx, id, &skill_ids).await?;
        }

        tx.commit().await?;

        Ok(project)
    }

    pub async fn delete_project(&self, id: Uuid) -> Result<(), ApiError> {
        let result = sqlx::query("DELETE FROM projects WHERE id = $1")
            .bind(id)
            .execute(&self.db_pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(ApiError::NotFound("Project not found".to_string()));
        }

        Ok(())
    }
}

async fn link_skills(
    tx: &mut Transaction<'_, Postgres>,
    project_id: Uuid,
    skill_ids: &[Uuid],
) -> Result<(), ApiError> {
    for skill_id in skill_ids {
        sqlx::query(
            "INSERT INTO project_skills (project_id, skill_id, is_primary) VALUES ($1, $2, false) \
             ON CONFLICT DO NOTHING",
        )
        .bind(project_id)
        .bind(skill_id)
        .execute(&mut **tx)
        .await?;
    }
    Ok(())
}
