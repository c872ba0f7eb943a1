use sqlx::{PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use crate::error::ApiError;
use crate::skills::model::{CreateSkillRequest, Skill, SkillFilter, UpdateSkillRequest};
use crate::utils::{is_blank, push_set};

const SKILL_COLUMNS: &str = "id, name, category, proficiency_level, years_experience, status, \
     first_learned_date, last_used_date, description, icon, display_order, created_at, updated_at";

#[derive(Clone)]
pub struct SkillService {
    db_pool: PgPool,
}

impl SkillService {
    pub fn new(db_pool: PgPool) -> Self {
        Self { db_pool }
    }

    /// Active skills, optionally narrowed to one category
    pub async fn list_skills(&self, filter: SkillFilter) -> Result<Vec<Skill>, ApiError> {
        let mut builder = QueryBuilder::<Postgres>::new("SELECT ");
        builder
            .push(SKILL_COLUMNS)
            .push(" FROM skills WHERE status = 'active'");

        if let Some(category) = filter.category.filter(|c| !c.is_empty()) {
            builder.push(" AND category = ").push_bind(category);
        }

        builder.push(" ORDER BY display_order ASC, proficiency_level DESC");

        let skills = builder
            .build_query_as::<Skill>()
            .fetch_all(&self.db_pool)
            .await?;

        Ok(skills)
    }

    pub async fn create_skill(&self, request: CreateSkillRequest) -> Result<Skill, ApiError> {
        if is_blank(&request.name) {
            return Err(ApiError::BadRequest("name is required".to_string()));
        }

        let skill = sqlx::query_as::<_, Skill>(&format!(
            r#"
            INSERT INTO skills (
                name, category, proficiency_level, years_experience, status,
                first_learned_date, last_used_date, description, icon, display_order
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            RETURNING {}
            "#,
            SKILL_COLUMNS
        ))
        .bind(&request.name)
        .bind(&request.category)
        .bind(request.proficiency_level)
        .bind(request.years_experience)
        .bind(request.status.as_deref().unwrap_or("active"))
        .bind(request.first_learned_date)
        .bind(request.last_used_date)
        .bind(&request.description)
        .bind(&request.icon)
        .bind(request.display_order.unwrap_or(0))
        .fetch_one(&self.db_pool)
        .await?;

        tracing::info!(skill_id = %skill.id, name = %skill.name, "Skill created");

        Ok(skill)
    }

    pub async fn update_skill(
        &self,
        id: Uuid,
        request: UpdateSkillRequest,
    ) -> Result<Skill, ApiError> {
        let mut builder = QueryBuilder::<Postgres>::new("UPDATE skills SET updated_at = NOW()");
        push_set(&mut builder, "name", request.name);
        push_set(&mut builder, "category", request.category);
        push_set(&mut builder, "proficiency_level", request.proficiency_level);
        push_set(&mut builder, "years_experience", request.years_experience);
        push_set(&mut builder, "status", request.status);
        push_set(&mut builder, "first_learned_date", request.first_learned_date);
        push_set(&mut builder, "last_used_date", request.last_used_date);
        push_set(&mut builder, "description", request.description);
        push_set(&mut builder, "icon", request.icon);
        push_set(&mut builder, "display_order", request.display_order);
        builder
            .push(" WHERE id = ")
            .push_bind(id)
            .push(" RETURNING ")
            .push(SKILL_COLUMNS);

        builder
            .build_query_as::<Skill>()
            .fetch_optional(&self.db_pool)
            .await?
            .ok_or_else(|| ApiError::NotFound("Skill not found".to_string()))
    }

    pub async fn delete_skill(&self, id: Uuid) -> Result<(), ApiError> {
        let result = sqlx::query("DELETE FROM skills WHERE id = $1")
            .bind(id)
            .execute(&self.db_pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(ApiError::NotFound("Skill not found".to_string()));
        }

        Ok(())
    }
}
