use sqlx::{PgPool, Postgres, QueryBuilder};
use std::collections::HashMap;
use uuid::Uuid;

use crate::education::model::{
    CreateEducationRequest, CreateModuleRequest, Education, EducationDetail, EducationWithModules,
    Module, UpdateEducationRequest, UpdateModuleRequest,
};
use crate::error::ApiError;
use crate::utils::{is_blank, push_set, slug_or_generate};

const EDUCATION_COLUMNS: &str = "id, degree, institution, field_of_study, start_date, end_date, \
     grade, description, slug, display_order, created_at, updated_at";

const MODULE_COLUMNS: &str = "id, education_id, name, code, grade, credits, semester, \
     description, detailed_content, display_order, created_at, updated_at";

#[derive(Clone)]
pub struct EducationService {
    db_pool: PgPool,
}

impl EducationService {
    pub fn new(db_pool: PgPool) -> Self {
        Self { db_pool }
    }

    /// All education entries in display order, each with its modules
    pub async fn list_education(&self) -> Result<Vec<EducationWithModules>, ApiError> {
        let education = sqlx::query_as::<_, Education>(&format!(
            "SELECT {} FROM education ORDER BY display_order ASC",
            EDUCATION_COLUMNS
        ))
        .fetch_all(&self.db_pool)
        .await?;

        let ids: Vec<Uuid> = education.iter().map(|e| e.id).collect();
        let modules = sqlx::query_as::<_, Module>(&format!(
            "SELECT {} FROM modules WHERE education_id = ANY($1) ORDER BY display_order ASC",
            MODULE_COLUMNS
        ))
        .bind(&ids)
        .fetch_all(&self.db_pool)
        .await?;

        let mut by_education: HashMap<Uuid, Vec<Module>> = HashMap::new();
        for module in modules {
            by_education.entry(module.education_id).or_default().push(module);
        }

        Ok(education
            .into_iter()
            .map(|education| {
                let modules = by_education.remove(&education.id).unwrap_or_default();
                EducationWithModules { education, modules }
            })
            .collect())
    }

    pub async fn get_by_slug(&self, slug: &str) -> Result<EducationDetail, ApiError> {
        let education = sqlx::query_as::<_, Education>(&format!(
            "SELECT {} FROM education WHERE slug = $1",
            EDUCATION_COLUMNS
        ))
        .bind(slug)
        .fetch_optional(&self.db_pool)
        .await?
        .ok_or_else(|| ApiError::NotFound("Education entry not found".to_string()))?;

        let modules = self.modules_for(education.id).await?;

        Ok(EducationDetail { education, modules })
    }

    async fn modules_for(&self, education_id: Uuid) -> Result<Vec<Module>, ApiError> {
        let modules = sqlx::query_as::<_, Module>(&format!(
            "SELECT {} FROM modules WHERE education_id = $1 ORDER BY display_order ASC",
            MODULE_COLUMNS
        ))
        .bind(education_id)
        .fetch_all(&self.db_pool)
        .await?;

        Ok(modules)
    }

    pub async fn create_education(
        &self,
        request: CreateEducationRequest,
    ) -> Result<Education, ApiError> {
        if is_blank(&request.degree) || is_blank(&request.institution) {
            return Err(ApiError::BadRequest(
                "degree and institution are required".to_string(),
            ));
        }

        let slug = slug_or_generate(
            request.slug,
            &format!("{} {}", request.degree, request.institution),
        );

        let education = sqlx::query_as::<_, Education>(&format!(
            r#"
            INSERT INTO education (
                degree, institution, field_of_study, start_date, end_date,
                grade, description, slug, display_order
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING {}
            "#,
            EDUCATION_COLUMNS
        ))
        .bind(&request.degree)
        .bind(&request.institution)
        .bind(&request.field_of_study)
        .bind(request.start_date)
        .bind(request.end_date)
        .bind(&request.grade)
        .bind(&request.description)
        .bind(&slug)
        .bind(request.display_order.unwrap_or(0))
        .fetch_one(&self.db_pool)
        .await?;

        tracing::info!(education_id = %education.id, slug = %education.slug, "Education entry created");

        Ok(education)
    }

    pub async fn update_education(
        &self,
        id: Uuid,
        request: UpdateEducationRequest,
    ) -> Result<Education, ApiError> {
        let mut builder = QueryBuilder::<Postgres>::new("UPDATE education SET updated_at = NOW()");
        push_set(&mut builder, "degree", request.degree);
        push_set(&mut builder, "institution", request.institution);
        push_set(&mut builder, "field_of_study", request.field_of_study);
        push_set(&mut builder, "start_date", request.start_date);
        push_set(&mut builder, "end_date", request.end_date);
        push_set(&mut builder, "grade", request.grade);
        push_set(&mut builder, "description", request.description);
        push_set(&mut builder, "slug", request.slug);
        push_set(&mut builder, "display_order", request.display_order);
        builder
            .push(" WHERE id = ")
            .push_bind(id)
            .push(" RETURNING ")
            .push(EDUCATION_COLUMNS);

        builder
            .build_query_as::<Education>()
            .fetch_optional(&self.db_pool)
            .await?
            .ok_or_else(|| ApiError::NotFound("Education record not found".to_string()))
    }

    pub async fn delete_education(&self, id: Uuid) -> Result<(), ApiError> {
        let result = sqlx::query("DELETE FROM education WHERE id = $1")
            .bind(id)
            .execute(&self.db_pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(ApiError::NotFound("Education record not found".to_string()));
        }

        Ok(())
    }

    pub async fn create_module(&self, request: CreateModuleRequest) -> Result<Module, ApiError> {
        if is_blank(&request.name) {
            return Err(ApiError::BadRequest("name is required".to_string()));
        }

        let module = sqlx::query_as::<_, Module>(&format!(
            r#"
            INSERT INTO modules (
                education_id, name, code, grade, credits, semester,
                description, detailed_content, display_order
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING {}
            "#,
            MODULE_COLUMNS
        ))
        .bind(request.education_id)
        .bind(&request.name)
        .bind(&request.code)
        .bind(&request.grade)
        .bind(request.credits)
        .bind(&request.semester)
        .bind(&request.description)
        .bind(&request.detailed_content)
        .bind(request.display_order.unwrap_or(0))
        .fetch_one(&self.db_pool)
        .await?;

        Ok(module)
    }

    pub async fn update_module(
        &self,
        id: Uuid,
        request: UpdateModuleRequest,
    ) -> Result<Module, ApiError> {
        let mut builder = QueryBuilder::<Postgres>::new("UPDATE modules SET updated_at = NOW()");
        push_set(&mut builder, "name", request.name);
        push_set(&mut builder, "code", request.code);
        push_set(&mut builder, "grade", request.grade);
        push_set(&mut builder, "credits", request.credits);
        push_set(&mut builder, "semester", request.semester);
        push_set(&mut builder, "description", request.description);
        push_set(&mut builder, "detailed_content", request.detailed_content);
        push_set(&mut builder, "display_order", request.display_order);
        builder
            .push(" WHERE id = ")
            .push_bind(id)
            .push(" RETURNING ")
            .push(MODULE_COLUMNS);

        builder
            .build_query_as::<Module>()
            .fetch_optional(&self.db_pool)
            .await?
            .ok_or_else(|| ApiError::NotFound("Module not found".to_string()))
    }

    pub async fn delete_module(&self, id: Uuid) -> Result<(), ApiError> {
        let result = sqlx::query("DELETE FROM modules WHERE id = $1")
            .bind(id)
            .execute(&self.db_pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(ApiError::NotFound("Module not found".to_string()));
        }

        Ok(())
    }
}
