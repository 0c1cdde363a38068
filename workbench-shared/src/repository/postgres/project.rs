use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use super::soft_delete;
use crate::models::{Project, ProjectFilter};
use crate::query::{sql::select_live, Filter, Pagination};
use crate::repository::{ProjectRepository, RepositoryError, RepositoryResult};

const COLUMNS: &str = "id, name, description, status, start_date, end_date, budget, owner_id, \
                       created_at, updated_at, deleted_at";

#[derive(Debug, Clone)]
pub struct PgProjectRepository {
    pool: PgPool,
}

impl PgProjectRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ProjectRepository for PgProjectRepository {
    async fn create(&self, project: &Project) -> RepositoryResult<Project> {
        let created = sqlx::query_as::<_, Project>(&format!(
            r#"
            INSERT INTO projects
                (id, name, description, status, start_date, end_date, budget, owner_id, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            RETURNING {}
            "#,
            COLUMNS
        ))
        .bind(project.id)
        .bind(&project.name)
        .bind(&project.description)
        .bind(&project.status)
        .bind(project.start_date)
        .bind(project.end_date)
        .bind(project.budget)
        .bind(project.owner_id)
        .bind(project.created_at)
        .bind(project.updated_at)
        .fetch_one(&self.pool)
        .await?;

        Ok(created)
    }

    async fn get_by_id(&self, id: Uuid) -> RepositoryResult<Project> {
        sqlx::query_as::<_, Project>(&format!(
            "SELECT {} FROM projects WHERE id = $1 AND deleted_at IS NULL",
            COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(RepositoryError::NotFound { resource: "project" })
    }

    async fn list(
        &self,
        filter: &ProjectFilter,
        page: &Pagination,
    ) -> RepositoryResult<Vec<Project>> {
        let mut query = select_live("projects", COLUMNS, filter.conditions(), page)?;
        let projects = query.build_query_as::<Project>().fetch_all(&self.pool).await?;
        Ok(projects)
    }

    async fn update(&self, project: &Project) -> RepositoryResult<Project> {
        sqlx::query_as::<_, Project>(&format!(
            r#"
            UPDATE projects
            SET name = $2, description = $3, status = $4, start_date = $5, end_date = $6,
                budget = $7, owner_id = $8, updated_at = $9
            WHERE id = $1 AND deleted_at IS NULL
            RETURNING {}
            "#,
            COLUMNS
        ))
        .bind(project.id)
        .bind(&project.name)
        .bind(&project.description)
        .bind(&project.status)
        .bind(project.start_date)
        .bind(project.end_date)
        .bind(project.budget)
        .bind(project.owner_id)
        .bind(project.updated_at)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(RepositoryError::NotFound { resource: "project" })
    }

    async fn delete(&self, id: Uuid) -> RepositoryResult<()> {
        soft_delete(&self.pool, "projects", id).await?;
        Ok(())
    }

    async fn get_by_owner_id(&self, owner_id: Uuid) -> RepositoryResult<Vec<Project>> {
        let projects = sqlx::query_as::<_, Project>(&format!(
            r#"
            SELECT {} FROM projects
            WHERE owner_id = $1 AND deleted_at IS NULL
            ORDER BY created_at DESC
            "#,
            COLUMNS
        ))
        .bind(owner_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(projects)
    }
}
