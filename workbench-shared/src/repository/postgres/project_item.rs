use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use super::soft_delete;
use crate::models::{ProjectItem, ProjectItemFilter};
use crate::query::{sql::select_live, Filter, Pagination};
use crate::repository::{ProjectItemRepository, RepositoryError, RepositoryResult};

const COLUMNS: &str = "id, project_id, name, description, status, priority, estimated_hours, \
                       actual_hours, due_date, assigned_to, created_at, updated_at, deleted_at";

#[derive(Debug, Clone)]
pub struct PgProjectItemRepository {
    pool: PgPool,
}

impl PgProjectItemRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn live_where(&self, column: &'static str, value: Uuid) -> RepositoryResult<Vec<ProjectItem>> {
        let items = sqlx::query_as::<_, ProjectItem>(&format!(
            "SELECT {} FROM project_items WHERE {} = $1 AND deleted_at IS NULL ORDER BY created_at DESC",
            COLUMNS, column
        ))
        .bind(value)
        .fetch_all(&self.pool)
        .await?;

        Ok(items)
    }
}

#[async_trait]
impl ProjectItemRepository for PgProjectItemRepository {
    async fn create(&self, item: &ProjectItem) -> RepositoryResult<ProjectItem> {
        let created = sqlx::query_as::<_, ProjectItem>(&format!(
            r#"
            INSERT INTO project_items
                (id, project_id, name, description, status, priority, estimated_hours,
                 actual_hours, due_date, assigned_to, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
            RETURNING {}
            "#,
            COLUMNS
        ))
        .bind(item.id)
        .bind(item.project_id)
        .bind(&item.name)
        .bind(&item.description)
        .bind(&item.status)
        .bind(&item.priority)
        .bind(item.estimated_hours)
        .bind(item.actual_hours)
        .bind(item.due_date)
        .bind(item.assigned_to)
        .bind(item.created_at)
        .bind(item.updated_at)
        .fetch_one(&self.pool)
        .await?;

        Ok(created)
    }

    async fn get_by_id(&self, id: Uuid) -> RepositoryResult<ProjectItem> {
        sqlx::query_as::<_, ProjectItem>(&format!(
            "SELECT {} FROM project_items WHERE id = $1 AND deleted_at IS NULL",
            COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(RepositoryError::NotFound { resource: "project item" })
    }

    async fn list(
        &self,
        filter: &ProjectItemFilter,
        page: &Pagination,
    ) -> RepositoryResult<Vec<ProjectItem>> {
        let mut query = select_live("project_items", COLUMNS, filter.conditions(), page)?;
        let items = query.build_query_as::<ProjectItem>().fetch_all(&self.pool).await?;
        Ok(items)
    }

    async fn update(&self, item: &ProjectItem) -> RepositoryResult<ProjectItem> {
        sqlx::query_as::<_, ProjectItem>(&format!(
            r#"
            UPDATE project_items
            SET project_id = $2, name = $3, description = $4, status = $5, priority = $6,
                estimated_hours = $7, actual_hours = $8, due_date = $9, assigned_to = $10,
                updated_at = $11
            WHERE id = $1 AND deleted_at IS NULL
            RETURNING {}
            "#,
            COLUMNS
        ))
        .bind(item.id)
        .bind(item.project_id)
        .bind(&item.name)
        .bind(&item.description)
        .bind(&item.status)
        .bind(&item.priority)
        .bind(item.estimated_hours)
        .bind(item.actual_hours)
        .bind(item.due_date)
        .bind(item.assigned_to)
        .bind(item.updated_at)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(RepositoryError::NotFound { resource: "project item" })
    }

    async fn delete(&self, id: Uuid) -> RepositoryResult<()> {
        soft_delete(&self.pool, "project_items", id).await?;
        Ok(())
    }

    async fn get_by_project_id(&self, project_id: Uuid) -> RepositoryResult<Vec<ProjectItem>> {
        self.live_where("project_id", project_id).await
    }

    async fn get_by_assigned_to(&self, user_id: Uuid) -> RepositoryResult<Vec<ProjectItem>> {
        self.live_where("assigned_to", user_id).await
    }
}
