use chrono::Utc;
use std::sync::Arc;
use tracing::{info, Span};
use uuid::Uuid;

use super::{non_blank, require_non_blank, ServiceResult};
use crate::models::project_item::{DEFAULT_ITEM_PRIORITY, DEFAULT_ITEM_STATUS};
use crate::models::{CreateProjectItem, ProjectItem, ProjectItemFilter, UpdateProjectItem};
use crate::query::Pagination;
use crate::repository::ProjectItemRepository;

/// Rules shared by create and update
pub fn validate_project_item(item: &ProjectItem) -> ServiceResult<()> {
    require_non_blank("name", &item.name)
}

#[derive(Clone)]
pub struct ProjectItemService {
    repo: Arc<dyn ProjectItemRepository>,
    span: Span,
}

impl ProjectItemService {
    pub fn new(repo: Arc<dyn ProjectItemRepository>, span: Span) -> Self {
        Self { repo, span }
    }

    pub async fn create_project_item(&self, input: CreateProjectItem) -> ServiceResult<ProjectItem> {
        let now = Utc::now();
        let item = ProjectItem {
            id: Uuid::new_v4(),
            project_id: input.project_id,
            name: input.name.trim().to_string(),
            description: input.description,
            status: non_blank(input.status).unwrap_or_else(|| DEFAULT_ITEM_STATUS.to_string()),
            priority: non_blank(input.priority).unwrap_or_else(|| DEFAULT_ITEM_PRIORITY.to_string()),
            estimated_hours: input.estimated_hours,
            actual_hours: input.actual_hours,
            due_date: input.due_date,
            assigned_to: input.assigned_to,
            created_at: now,
            updated_at: now,
            deleted_at: None,
        };
        validate_project_item(&item)?;

        let item = self.repo.create(&item).await?;
        info!(
            parent: &self.span,
            item_id = %item.id,
            project_id = %item.project_id,
            "Project item created"
        );
        Ok(item)
    }

    pub async fn get_project_item_by_id(&self, id: Uuid) -> ServiceResult<ProjectItem> {
        Ok(self.repo.get_by_id(id).await?)
    }

    pub async fn list_project_items(
        &self,
        filter: &ProjectItemFilter,
        page: &Pagination,
    ) -> ServiceResult<Vec<ProjectItem>> {
        Ok(self.repo.list(filter, page).await?)
    }

    pub async fn get_project_items_by_project_id(
        &self,
        project_id: Uuid,
    ) -> ServiceResult<Vec<ProjectItem>> {
        Ok(self.repo.get_by_project_id(project_id).await?)
    }

    pub async fn get_project_items_by_assigned_to(
        &self,
        user_id: Uuid,
    ) -> ServiceResult<Vec<ProjectItem>> {
        Ok(self.repo.get_by_assigned_to(user_id).await?)
    }

    pub async fn update_project_item(
        &self,
        id: Uuid,
        input: UpdateProjectItem,
    ) -> ServiceResult<ProjectItem> {
        let mut item = self.repo.get_by_id(id).await?;

        if let Some(project_id) = input.project_id {
            item.project_id = project_id;
        }
        if let Some(name) = input.name {
            item.name = name.trim().to_string();
        }
        if let Some(description) = input.description {
            item.description = description;
        }
        if let Some(status) = non_blank(input.status) {
            item.status = status;
        }
        if let Some(priority) = non_blank(input.priority) {
            item.priority = priority;
        }
        if let Some(estimated_hours) = input.estimated_hours {
            item.estimated_hours = estimated_hours;
        }
        if let Some(actual_hours) = input.actual_hours {
            item.actual_hours = actual_hours;
        }
        if let Some(due_date) = input.due_date {
            item.due_date = due_date;
        }
        if let Some(assigned_to) = input.assigned_to {
            item.assigned_to = assigned_to;
        }
        validate_project_item(&item)?;
        item.updated_at = Utc::now();

        let item = self.repo.update(&item).await?;
        info!(parent: &self.span, item_id = %item.id, "Project item updated");
        Ok(item)
    }

    pub async fn delete_project_item(&self, id: Uuid) -> ServiceResult<()> {
        self.repo.delete(id).await?;
        info!(parent: &self.span, item_id = %id, "Project item deleted");
        Ok(())
    }
}
