use chrono::Utc;
use std::sync::Arc;
use tracing::{info, Span};
use uuid::Uuid;

use super::{non_blank, require_non_blank, ServiceResult};
use crate::models::project::DEFAULT_PROJECT_STATUS;
use crate::models::{CreateProject, Project, ProjectFilter, UpdateProject};
use crate::query::Pagination;
use crate::repository::ProjectRepository;

/// Rules shared by create and update
///
/// The owner reference is checked by the foreign key, not here.
pub fn validate_project(project: &Project) -> ServiceResult<()> {
    require_non_blank("name", &project.name)
}

#[derive(Clone)]
pub struct ProjectService {
    repo: Arc<dyn ProjectRepository>,
    span: Span,
}

impl ProjectService {
    pub fn new(repo: Arc<dyn ProjectRepository>, span: Span) -> Self {
        Self { repo, span }
    }

    pub async fn create_project(&self, input: CreateProject) -> ServiceResult<Project> {
        let now = Utc::now();
        let project = Project {
            id: Uuid::new_v4(),
            name: input.name.trim().to_string(),
            description: input.description,
            status: non_blank(input.status).unwrap_or_else(|| DEFAULT_PROJECT_STATUS.to_string()),
            start_date: input.start_date,
            end_date: input.end_date,
            budget: input.budget,
            owner_id: input.owner_id,
            created_at: now,
            updated_at: now,
            deleted_at: None,
        };
        validate_project(&project)?;

        let project = self.repo.create(&project).await?;
        info!(parent: &self.span, project_id = %project.id, owner_id = %project.owner_id, "Project created");
        Ok(project)
    }

    pub async fn get_project_by_id(&self, id: Uuid) -> ServiceResult<Project> {
        Ok(self.repo.get_by_id(id).await?)
    }

    pub async fn list_projects(
        &self,
        filter: &ProjectFilter,
        page: &Pagination,
    ) -> ServiceResult<Vec<Project>> {
        Ok(self.repo.list(filter, page).await?)
    }

    pub async fn get_projects_by_owner_id(&self, owner_id: Uuid) -> ServiceResult<Vec<Project>> {
        Ok(self.repo.get_by_owner_id(owner_id).await?)
    }

    pub async fn update_project(&self, id: Uuid, input: UpdateProject) -> ServiceResult<Project> {
        let mut project = self.repo.get_by_id(id).await?;

        if let Some(name) = input.name {
            project.name = name.trim().to_string();
        }
        if let Some(description) = input.description {
            project.description = description;
        }
        if let Some(status) = non_blank(input.status) {
            project.status = status;
        }
        if let Some(start_date) = input.start_date {
            project.start_date = start_date;
        }
        if let Some(end_date) = input.end_date {
            project.end_date = end_date;
        }
        if let Some(budget) = input.budget {
            project.budget = budget;
        }
        if let Some(owner_id) = input.owner_id {
            project.owner_id = owner_id;
        }
        validate_project(&project)?;
        project.updated_at = Utc::now();

        let project = self.repo.update(&project).await?;
        info!(parent: &self.span, project_id = %project.id, "Project updated");
        Ok(project)
    }

    pub async fn delete_project(&self, id: Uuid) -> ServiceResult<()> {
        self.repo.delete(id).await?;
        info!(parent: &self.span, project_id = %id, "Project deleted");
        Ok(())
    }
}
