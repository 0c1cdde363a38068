//! Project endpoints
//!
//! # Endpoints
//!
//! - `POST   /v1/projects` - Create a project (201); status defaults to `active`
//! - `GET    /v1/projects` - List projects (`name`, `status`, `owner_id`,
//!   `start_date_from/to`, `end_date_from/to`, `budget_from/to`,
//!   `created_at_from/to`, `limit`, `offset`, `sort`)
//! - `GET    /v1/projects/:id` - Get a project
//! - `PUT    /v1/projects/:id` - Update a project
//! - `DELETE /v1/projects/:id` - Soft-delete a project (204)
//! - `GET    /v1/projects/owner/:owner_id` - Projects owned by a user

use crate::{
    app::AppState,
    error::ApiResult,
    extract::{ApiJson, ApiPath, ListQuery},
    middleware::auth::AuthContext,
};
use axum::{extract::State, http::StatusCode, Extension, Json};
use uuid::Uuid;
use workbench_shared::models::{CreateProject, Project, ProjectFilter, UpdateProject};

pub async fn create_project(
    State(state): State<AppState>,
    ApiJson(input): ApiJson<CreateProject>,
) -> ApiResult<(StatusCode, Json<Project>)> {
    let project = state.projects.create_project(input).await?;
    Ok((StatusCode::CREATED, Json(project)))
}

pub async fn list_projects(
    State(state): State<AppState>,
    query: ListQuery<ProjectFilter>,
) -> ApiResult<Json<Vec<Project>>> {
    Ok(Json(
        state
            .projects
            .list_projects(&query.filter, &query.page)
            .await?,
    ))
}

pub async fn get_project(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<Uuid>,
) -> ApiResult<Json<Project>> {
    Ok(Json(state.projects.get_project_by_id(id).await?))
}

pub async fn get_projects_by_owner(
    State(state): State<AppState>,
    ApiPath(owner_id): ApiPath<Uuid>,
) -> ApiResult<Json<Vec<Project>>> {
    Ok(Json(state.projects.get_projects_by_owner_id(owner_id).await?))
}

pub async fn update_project(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<Uuid>,
    ApiJson(input): ApiJson<UpdateProject>,
) -> ApiResult<Json<Project>> {
    Ok(Json(state.projects.update_project(id, input).await?))
}

pub async fn delete_project(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    ApiPath(id): ApiPath<Uuid>,
) -> ApiResult<StatusCode> {
    state.projects.delete_project(id).await?;
    tracing::info!(actor = %auth.user_id, id = %id, "Deleted project");
    Ok(StatusCode::NO_CONTENT)
}
