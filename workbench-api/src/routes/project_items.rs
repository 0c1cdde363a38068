//! Project item endpoints
//!
//! # Endpoints
//!
//! - `POST   /v1/project-items` - Create an item (201); status defaults to
//!   `pending` and priority to `medium`
//! - `GET    /v1/project-items` - List items (`project_id`, `name`, `status`,
//!   `priority`, `assigned_to`, `due_date_from/to`,
//!   `estimated_hours_from/to`, `actual_hours_from/to`, `created_at_from/to`,
//!   `limit`, `offset`, `sort`)
//! - `GET    /v1/project-items/:id` - Get an item
//! - `PUT    /v1/project-items/:id` - Update an item
//! - `DELETE /v1/project-items/:id` - Soft-delete an item (204)
//! - `GET    /v1/project-items/project/:project_id` - Items of a project
//! - `GET    /v1/project-items/assignee/:user_id` - Items assigned to a user

use crate::{
    app::AppState,
    error::ApiResult,
    extract::{ApiJson, ApiPath, ListQuery},
    middleware::auth::AuthContext,
};
use axum::{extract::State, http::StatusCode, Extension, Json};
use uuid::Uuid;
use workbench_shared::models::{
    CreateProjectItem, ProjectItem, ProjectItemFilter, UpdateProjectItem,
};

pub async fn create_project_item(
    State(state): State<AppState>,
    ApiJson(input): ApiJson<CreateProjectItem>,
) -> ApiResult<(StatusCode, Json<ProjectItem>)> {
    let item = state.project_items.create_project_item(input).await?;
    Ok((StatusCode::CREATED, Json(item)))
}

pub async fn list_project_items(
    State(state): State<AppState>,
    query: ListQuery<ProjectItemFilter>,
) -> ApiResult<Json<Vec<ProjectItem>>> {
    let items = state
        .project_items
        .list_project_items(&query.filter, &query.page)
        .await?;
    tracing::debug!(count = items.len(), "Listed project items");
    Ok(Json(items))
}

pub async fn get_project_item(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<Uuid>,
) -> ApiResult<Json<ProjectItem>> {
    Ok(Json(state.project_items.get_project_item_by_id(id).await?))
}

pub async fn get_project_items_by_project(
    State(state): State<AppState>,
    ApiPath(project_id): ApiPath<Uuid>,
) -> ApiResult<Json<Vec<ProjectItem>>> {
    Ok(Json(
        state
            .project_items
            .get_project_items_by_project_id(project_id)
            .await?,
    ))
}

pub async fn get_project_items_by_assignee(
    State(state): State<AppState>,
    ApiPath(user_id): ApiPath<Uuid>,
) -> ApiResult<Json<Vec<ProjectItem>>> {
    Ok(Json(
        state
            .project_items
            .get_project_items_by_assigned_to(user_id)
            .await?,
    ))
}

pub async fn update_project_item(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<Uuid>,
    ApiJson(input): ApiJson<UpdateProjectItem>,
) -> ApiResult<Json<ProjectItem>> {
    Ok(Json(state.project_items.update_project_item(id, input).await?))
}

pub async fn delete_project_item(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    ApiPath(id): ApiPath<Uuid>,
) -> ApiResult<StatusCode> {
    state.project_items.delete_project_item(id).await?;
    tracing::info!(actor = %auth.user_id, id = %id, "Deleted project item");
    Ok(StatusCode::NO_CONTENT)
}
