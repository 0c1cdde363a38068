//! User endpoints
//!
//! # Endpoints
//!
//! - `POST   /v1/users` - Create a user (201)
//! - `GET    /v1/users` - List users (`name`, `email`, `created_at_from`,
//!   `created_at_to`, `limit`, `offset`, `sort`)
//! - `GET    /v1/users/:id` - Get a user
//! - `PUT    /v1/users/:id` - Update name, email or password
//! - `DELETE /v1/users/:id` - Soft-delete a user (204)
//!
//! Responses never include the password hash.

use crate::{
    app::AppState,
    error::ApiResult,
    extract::{ApiJson, ApiPath, ListQuery},
    middleware::auth::AuthContext,
};
use axum::{extract::State, http::StatusCode, Extension, Json};
use uuid::Uuid;
use workbench_shared::models::{CreateUser, UpdateUser, User, UserFilter};

pub async fn create_user(
    State(state): State<AppState>,
    ApiJson(input): ApiJson<CreateUser>,
) -> ApiResult<(StatusCode, Json<User>)> {
    let user = state.users.create_user(input).await?;
    Ok((StatusCode::CREATED, Json(user)))
}

pub async fn list_users(
    State(state): State<AppState>,
    query: ListQuery<UserFilter>,
) -> ApiResult<Json<Vec<User>>> {
    let users = state.users.list_users(&query.filter, &query.page).await?;
    tracing::debug!(count = users.len(), "Listed users");
    Ok(Json(users))
}

pub async fn get_user(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<Uuid>,
) -> ApiResult<Json<User>> {
    Ok(Json(state.users.get_user_by_id(id).await?))
}

pub async fn update_user(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<Uuid>,
    ApiJson(input): ApiJson<UpdateUser>,
) -> ApiResult<Json<User>> {
    Ok(Json(state.users.update_user(id, input).await?))
}

pub async fn delete_user(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    ApiPath(id): ApiPath<Uuid>,
) -> ApiResult<StatusCode> {
    state.users.delete_user(id).await?;
    tracing::info!(actor = %auth.user_id, id = %id, "Deleted user");
    Ok(StatusCode::NO_CONTENT)
}
