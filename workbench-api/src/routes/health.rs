//! Health check endpoints
//!
//! # Endpoints
//!
//! ```text
//! GET /health         detailed status
//! GET /health/live    process is up (always 200)
//! GET /health/ready   database answers (200) or not (503)
//! ```
//!
//! # Response
//!
//! ```json
//! {
//!   "status": "healthy",
//!   "version": "0.1.0",
//!   "database": "connected",
//!   "pool": { "active_connections": 1, "idle_connections": 4, "total_connections": 5 },
//!   "migrations": { "applied_migrations": 1, "latest_version": 20250101000000, "is_up_to_date": true }
//! }
//! ```

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
};
use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use workbench_shared::db::{
    migrations::{get_migration_status, MigrationStatus},
    pool::{get_pool_stats, health_check as ping, PoolStats},
};

/// Health check response
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Service status
    pub status: String,

    /// Application version
    pub version: String,

    /// Database status: `connected`, `disconnected` or `in-memory`
    pub database: String,

    #[serde(skip_deserializing, skip_serializing_if = "Option::is_none")]
    pub pool: Option<PoolStats>,

    #[serde(skip_deserializing, skip_serializing_if = "Option::is_none")]
    pub migrations: Option<MigrationStatus>,
}

/// Detailed health check
///
/// Always answers 200; a database outage shows up as `"status": "degraded"`.
pub async fn health_check(State(state): State<AppState>) -> ApiResult<Json<HealthResponse>> {
    let version = env!("CARGO_PKG_VERSION").to_string();

    let Some(db) = &state.db else {
        return Ok(Json(HealthResponse {
            status: "healthy".to_string(),
            version,
            database: "in-memory".to_string(),
            pool: None,
            migrations: None,
        }));
    };

    let connected = ping(db).await.is_ok();
    let migrations = if connected {
        get_migration_status(db).await.ok()
    } else {
        None
    };

    Ok(Json(HealthResponse {
        status: if connected { "healthy" } else { "degraded" }.to_string(),
        version,
        database: if connected { "connected" } else { "disconnected" }.to_string(),
        pool: Some(get_pool_stats(db)),
        migrations,
    }))
}

pub async fn liveness() -> Json<Value> {
    Json(json!({ "status": "alive" }))
}

pub async fn readiness(State(state): State<AppState>) -> ApiResult<Json<Value>> {
    if let Some(db) = &state.db {
        ping(db).await.map_err(|e| {
            tracing::warn!(error = %e, "Readiness check failed");
            ApiError::ServiceUnavailable("Database is not reachable".to_string())
        })?;
    }

    Ok(Json(json!({ "status": "ready" })))
}
