//! Project items (tasks within a project)
//!
//! Status defaults to `"pending"` and priority to `"medium"`; both are
//! free-form strings with no enforced transitions.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::double_option;
use crate::query::{Condition, Conditions, Filter};

pub const DEFAULT_ITEM_STATUS: &str = "pending";
pub const DEFAULT_ITEM_PRIORITY: &str = "medium";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct ProjectItem {
    pub id: Uuid,

    /// References `projects.id`
    pub project_id: Uuid,

    pub name: String,
    pub description: String,
    pub status: String,
    pub priority: String,
    pub estimated_hours: Option<f64>,
    pub actual_hours: Option<f64>,
    pub due_date: Option<DateTime<Utc>>,

    /// References `users.id`
    pub assigned_to: Option<Uuid>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateProjectItem {
    pub project_id: Uuid,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub priority: Option<String>,
    #[serde(default)]
    pub estimated_hours: Option<f64>,
    #[serde(default)]
    pub actual_hours: Option<f64>,
    #[serde(default)]
    pub due_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub assigned_to: Option<Uuid>,
}

/// Partial update; `Some(None)` clears a nullable field
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateProjectItem {
    pub project_id: Option<Uuid>,
    pub name: Option<String>,
    pub description: Option<String>,
    pub status: Option<String>,
    pub priority: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    pub estimated_hours: Option<Option<f64>>,
    #[serde(default, deserialize_with = "double_option")]
    pub actual_hours: Option<Option<f64>>,
    #[serde(default, deserialize_with = "double_option")]
    pub due_date: Option<Option<DateTime<Utc>>>,
    #[serde(default, deserialize_with = "double_option")]
    pub assigned_to: Option<Option<Uuid>>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProjectItemFilter {
    pub project_id: Option<Uuid>,
    pub name: Option<String>,
    pub status: Option<String>,
    pub priority: Option<String>,
    pub assigned_to: Option<Uuid>,
    pub due_date_from: Option<DateTime<Utc>>,
    pub due_date_to: Option<DateTime<Utc>>,
    pub estimated_hours_from: Option<f64>,
    pub estimated_hours_to: Option<f64>,
    pub actual_hours_from: Option<f64>,
    pub actual_hours_to: Option<f64>,
    pub created_at_from: Option<DateTime<Utc>>,
    pub created_at_to: Option<DateTime<Utc>>,
}

impl Filter for ProjectItemFilter {
    fn conditions(&self) -> Vec<Condition> {
        Conditions::new()
            .equals("project_id", &self.project_id)
            .contains("name", &self.name)
            .equals("status", &self.status)
            .equals("priority", &self.priority)
            .equals("assigned_to", &self.assigned_to)
            .range("due_date", &self.due_date_from, &self.due_date_to)
            .range("estimated_hours", &self.estimated_hours_from, &self.estimated_hours_to)
            .range("actual_hours", &self.actual_hours_from, &self.actual_hours_to)
            .range("created_at", &self.created_at_from, &self.created_at_to)
            .build()
    }
}
