//! Projects
//!
//! Every project has an owning user. Status is a free-form string that
//! defaults to `"active"`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::double_option;
use crate::query::{Condition, Conditions, Filter};

pub const DEFAULT_PROJECT_STATUS: &str = "active";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Project {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub status: String,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
    pub budget: Option<f64>,

    /// References `users.id`
    pub owner_id: Uuid,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateProject {
    pub name: String,
    #[serde(default)]
    pub description: String,

    /// Blank or absent means [`DEFAULT_PROJECT_STATUS`]
    #[serde(default)]
    pub status: Option<String>,

    #[serde(default)]
    pub start_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub end_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub budget: Option<f64>,
    pub owner_id: Uuid,
}

/// Partial update
///
/// Nullable fields take `Some(None)` (JSON `null`) to clear them.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateProject {
    pub name: Option<String>,
    pub description: Option<String>,
    pub status: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    pub start_date: Option<Option<DateTime<Utc>>>,
    #[serde(default, deserialize_with = "double_option")]
    pub end_date: Option<Option<DateTime<Utc>>>,
    #[serde(default, deserialize_with = "double_option")]
    pub budget: Option<Option<f64>>,
    pub owner_id: Option<Uuid>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProjectFilter {
    pub name: Option<String>,
    pub status: Option<String>,
    pub owner_id: Option<Uuid>,
    pub start_date_from: Option<DateTime<Utc>>,
    pub start_date_to: Option<DateTime<Utc>>,
    pub end_date_from: Option<DateTime<Utc>>,
    pub end_date_to: Option<DateTime<Utc>>,
    pub budget_from: Option<f64>,
    pub budget_to: Option<f64>,
    pub created_at_from: Option<DateTime<Utc>>,
    pub created_at_to: Option<DateTime<Utc>>,
}

impl Filter for ProjectFilter {
    fn conditions(&self) -> Vec<Condition> {
        Conditions::new()
            .contains("name", &self.name)
            .equals("status", &self.status)
            .equals("owner_id", &self.owner_id)
            .range("start_date", &self.start_date_from, &self.start_date_to)
            .range("end_date", &self.end_date_from, &self.end_date_to)
            .range("budget", &self.budget_from, &self.budget_to)
            .range("created_at", &self.created_at_from, &self.created_at_to)
            .build()
    }
}
