//! Entities and their create/update/filter inputs
//!
//! - `user`: accounts that log in and own projects
//! - `product`: catalogue entries with price and stock
//! - `project`: owned containers for work
//! - `project_item`: units of work inside a project
//!
//! Every entity carries `created_at`, `updated_at` and a nullable
//! `deleted_at`. A row with `deleted_at` set is soft-deleted and invisible to
//! every repository query.

pub mod product;
pub mod project;
pub mod project_item;
pub mod user;

pub use product::{CreateProduct, Product, ProductFilter, UpdateProduct};
pub use project::{CreateProject, Project, ProjectFilter, UpdateProject};
pub use project_item::{CreateProjectItem, ProjectItem, ProjectItemFilter, UpdateProjectItem};
pub use user::{CreateUser, UpdateUser, User, UserFilter};

use serde::{Deserialize, Deserializer};

/// Deserializes a present field (including `null`) as `Some(_)`
///
/// Combined with `#[serde(default)]` an absent field stays `None`, which lets
/// partial updates tell "leave alone" from "clear".
pub(crate) fn double_option<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}
