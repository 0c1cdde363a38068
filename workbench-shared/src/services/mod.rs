//! Business rules on top of the repositories
//!
//! Services own validation, defaults and computed mutations. Each one is
//! built with a repository handle and a [`tracing::Span`]; every event a
//! service emits is recorded under that span, so callers decide where service
//! logs attach.
//!
//! Create and update paths share one validation function per resource.

pub mod product;
pub mod project;
pub mod project_item;
pub mod user;

pub use product::ProductService;
pub use project::ProjectService;
pub use project_item::ProjectItemService;
pub use user::UserService;

use crate::auth::password::PasswordError;
use crate::repository::RepositoryError;

/// Errors surfaced by every service
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    /// Input broke a rule
    #[error("{field}: {message}")]
    Validation { field: &'static str, message: String },

    #[error("{resource} not found")]
    NotFound { resource: &'static str },

    /// A uniqueness or reference constraint rejected the write
    #[error("conflict: {0}")]
    Conflict(String),

    #[error("insufficient stock: {available} available, {requested} requested")]
    InsufficientStock { available: i32, requested: i32 },

    /// Email/password pair did not match
    #[error("invalid credentials")]
    Unauthorized,

    #[error(transparent)]
    Password(#[from] PasswordError),

    #[error(transparent)]
    Repository(RepositoryError),
}

impl ServiceError {
    pub fn validation(field: &'static str, message: impl Into<String>) -> Self {
        ServiceError::Validation {
            field,
            message: message.into(),
        }
    }
}

impl From<RepositoryError> for ServiceError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::NotFound { resource } => ServiceError::NotFound { resource },
            RepositoryError::Conflict { constraint } => ServiceError::Conflict(constraint),
            RepositoryError::InvalidSort(e) => ServiceError::validation("sort", e.to_string()),
            other => ServiceError::Repository(other),
        }
    }
}

pub type ServiceResult<T> = Result<T, ServiceError>;

/// Rejects empty or whitespace-only strings
pub(crate) fn require_non_blank(field: &'static str, value: &str) -> ServiceResult<()> {
    if value.trim().is_empty() {
        return Err(ServiceError::validation(field, "must not be blank"));
    }
    Ok(())
}

/// `Some("")` and `Some("  ")` count as absent
pub(crate) fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::SortError;

    #[test]
    fn test_repository_errors_map_to_service_errors() {
        assert!(matches!(
            ServiceError::from(RepositoryError::NotFound { resource: "product" }),
            ServiceError::NotFound { resource: "product" }
        ));
        assert!(matches!(
            ServiceError::from(RepositoryError::Conflict {
                constraint: "products_sku_live_key".to_string()
            }),
            ServiceError::Conflict(c) if c == "products_sku_live_key"
        ));
        assert!(matches!(
            ServiceError::from(RepositoryError::InvalidSort(SortError("x y z".to_string()))),
            ServiceError::Validation { field: "sort", .. }
        ));
    }

    #[test]
    fn test_require_non_blank() {
        assert!(require_non_blank("name", "Desk").is_ok());
        assert!(require_non_blank("name", "").is_err());
        assert!(require_non_blank("name", "   ").is_err());
    }
}
