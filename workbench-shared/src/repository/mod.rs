//! Storage access for each resource
//!
//! Each resource has an async repository trait with two implementations:
//!
//! - [`postgres`]: sqlx queries against PostgreSQL
//! - [`memory`]: an in-process store with the same filtering, ordering and
//!   uniqueness semantics, used by the test suites
//!
//! # Shared contract
//!
//! - `create` stores a fully built entity (the caller assigns id and
//!   timestamps); constraint violations surface as [`RepositoryError::Conflict`]
//! - `get_by_id` returns the live row or [`RepositoryError::NotFound`]
//! - `list` applies the filter and pagination and never fails on "no matches"
//! - `update` overwrites the mutable fields of a live row and never revives a
//!   soft-deleted one
//! - `delete` stamps `deleted_at`; deleting twice or deleting an unknown id
//!   succeeds

pub mod memory;
pub mod postgres;

use async_trait::async_trait;
use uuid::Uuid;

use crate::models::{
    Product, ProductFilter, Project, ProjectFilter, ProjectItem, ProjectItemFilter, User,
    UserFilter,
};
use crate::query::{Pagination, SortError};

pub use memory::MemoryStore;
pub use postgres::{
    PgProductRepository, PgProjectItemRepository, PgProjectRepository, PgUserRepository,
};

/// Errors returned by every repository
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    /// No live row with the requested key
    #[error("{resource} not found")]
    NotFound { resource: &'static str },

    /// A unique, foreign key or check constraint rejected the write
    #[error("constraint violation: {constraint}")]
    Conflict { constraint: String },

    /// The sort expression could not be parsed
    #[error(transparent)]
    InvalidSort(#[from] SortError),

    /// Any other storage failure
    #[error("database error: {0}")]
    Database(sqlx::Error),
}

impl From<sqlx::Error> for RepositoryError {
    fn from(err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db_err) = &err {
            if db_err.is_unique_violation()
                || db_err.is_foreign_key_violation()
                || db_err.is_check_violation()
            {
                return RepositoryError::Conflict {
                    constraint: db_err
                        .constraint()
                        .map(str::to_string)
                        .unwrap_or_else(|| db_err.message().to_string()),
                };
            }
        }

        RepositoryError::Database(err)
    }
}

pub type RepositoryResult<T> = Result<T, RepositoryError>;

#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn create(&self, user: &User) -> RepositoryResult<User>;
    async fn get_by_id(&self, id: Uuid) -> RepositoryResult<User>;
    async fn list(&self, filter: &UserFilter, page: &Pagination) -> RepositoryResult<Vec<User>>;
    async fn update(&self, user: &User) -> RepositoryResult<User>;
    async fn delete(&self, id: Uuid) -> RepositoryResult<()>;

    /// Exact, case-sensitive email lookup
    async fn get_by_email(&self, email: &str) -> RepositoryResult<Option<User>>;
}

#[async_trait]
pub trait ProductRepository: Send + Sync {
    async fn create(&self, product: &Product) -> RepositoryResult<Product>;
    async fn get_by_id(&self, id: Uuid) -> RepositoryResult<Product>;
    async fn list(
        &self,
        filter: &ProductFilter,
        page: &Pagination,
    ) -> RepositoryResult<Vec<Product>>;

    /// Writes every field except `stock`
    async fn update(&self, product: &Product) -> RepositoryResult<Product>;
    async fn delete(&self, id: Uuid) -> RepositoryResult<()>;

    async fn get_by_sku(&self, sku: &str) -> RepositoryResult<Option<Product>>;

    /// Overwrites stock with an absolute value
    async fn update_stock(&self, id: Uuid, stock: i32) -> RepositoryResult<Product>;

    /// Adds `delta` to stock in one atomic step
    ///
    /// Returns `None` when the product is missing or the result would be
    /// negative; stock is untouched in both cases.
    async fn adjust_stock(&self, id: Uuid, delta: i32) -> RepositoryResult<Option<Product>>;
}

#[async_trait]
pub trait ProjectRepository: Send + Sync {
    async fn create(&self, project: &Project) -> RepositoryResult<Project>;
    async fn get_by_id(&self, id: Uuid) -> RepositoryResult<Project>;
    async fn list(
        &self,
        filter: &ProjectFilter,
        page: &Pagination,
    ) -> RepositoryResult<Vec<Project>>;
    async fn update(&self, project: &Project) -> RepositoryResult<Project>;
    async fn delete(&self, id: Uuid) -> RepositoryResult<()>;

    /// Live projects of one owner, newest first
    async fn get_by_owner_id(&self, owner_id: Uuid) -> RepositoryResult<Vec<Project>>;
}

#[async_trait]
pub trait ProjectItemRepository: Send + Sync {
    async fn create(&self, item: &ProjectItem) -> RepositoryResult<ProjectItem>;
    async fn get_by_id(&self, id: Uuid) -> RepositoryResult<ProjectItem>;
    async fn list(
        &self,
        filter: &ProjectItemFilter,
        page: &Pagination,
    ) -> RepositoryResult<Vec<ProjectItem>>;
    async fn update(&self, item: &ProjectItem) -> RepositoryResult<ProjectItem>;
    async fn delete(&self, id: Uuid) -> RepositoryResult<()>;

    /// Live items of one project, newest first
    async fn get_by_project_id(&self, project_id: Uuid) -> RepositoryResult<Vec<ProjectItem>>;

    /// Live items assigned to one user, newest first
    async fn get_by_assigned_to(&self, user_id: Uuid) -> RepositoryResult<Vec<ProjectItem>>;
}
