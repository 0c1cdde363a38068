//! PostgreSQL repositories
//!
//! Every statement filters on `deleted_at IS NULL`, so soft-deleted rows are
//! invisible and can never be updated back to life.

mod product;
mod project;
mod project_item;
mod user;

pub use product::PgProductRepository;
pub use project::PgProjectRepository;
pub use project_item::PgProjectItemRepository;
pub use user::PgUserRepository;

use sqlx::PgPool;
use uuid::Uuid;

/// `UPDATE <table> SET deleted_at = NOW()` for a live row
///
/// Zero affected rows is not an error.
async fn soft_delete(pool: &PgPool, table: &'static str, id: Uuid) -> Result<(), sqlx::Error> {
    let result = sqlx::query(&format!(
        "UPDATE {} SET deleted_at = NOW() WHERE id = $1 AND deleted_at IS NULL",
        table
    ))
    .bind(id)
    .execute(pool)
    .await?;

    tracing::debug!(table, %id, rows = result.rows_affected(), "Soft delete");
    Ok(())
}
