use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use super::soft_delete;
use crate::models::{Product, ProductFilter};
use crate::query::{sql::select_live, Filter, Pagination};
use crate::repository::{ProductRepository, RepositoryError, RepositoryResult};

const COLUMNS: &str =
    "id, name, description, price, stock, category, sku, created_at, updated_at, deleted_at";

#[derive(Debug, Clone)]
pub struct PgProductRepository {
    pool: PgPool,
}

impl PgProductRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn not_found() -> RepositoryError {
    RepositoryError::NotFound { resource: "product" }
}

#[async_trait]
impl ProductRepository for PgProductRepository {
    async fn create(&self, product: &Product) -> RepositoryResult<Product> {
        let created = sqlx::query_as::<_, Product>(&format!(
            r#"
            INSERT INTO products (id, name, description, price, stock, category, sku, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING {}
            "#,
            COLUMNS
        ))
        .bind(product.id)
        .bind(&product.name)
        .bind(&product.description)
        .bind(product.price)
        .bind(product.stock)
        .bind(&product.category)
        .bind(&product.sku)
        .bind(product.created_at)
        .bind(product.updated_at)
        .fetch_one(&self.pool)
        .await?;

        Ok(created)
    }

    async fn get_by_id(&self, id: Uuid) -> RepositoryResult<Product> {
        sqlx::query_as::<_, Product>(&format!(
            "SELECT {} FROM products WHERE id = $1 AND deleted_at IS NULL",
            COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(not_found)
    }

    async fn list(
        &self,
        filter: &ProductFilter,
        page: &Pagination,
    ) -> RepositoryResult<Vec<Product>> {
        let mut query = select_live("products", COLUMNS, filter.conditions(), page)?;
        let products = query.build_query_as::<Product>().fetch_all(&self.pool).await?;
        Ok(products)
    }

    async fn update(&self, product: &Product) -> RepositoryResult<Product> {
        sqlx::query_as::<_, Product>(&format!(
            r#"
            UPDATE products
            SET name = $2, description = $3, price = $4, category = $5, sku = $6, updated_at = $7
            WHERE id = $1 AND deleted_at IS NULL
            RETURNING {}
            "#,
            COLUMNS
        ))
        .bind(product.id)
        .bind(&product.name)
        .bind(&product.description)
        .bind(product.price)
        .bind(&product.category)
        .bind(&product.sku)
        .bind(product.updated_at)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(not_found)
    }

    async fn delete(&self, id: Uuid) -> RepositoryResult<()> {
        soft_delete(&self.pool, "products", id).await?;
        Ok(())
    }

    async fn get_by_sku(&self, sku: &str) -> RepositoryResult<Option<Product>> {
        let product = sqlx::query_as::<_, Product>(&format!(
            "SELECT {} FROM products WHERE sku = $1 AND deleted_at IS NULL",
            COLUMNS
        ))
        .bind(sku)
        .fetch_optional(&self.pool)
        .await?;

        Ok(product)
    }

    async fn update_stock(&self, id: Uuid, stock: i32) -> RepositoryResult<Product> {
        sqlx::query_as::<_, Product>(&format!(
            r#"
            UPDATE products
            SET stock = $2, updated_at = NOW()
            WHERE id = $1 AND deleted_at IS NULL
            RETURNING {}
            "#,
            COLUMNS
        ))
        .bind(id)
        .bind(stock)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(not_found)
    }

    async fn adjust_stock(&self, id: Uuid, delta: i32) -> RepositoryResult<Option<Product>> {
        // Single statement: concurrent adjustments serialize on the row lock
        let product = sqlx::query_as::<_, Product>(&format!(
            r#"
            UPDATE products
            SET stock = stock + $2, updated_at = NOW()
            WHERE id = $1 AND deleted_at IS NULL AND stock + $2 >= 0
            RETURNING {}
            "#,
            COLUMNS
        ))
        .bind(id)
        .bind(delta)
        .fetch_optional(&self.pool)
        .await?;

        Ok(product)
    }
}
