//! Product catalogue and stock

use chrono::Utc;
use std::sync::Arc;
use tracing::{info, warn, Span};
use uuid::Uuid;

use super::{require_non_blank, ServiceError, ServiceResult};
use crate::models::{CreateProduct, Product, ProductFilter, UpdateProduct};
use crate::query::Pagination;
use crate::repository::ProductRepository;

/// Rules shared by create and update
pub fn validate_product(product: &Product) -> ServiceResult<()> {
    require_non_blank("name", &product.name)?;
    require_non_blank("sku", &product.sku)?;
    if product.price.is_nan() || product.price <= 0.0 {
        return Err(ServiceError::validation("price", "must be greater than 0"));
    }
    if product.stock < 0 {
        return Err(ServiceError::validation("stock", "must not be negative"));
    }
    Ok(())
}

#[derive(Clone)]
pub struct ProductService {
    repo: Arc<dyn ProductRepository>,
    span: Span,
}

impl ProductService {
    pub fn new(repo: Arc<dyn ProductRepository>, span: Span) -> Self {
        Self { repo, span }
    }

    /// Validates and stores a new product
    ///
    /// A SKU already used by a live product is reported as
    /// `ServiceError::Conflict` by the unique index.
    pub async fn create_product(&self, input: CreateProduct) -> ServiceResult<Product> {
        let now = Utc::now();
        let product = Product {
            id: Uuid::new_v4(),
            name: input.name.trim().to_string(),
            description: input.description,
            price: input.price,
            stock: input.stock,
            category: input.category.trim().to_string(),
            sku: input.sku.trim().to_string(),
            created_at: now,
            updated_at: now,
            deleted_at: None,
        };
        validate_product(&product)?;

        let product = self.repo.create(&product).await?;
        info!(parent: &self.span, product_id = %product.id, sku = %product.sku, "Product created");
        Ok(product)
    }

    pub async fn get_product_by_id(&self, id: Uuid) -> ServiceResult<Product> {
        Ok(self.repo.get_by_id(id).await?)
    }

    pub async fn get_product_by_sku(&self, sku: &str) -> ServiceResult<Product> {
        self.repo
            .get_by_sku(sku)
            .await?
            .ok_or(ServiceError::NotFound { resource: "product" })
    }

    pub async fn list_products(
        &self,
        filter: &ProductFilter,
        page: &Pagination,
    ) -> ServiceResult<Vec<Product>> {
        Ok(self.repo.list(filter, page).await?)
    }

    /// Patches everything except stock
    pub async fn update_product(&self, id: Uuid, input: UpdateProduct) -> ServiceResult<Product> {
        let mut product = self.repo.get_by_id(id).await?;

        if let Some(name) = input.name {
            product.name = name.trim().to_string();
        }
        if let Some(description) = input.description {
            product.description = description;
        }
        if let Some(price) = input.price {
            product.price = price;
        }
        if let Some(category) = input.category {
            product.category = category.trim().to_string();
        }
        if let Some(sku) = input.sku {
            product.sku = sku.trim().to_string();
        }
        validate_product(&product)?;
        product.updated_at = Utc::now();

        let product = self.repo.update(&product).await?;
        info!(parent: &self.span, product_id = %product.id, "Product updated");
        Ok(product)
    }

    /// Adds a signed quantity to the product's stock
    ///
    /// # Errors
    ///
    /// - `NotFound` if the product does not exist
    /// - `InsufficientStock` if the result would go below zero; stock is left
    ///   unchanged
    pub async fn update_product_stock(&self, id: Uuid, quantity: i32) -> ServiceResult<Product> {
        if let Some(product) = self.repo.adjust_stock(id, quantity).await? {
            info!(
                parent: &self.span,
                product_id = %id,
                quantity,
                stock = product.stock,
                "Product stock adjusted"
            );
            return Ok(product);
        }

        // Nothing was written; find out why
        let current = self.repo.get_by_id(id).await?;
        warn!(
            parent: &self.span,
            product_id = %id,
            available = current.stock,
            quantity,
            "Stock adjustment rejected"
        );
        Err(ServiceError::InsufficientStock {
            available: current.stock,
            requested: quantity.saturating_neg(),
        })
    }

    pub async fn delete_product(&self, id: Uuid) -> ServiceResult<()> {
        self.repo.delete(id).await?;
        info!(parent: &self.span, product_id = %id, "Product deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn product(price: f64, stock: i32) -> Product {
        let now = Utc::now();
        Product {
            id: Uuid::new_v4(),
            name: "Desk".to_string(),
            description: String::new(),
            price,
            stock,
            category: String::new(),
            sku: "DSK-1".to_string(),
            created_at: now,
            updated_at: now,
            deleted_at: None,
        }
    }

    #[test]
    fn test_price_must_be_positive() {
        assert!(validate_product(&product(0.01, 0)).is_ok());
        assert!(matches!(
            validate_product(&product(0.0, 0)),
            Err(ServiceError::Validation { field: "price", .. })
        ));
        assert!(validate_product(&product(-1.0, 0)).is_err());
        assert!(validate_product(&product(f64::NAN, 0)).is_err());
    }

    #[test]
    fn test_stock_must_not_be_negative() {
        assert!(matches!(
            validate_product(&product(1.0, -1)),
            Err(ServiceError::Validation { field: "stock", .. })
        ));
    }

    #[test]
    fn test_name_and_sku_required() {
        let mut p = product(1.0, 0);
        p.sku = "  ".to_string();
        assert!(matches!(
            validate_product(&p),
            Err(ServiceError::Validation { field: "sku", .. })
        ));

        p.name = String::new();
        assert!(matches!(
            validate_product(&p),
            Err(ServiceError::Validation { field: "name", .. })
        ));
    }
}
