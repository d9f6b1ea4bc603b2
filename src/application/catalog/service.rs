//! Catalog service: browsing and admin product management

use std::sync::Arc;

use tracing::info;

use crate::domain::product::{NewProduct, Product, ProductChanges, ProductImage, ProductQuery};
use crate::domain::{DomainError, DomainResult, RepositoryProvider};
use crate::shared::{PaginatedResult, PaginationParams};

pub struct CatalogService {
    repos: Arc<dyn RepositoryProvider>,
}

impl CatalogService {
    pub fn new(repos: Arc<dyn RepositoryProvider>) -> Self {
        Self { repos }
    }

    // ── Browsing ────────────────────────────────────────────────

    pub async fn list_products(
        &self,
        search: Option<String>,
        featured: Option<bool>,
        pagination: PaginationParams,
    ) -> DomainResult<PaginatedResult<Product>> {
        self.repos
            .products()
            .list(ProductQuery {
                search,
                featured,
                pagination,
            })
            .await
    }

    pub async fn featured_products(&self) -> DomainResult<Vec<Product>> {
        let page = self
            .repos
            .products()
            .list(ProductQuery {
                search: None,
                featured: Some(true),
                pagination: PaginationParams::new(Some(1), Some(100)),
            })
            .await?;
        Ok(page.items)
    }

    /// Available product by id; retired products are not found.
    pub async fn get_product(&self, id: &str) -> DomainResult<Product> {
        self.repos
            .products()
            .find_by_id(id)
            .await?
            .filter(|p| p.available)
            .ok_or_else(|| DomainError::not_found("Product", "id", id))
    }

    pub async fn product_image(&self, product_id: &str) -> DomainResult<ProductImage> {
        self.repos
            .products()
            .image(product_id)
            .await?
            .ok_or_else(|| DomainError::not_found("ProductImage", "product_id", product_id))
    }

    // ── Administration ──────────────────────────────────────────

    pub async fn create_product(&self, product: NewProduct) -> DomainResult<Product> {
        product.validate()?;
        if self.repos.products().find_by_name(&product.name).await?.is_some() {
            return Err(DomainError::Conflict(format!(
                "A product named '{}' already exists",
                product.name.trim()
            )));
        }

        let created = self.repos.products().create(product).await?;
        info!(product_id = %created.id, name = %created.name, price_cents = created.price_cents, "Product created");
        Ok(created)
    }

    pub async fn update_product(&self, id: &str, changes: ProductChanges) -> DomainResult<Product> {
        changes.validate()?;
        if let Some(name) = &changes.name {
            if let Some(other) = self.repos.products().find_by_name(name).await? {
                if other.id != id {
                    return Err(DomainError::Conflict(format!(
                        "A product named '{}' already exists",
                        name.trim()
                    )));
                }
            }
        }

        let updated = self.repos.products().update(id, changes).await?;
        info!(product_id = %updated.id, "Product updated");
        Ok(updated)
    }

    /// Mark a product unavailable. It stays referenced by past orders.
    pub async fn retire_product(&self, id: &str) -> DomainResult<()> {
        let removed_lines = self.repos.products().retire(id).await?;
        info!(product_id = id, removed_lines, "Product retired");
        Ok(())
    }

    pub async fn count_products(&self) -> DomainResult<u64> {
        self.repos.products().count_available().await
    }
}
