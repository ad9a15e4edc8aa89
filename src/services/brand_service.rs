//! Brand service.
//!
//! Mutations are admin-gated at the API layer; the name uniqueness and the
//! cars referencing a brand are enforced by database constraints.

use async_trait::async_trait;
use std::sync::Arc;

use crate::domain::Brand;
use crate::errors::AppResult;
use crate::infra::UnitOfWork;

/// Brand service trait for dependency injection.
#[async_trait]
pub trait BrandService: Send + Sync {
    /// Create a brand with a unique name
    async fn create(&self, name: String) -> AppResult<Brand>;

    /// Rename a brand
    async fn update(&self, id: i64, name: String) -> AppResult<Brand>;

    /// Delete a brand; conflicts while cars reference it
    async fn delete(&self, id: i64) -> AppResult<()>;

    /// List all brands
    async fn list(&self) -> AppResult<Vec<Brand>>;
}

/// Concrete implementation of BrandService using Unit of Work.
pub struct BrandManager<U: UnitOfWork> {
    uow: Arc<U>,
}

impl<U: UnitOfWork> BrandManager<U> {
    pub fn new(uow: Arc<U>) -> Self {
        Self { uow }
    }
}

#[async_trait]
impl<U: UnitOfWork> BrandService for BrandManager<U> {
    async fn create(&self, name: String) -> AppResult<Brand> {
        let brand = self.uow.brands().create(name).await?;

        tracing::info!(brand_id = brand.id, "brand created");

        Ok(brand)
    }

    async fn update(&self, id: i64, name: String) -> AppResult<Brand> {
        let brand = self.uow.brands().rename(id, name).await?;

        tracing::info!(brand_id = id, "brand updated");

        Ok(brand)
    }

    async fn delete(&self, id: i64) -> AppResult<()> {
        self.uow.brands().delete(id).await?;

        tracing::info!(brand_id = id, "brand deleted");

        Ok(())
    }

    async fn list(&self) -> AppResult<Vec<Brand>> {
        self.uow.brands().list().await
    }
}
