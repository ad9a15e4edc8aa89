//! Brand repository.
//!
//! Brand mutations are single-row writes; uniqueness and the cars
//! referencing a brand are both enforced by database constraints and
//! translated through the violation adapter.

use std::sync::Arc;

use async_trait::async_trait;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, NotSet, QueryFilter,
    QueryOrder, Set,
};

use super::entities::brand;
use crate::domain::Brand;
use crate::errors::{AppError, AppResult, OptionExt};
use crate::infra::violations::{DbResultExt, Violation};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Brand repository trait for dependency injection.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait BrandRepository: Send + Sync {
    /// Create a brand; duplicate name is a conflict
    async fn create(&self, name: String) -> AppResult<Brand>;

    /// Rename a brand; duplicate name is a conflict
    async fn rename(&self, id: i64, name: String) -> AppResult<Brand>;

    /// Delete a brand; fails with a conflict while cars reference it
    async fn delete(&self, id: i64) -> AppResult<()>;

    /// List all brands ordered by id
    async fn list(&self) -> AppResult<Vec<Brand>>;
}

/// Concrete implementation of BrandRepository over the shared pool
pub struct BrandStore {
    db: Arc<DatabaseConnection>,
}

impl BrandStore {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl BrandRepository for BrandStore {
    async fn create(&self, name: String) -> AppResult<Brand> {
        let active = brand::ActiveModel {
            id: NotSet,
            name: Set(name),
        };

        let model = active.insert(&*self.db).await.violation(|v| match v {
            Violation::Unique => Some(AppError::conflict("brand name already exists")),
            _ => None,
        })?;

        Ok(Brand::from(model))
    }

    async fn rename(&self, id: i64, name: String) -> AppResult<Brand> {
        let result = brand::Entity::update_many()
            .col_expr(brand::Column::Name, Expr::value(name))
            .filter(brand::Column::Id.eq(id))
            .exec(&*self.db)
            .await
            .violation(|v| match v {
                Violation::Unique => Some(AppError::conflict("brand name already exists")),
                _ => None,
            })?;

        if result.rows_affected == 0 {
            return Err(AppError::not_found("brand"));
        }

        let model = brand::Entity::find_by_id(id)
            .one(&*self.db)
            .await
            .map_err(AppError::from)?
            .ok_or_not_found("brand")?;

        Ok(Brand::from(model))
    }

    async fn delete(&self, id: i64) -> AppResult<()> {
        let result = brand::Entity::delete_by_id(id)
            .exec(&*self.db)
            .await
            .violation(|v| match v {
                Violation::ForeignKey => {
                    Some(AppError::conflict("brand is still referenced by cars"))
                }
                _ => None,
            })?;

        if result.rows_affected == 0 {
            return Err(AppError::not_found("brand"));
        }

        Ok(())
    }

    async fn list(&self) -> AppResult<Vec<Brand>> {
        let models = brand::Entity::find()
            .order_by_asc(brand::Column::Id)
            .all(&*self.db)
            .await
            .map_err(AppError::from)?;

        Ok(models.into_iter().map(Brand::from).collect())
    }
}
