//! Favorite repository.
//!
//! Add is optimistic: the composite primary key rejects duplicates and the
//! car foreign key rejects unknown cars, both translated by the violation
//! adapter.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, FromQueryResult, JoinType,
    QueryFilter, QueryOrder, QuerySelect, RelationTrait, Set,
};

use super::entities::{brand, car, favorite};
use crate::domain::FavoriteView;
use crate::errors::{AppError, AppResult};
use crate::infra::violations::{DbResultExt, Violation};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Favorite repository trait for dependency injection.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait FavoriteRepository: Send + Sync {
    /// Favorite a car; at most once per (user, car)
    async fn add(&self, user_id: i64, car_id: i64) -> AppResult<()>;

    /// Remove a favorite
    async fn remove(&self, user_id: i64, car_id: i64) -> AppResult<()>;

    /// Denormalized favorites for a user, joined through car and brand
    async fn list_for_user(&self, user_id: i64) -> AppResult<Vec<FavoriteView>>;
}

/// Concrete implementation of FavoriteRepository over the shared pool
pub struct FavoriteStore {
    db: Arc<DatabaseConnection>,
}

impl FavoriteStore {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl FavoriteRepository for FavoriteStore {
    async fn add(&self, user_id: i64, car_id: i64) -> AppResult<()> {
        let active = favorite::ActiveModel {
            user_id: Set(user_id),
            car_id: Set(car_id),
            created_at: Set(Utc::now()),
        };

        active.insert(&*self.db).await.violation(|v| match v {
            Violation::Unique => Some(AppError::conflict("car is already favorited")),
            Violation::ForeignKey => Some(AppError::not_found("car")),
        })?;

        Ok(())
    }

    async fn remove(&self, user_id: i64, car_id: i64) -> AppResult<()> {
        let result = favorite::Entity::delete_many()
            .filter(favorite::Column::UserId.eq(user_id))
            .filter(favorite::Column::CarId.eq(car_id))
            .exec(&*self.db)
            .await
            .map_err(AppError::from)?;

        if result.rows_affected == 0 {
            return Err(AppError::not_found("favorite"));
        }

        Ok(())
    }

    async fn list_for_user(&self, user_id: i64) -> AppResult<Vec<FavoriteView>> {
        let rows = favorite::Entity::find()
            .select_only()
            .column_as(car::Column::Id, "car_id")
            .column_as(brand::Column::Name, "brand")
            .column_as(car::Column::Model, "model")
            .column_as(car::Column::ImageUrl, "image_url")
            .join(JoinType::InnerJoin, favorite::Relation::Car.def())
            .join(JoinType::InnerJoin, car::Relation::Brand.def())
            .filter(favorite::Column::UserId.eq(user_id))
            .order_by_asc(car::Column::Id)
            .into_model::<FavoriteRow>()
            .all(&*self.db)
            .await
            .map_err(AppError::from)?;

        Ok(rows.into_iter().map(FavoriteView::from).collect())
    }
}

#[derive(Debug, FromQueryResult)]
struct FavoriteRow {
    car_id: i64,
    brand: String,
    model: String,
    image_url: String,
}

impl From<FavoriteRow> for FavoriteView {
    fn from(row: FavoriteRow) -> Self {
        FavoriteView {
            car_id: row.car_id,
            brand: row.brand,
            model: row.model,
            image_url: row.image_url,
        }
    }
}
