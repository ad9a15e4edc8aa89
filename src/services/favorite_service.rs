//! Favorite service.
//!
//! Add is optimistic against the composite primary key; the listing joins
//! through car and brand for a denormalized summary.

use async_trait::async_trait;
use std::sync::Arc;

use crate::domain::FavoriteView;
use crate::errors::AppResult;
use crate::infra::UnitOfWork;

/// Favorite service trait for dependency injection.
#[async_trait]
pub trait FavoriteService: Send + Sync {
    /// Favorite a car for the authenticated user
    async fn add(&self, user_id: i64, car_id: i64) -> AppResult<()>;

    /// Remove a favorite
    async fn remove(&self, user_id: i64, car_id: i64) -> AppResult<()>;

    /// Denormalized favorites for the authenticated user
    async fn list(&self, user_id: i64) -> AppResult<Vec<FavoriteView>>;
}

/// Concrete implementation of FavoriteService using Unit of Work.
pub struct FavoriteManager<U: UnitOfWork> {
    uow: Arc<U>,
}

impl<U: UnitOfWork> FavoriteManager<U> {
    pub fn new(uow: Arc<U>) -> Self {
        Self { uow }
    }
}

#[async_trait]
impl<U: UnitOfWork> FavoriteService for FavoriteManager<U> {
    async fn add(&self, user_id: i64, car_id: i64) -> AppResult<()> {
        self.uow.favorites().add(user_id, car_id).await?;

        tracing::info!(user_id, car_id, "car favorited");

        Ok(())
    }

    async fn remove(&self, user_id: i64, car_id: i64) -> AppResult<()> {
        self.uow.favorites().remove(user_id, car_id).await?;

        tracing::info!(user_id, car_id, "car unfavorited");

        Ok(())
    }

    async fn list(&self, user_id: i64) -> AppResult<Vec<FavoriteView>> {
        self.uow.favorites().list_for_user(user_id).await
    }
}
