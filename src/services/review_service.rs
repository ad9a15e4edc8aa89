//! Review service.
//!
//! Creation is optimistic: the insert is attempted and the one-review-per-car
//! constraint reacts, so there is no check-then-act race. Update and delete
//! are owner-scoped.

use async_trait::async_trait;
use std::sync::Arc;

use crate::domain::{NewReview, ReviewDetail, ReviewFilter, ReviewPatch};
use crate::errors::{AppResult, OptionExt};
use crate::infra::UnitOfWork;
use crate::types::PaginationParams;

/// Review service trait for dependency injection.
#[async_trait]
pub trait ReviewService: Send + Sync {
    /// Create a review; at most one per (user, car)
    async fn create(&self, review: NewReview) -> AppResult<ReviewDetail>;

    /// Update the caller's own review
    async fn update(&self, user_id: i64, review_id: i64, patch: ReviewPatch)
        -> AppResult<ReviewDetail>;

    /// Delete the caller's own review
    async fn delete(&self, user_id: i64, review_id: i64) -> AppResult<()>;

    /// Filtered, paginated listing with title search
    async fn list(
        &self,
        filter: ReviewFilter,
        pagination: PaginationParams,
    ) -> AppResult<(Vec<ReviewDetail>, u64)>;

    /// Single review with author and car
    async fn get(&self, id: i64) -> AppResult<ReviewDetail>;
}

/// Concrete implementation of ReviewService using Unit of Work.
pub struct ReviewManager<U: UnitOfWork> {
    uow: Arc<U>,
}

impl<U: UnitOfWork> ReviewManager<U> {
    pub fn new(uow: Arc<U>) -> Self {
        Self { uow }
    }
}

#[async_trait]
impl<U: UnitOfWork> ReviewService for ReviewManager<U> {
    async fn create(&self, review: NewReview) -> AppResult<ReviewDetail> {
        let user_id = review.user_id;
        let detail = self.uow.reviews().create(review).await?;

        tracing::info!(review_id = detail.id, user_id, "review created");

        Ok(detail)
    }

    async fn update(
        &self,
        user_id: i64,
        review_id: i64,
        patch: ReviewPatch,
    ) -> AppResult<ReviewDetail> {
        let detail = self.uow.reviews().update(user_id, review_id, patch).await?;

        tracing::info!(review_id, user_id, "review updated");

        Ok(detail)
    }

    async fn delete(&self, user_id: i64, review_id: i64) -> AppResult<()> {
        self.uow.reviews().delete(user_id, review_id).await?;

        tracing::info!(review_id, user_id, "review deleted");

        Ok(())
    }

    async fn list(
        &self,
        filter: ReviewFilter,
        pagination: PaginationParams,
    ) -> AppResult<(Vec<ReviewDetail>, u64)> {
        self.uow.reviews().list(filter, pagination).await
    }

    async fn get(&self, id: i64) -> AppResult<ReviewDetail> {
        self.uow.reviews().detail(id).await?.ok_or_not_found("review")
    }
}
