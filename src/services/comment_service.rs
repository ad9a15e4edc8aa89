//! Comment service.

use async_trait::async_trait;
use std::sync::Arc;

use crate::domain::{CommentView, NewComment};
use crate::errors::AppResult;
use crate::infra::UnitOfWork;

/// Comment service trait for dependency injection.
#[async_trait]
pub trait CommentService: Send + Sync {
    /// Comment on a review
    async fn create(&self, comment: NewComment) -> AppResult<CommentView>;

    /// Update the caller's own comment
    async fn update(&self, user_id: i64, comment_id: i64, content: String)
        -> AppResult<CommentView>;

    /// Delete the caller's own comment
    async fn delete(&self, user_id: i64, comment_id: i64) -> AppResult<()>;

    /// All comments on a review
    async fn list_by_review(&self, review_id: i64) -> AppResult<Vec<CommentView>>;
}

/// Concrete implementation of CommentService using Unit of Work.
pub struct CommentManager<U: UnitOfWork> {
    uow: Arc<U>,
}

impl<U: UnitOfWork> CommentManager<U> {
    pub fn new(uow: Arc<U>) -> Self {
        Self { uow }
    }
}

#[async_trait]
impl<U: UnitOfWork> CommentService for CommentManager<U> {
    async fn create(&self, comment: NewComment) -> AppResult<CommentView> {
        let view = self.uow.comments().create(comment).await?;

        tracing::info!(comment_id = view.id, "comment created");

        Ok(view)
    }

    async fn update(
        &self,
        user_id: i64,
        comment_id: i64,
        content: String,
    ) -> AppResult<CommentView> {
        let view = self.uow.comments().update(user_id, comment_id, content).await?;

        tracing::info!(comment_id, user_id, "comment updated");

        Ok(view)
    }

    async fn delete(&self, user_id: i64, comment_id: i64) -> AppResult<()> {
        self.uow.comments().delete(user_id, comment_id).await?;

        tracing::info!(comment_id, user_id, "comment deleted");

        Ok(())
    }

    async fn list_by_review(&self, review_id: i64) -> AppResult<Vec<CommentView>> {
        self.uow.comments().list_by_review(review_id).await
    }
}
