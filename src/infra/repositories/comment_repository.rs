//! Comment repository.
//!
//! Comment reads embed the author summary through an explicit join so the
//! fetch cost stays predictable.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait,
    FromQueryResult, JoinType, NotSet, QueryFilter, QueryOrder, QuerySelect, RelationTrait, Set,
};

use super::entities::{comment, user};
use crate::domain::{CommentAuthor, CommentView, NewComment};
use crate::errors::{AppError, AppResult, OptionExt};
use crate::infra::violations::{DbResultExt, Violation};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Comment repository trait for dependency injection.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait CommentRepository: Send + Sync {
    /// Insert a comment on a review
    async fn create(&self, comment: NewComment) -> AppResult<CommentView>;

    /// Owner-scoped content update
    async fn update(&self, user_id: i64, comment_id: i64, content: String)
        -> AppResult<CommentView>;

    /// Owner-scoped delete
    async fn delete(&self, user_id: i64, comment_id: i64) -> AppResult<()>;

    /// All comments on a review, oldest first
    async fn list_by_review(&self, review_id: i64) -> AppResult<Vec<CommentView>>;
}

/// Concrete implementation of CommentRepository over the shared pool
pub struct CommentStore {
    db: Arc<DatabaseConnection>,
}

impl CommentStore {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl CommentRepository for CommentStore {
    async fn create(&self, new_comment: NewComment) -> AppResult<CommentView> {
        let now = Utc::now();
        let active = comment::ActiveModel {
            id: NotSet,
            review_id: Set(new_comment.review_id),
            user_id: Set(new_comment.user_id),
            content: Set(new_comment.content),
            created_at: Set(now),
            updated_at: Set(now),
        };

        let model = active.insert(&*self.db).await.violation(|v| match v {
            Violation::ForeignKey => Some(AppError::not_found("review")),
            _ => None,
        })?;

        select_comment_view(&*self.db, model.id)
            .await?
            .ok_or_not_found("comment")
    }

    async fn update(
        &self,
        user_id: i64,
        comment_id: i64,
        content: String,
    ) -> AppResult<CommentView> {
        let result = comment::Entity::update_many()
            .col_expr(comment::Column::Content, Expr::value(content))
            .col_expr(comment::Column::UpdatedAt, Expr::value(Utc::now()))
            .filter(comment::Column::Id.eq(comment_id))
            .filter(comment::Column::UserId.eq(user_id))
            .exec(&*self.db)
            .await
            .map_err(AppError::from)?;

        if result.rows_affected == 0 {
            return Err(AppError::not_found("comment"));
        }

        select_comment_view(&*self.db, comment_id)
            .await?
            .ok_or_not_found("comment")
    }

    async fn delete(&self, user_id: i64, comment_id: i64) -> AppResult<()> {
        let result = comment::Entity::delete_many()
            .filter(comment::Column::Id.eq(comment_id))
            .filter(comment::Column::UserId.eq(user_id))
            .exec(&*self.db)
            .await
            .map_err(AppError::from)?;

        if result.rows_affected == 0 {
            return Err(AppError::not_found("comment"));
        }

        Ok(())
    }

    async fn list_by_review(&self, review_id: i64) -> AppResult<Vec<CommentView>> {
        let rows = comment_select()
            .filter(comment::Column::ReviewId.eq(review_id))
            .order_by_asc(comment::Column::Id)
            .into_model::<CommentRow>()
            .all(&*self.db)
            .await
            .map_err(AppError::from)?;

        Ok(rows.into_iter().map(CommentView::from).collect())
    }
}

#[derive(Debug, FromQueryResult)]
struct CommentRow {
    id: i64,
    review_id: i64,
    content: String,
    user_id: i64,
    username: String,
    created_at: chrono::DateTime<chrono::Utc>,
    updated_at: chrono::DateTime<chrono::Utc>,
}

impl From<CommentRow> for CommentView {
    fn from(row: CommentRow) -> Self {
        CommentView {
            id: row.id,
            review_id: row.review_id,
            content: row.content,
            user: CommentAuthor {
                id: row.user_id,
                username: row.username,
            },
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

fn comment_select() -> sea_orm::Select<comment::Entity> {
    comment::Entity::find()
        .select_only()
        .columns([
            comment::Column::Id,
            comment::Column::ReviewId,
            comment::Column::Content,
            comment::Column::UserId,
            comment::Column::CreatedAt,
            comment::Column::UpdatedAt,
        ])
        .column_as(user::Column::Username, "username")
        .join(JoinType::InnerJoin, comment::Relation::User.def())
}

async fn select_comment_view<C: ConnectionTrait>(
    conn: &C,
    comment_id: i64,
) -> AppResult<Option<CommentView>> {
    let row = comment_select()
        .filter(comment::Column::Id.eq(comment_id))
        .into_model::<CommentRow>()
        .one(conn)
        .await
        .map_err(AppError::from)?;

    Ok(row.map(CommentView::from))
}
