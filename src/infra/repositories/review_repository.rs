//! Review repository.
//!
//! Creation is optimistic: the insert is attempted and the unique
//! (car_id, user_id) constraint and car foreign key react through the
//! violation adapter. Title search uses the GIN full-text index on
//! `reviews.title`.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait,
    FromQueryResult, JoinType, NotSet, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect,
    RelationTrait, Set,
};

use super::entities::{car, review, user};
use crate::domain::{NewReview, ReviewAuthor, ReviewCar, ReviewDetail, ReviewFilter, ReviewPatch};
use crate::errors::{AppError, AppResult, OptionExt};
use crate::infra::violations::{DbResultExt, Violation};
use crate::types::PaginationParams;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Review repository trait for dependency injection.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait ReviewRepository: Send + Sync {
    /// Insert a review; at most one per (user, car)
    async fn create(&self, review: NewReview) -> AppResult<ReviewDetail>;

    /// Owner-scoped sparse update
    async fn update(&self, user_id: i64, review_id: i64, patch: ReviewPatch)
        -> AppResult<ReviewDetail>;

    /// Owner-scoped delete
    async fn delete(&self, user_id: i64, review_id: i64) -> AppResult<()>;

    /// List reviews matching the filter, newest first
    async fn list(
        &self,
        filter: ReviewFilter,
        pagination: PaginationParams,
    ) -> AppResult<(Vec<ReviewDetail>, u64)>;

    /// Single review joined with author and car
    async fn detail(&self, id: i64) -> AppResult<Option<ReviewDetail>>;
}

/// Concrete implementation of ReviewRepository over the shared pool
pub struct ReviewStore {
    db: Arc<DatabaseConnection>,
}

impl ReviewStore {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl ReviewRepository for ReviewStore {
    async fn create(&self, review: NewReview) -> AppResult<ReviewDetail> {
        let now = Utc::now();
        let active = review::ActiveModel {
            id: NotSet,
            car_id: Set(review.car_id),
            user_id: Set(review.user_id),
            title: Set(review.title),
            content: Set(review.content),
            image_url: Set(review.image_url),
            created_at: Set(now),
            updated_at: Set(now),
        };

        let model = active.insert(&*self.db).await.violation(|v| match v {
            Violation::Unique => Some(AppError::conflict("only one review per car is permitted")),
            Violation::ForeignKey => Some(AppError::not_found("car")),
        })?;

        select_review_detail(&*self.db, model.id)
            .await?
            .ok_or_not_found("review")
    }

    async fn update(
        &self,
        user_id: i64,
        review_id: i64,
        patch: ReviewPatch,
    ) -> AppResult<ReviewDetail> {
        let mut query = review::Entity::update_many()
            .col_expr(review::Column::UpdatedAt, Expr::value(Utc::now()))
            .filter(review::Column::Id.eq(review_id))
            .filter(review::Column::UserId.eq(user_id));

        if let Some(title) = patch.title {
            query = query.col_expr(review::Column::Title, Expr::value(title));
        }
        if let Some(content) = patch.content {
            query = query.col_expr(review::Column::Content, Expr::value(content));
        }
        if let Some(image_url) = patch.image_url {
            query = query.col_expr(review::Column::ImageUrl, Expr::value(image_url));
        }

        let result = query.exec(&*self.db).await.map_err(AppError::from)?;

        if result.rows_affected == 0 {
            return Err(AppError::not_found("review"));
        }

        select_review_detail(&*self.db, review_id)
            .await?
            .ok_or_not_found("review")
    }

    async fn delete(&self, user_id: i64, review_id: i64) -> AppResult<()> {
        let result = review::Entity::delete_many()
            .filter(review::Column::Id.eq(review_id))
            .filter(review::Column::UserId.eq(user_id))
            .exec(&*self.db)
            .await
            .map_err(AppError::from)?;

        if result.rows_affected == 0 {
            return Err(AppError::not_found("review"));
        }

        Ok(())
    }

    async fn list(
        &self,
        filter: ReviewFilter,
        pagination: PaginationParams,
    ) -> AppResult<(Vec<ReviewDetail>, u64)> {
        let mut query = review_select().order_by_desc(review::Column::CreatedAt);

        if let Some(car_id) = filter.car_id {
            query = query.filter(review::Column::CarId.eq(car_id));
        }
        if let Some(search) = &filter.search {
            query = query.filter(Expr::cust_with_values(
                "to_tsvector('english', \"reviews\".\"title\") @@ plainto_tsquery('english', $1)",
                [search.clone()],
            ));
        }

        let paginator = query
            .into_model::<ReviewRow>()
            .paginate(&*self.db, pagination.limit());
        let total = paginator.num_items().await.map_err(AppError::from)?;
        let rows = paginator
            .fetch_page(pagination.page_index())
            .await
            .map_err(AppError::from)?;

        Ok((rows.into_iter().map(ReviewDetail::from).collect(), total))
    }

    async fn detail(&self, id: i64) -> AppResult<Option<ReviewDetail>> {
        select_review_detail(&*self.db, id).await
    }
}

#[derive(Debug, FromQueryResult)]
struct ReviewRow {
    id: i64,
    title: String,
    content: String,
    image_url: String,
    user_id: i64,
    username: String,
    car_id: i64,
    car_model: String,
    created_at: chrono::DateTime<chrono::Utc>,
    updated_at: chrono::DateTime<chrono::Utc>,
}

impl From<ReviewRow> for ReviewDetail {
    fn from(row: ReviewRow) -> Self {
        ReviewDetail {
            id: row.id,
            title: row.title,
            content: row.content,
            image_url: row.image_url,
            user: ReviewAuthor {
                id: row.user_id,
                username: row.username,
            },
            car: ReviewCar {
                id: row.car_id,
                model: row.car_model,
            },
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

fn review_select() -> sea_orm::Select<review::Entity> {
    review::Entity::find()
        .select_only()
        .columns([
            review::Column::Id,
            review::Column::Title,
            review::Column::Content,
            review::Column::ImageUrl,
            review::Column::UserId,
            review::Column::CarId,
            review::Column::CreatedAt,
            review::Column::UpdatedAt,
        ])
        .column_as(user::Column::Username, "username")
        .column_as(car::Column::Model, "car_model")
        .join(JoinType::InnerJoin, review::Relation::User.def())
        .join(JoinType::InnerJoin, review::Relation::Car.def())
}

async fn select_review_detail<C: ConnectionTrait>(
    conn: &C,
    review_id: i64,
) -> AppResult<Option<ReviewDetail>> {
    let row = review_select()
        .filter(review::Column::Id.eq(review_id))
        .into_model::<ReviewRow>()
        .one(conn)
        .await
        .map_err(AppError::from)?;

    Ok(row.map(ReviewDetail::from))
}
