//! Review handlers. Reads are public; mutations are owner-scoped.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Json,
    routing::get,
    Router,
};
use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::api::extractors::ValidatedJson;
use crate::api::middleware::CurrentUser;
use crate::api::AppState;
use crate::domain::{CommentView, NewReview, ReviewDetail, ReviewFilter, ReviewPatch};
use crate::errors::AppResult;
use crate::types::{ApiResponse, MessageResponse, PageMeta, PaginationParams};

/// Review creation request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct ReviewCreateRequest {
    pub car_id: i64,
    #[validate(length(min = 1, max = 100, message = "Title must be 1-100 characters"))]
    pub title: String,
    #[validate(length(min = 1, message = "Content is required"))]
    pub content: String,
    #[validate(url(message = "Image must be a valid URL"))]
    pub image_url: String,
}

/// Sparse review update; absent fields leave stored values unchanged
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct ReviewUpdateRequest {
    #[validate(length(min = 1, max = 100, message = "Title must be 1-100 characters"))]
    pub title: Option<String>,
    #[validate(length(min = 1, message = "Content must not be empty"))]
    pub content: Option<String>,
    #[validate(url(message = "Image must be a valid URL"))]
    pub image_url: Option<String>,
}

/// Review list filters
#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ReviewListQuery {
    /// Restrict to one car
    pub car_id: Option<i64>,
    /// Full-text search against titles
    pub search: Option<String>,
}

impl From<ReviewListQuery> for ReviewFilter {
    fn from(query: ReviewListQuery) -> Self {
        ReviewFilter {
            car_id: query.car_id,
            search: query.search,
        }
    }
}

/// Create review routes
pub fn review_routes() -> Router<AppState> {
    Router::new()
        .route("/reviews", get(list_reviews).post(create_review))
        .route(
            "/reviews/:id",
            get(get_review).patch(update_review).delete(delete_review),
        )
        .route("/reviews/:id/comments", get(list_review_comments))
}

/// List reviews with filters and pagination
#[utoipa::path(
    get,
    path = "/api/reviews",
    tag = "Reviews",
    params(ReviewListQuery, PaginationParams),
    responses(
        (status = 200, description = "Review page", body = [ReviewDetail])
    )
)]
pub async fn list_reviews(
    State(state): State<AppState>,
    Query(filter): Query<ReviewListQuery>,
    Query(pagination): Query<PaginationParams>,
) -> AppResult<(StatusCode, Json<ApiResponse<Vec<ReviewDetail>>>)> {
    let (reviews, total) = state
        .reviews
        .list(filter.into(), pagination.clone())
        .await?;
    let meta = PageMeta::new(&pagination, total);

    Ok(ApiResponse::paginated(reviews, meta))
}

/// Single review with author and car
#[utoipa::path(
    get,
    path = "/api/reviews/{id}",
    tag = "Reviews",
    params(("id" = i64, Path, description = "Review ID")),
    responses(
        (status = 200, description = "Review detail", body = ReviewDetail),
        (status = 404, description = "Review not found")
    )
)]
pub async fn get_review(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<(StatusCode, Json<ApiResponse<ReviewDetail>>)> {
    let review = state.reviews.get(id).await?;

    Ok(ApiResponse::ok(review))
}

/// Comments on a review
#[utoipa::path(
    get,
    path = "/api/reviews/{id}/comments",
    tag = "Reviews",
    params(("id" = i64, Path, description = "Review ID")),
    responses(
        (status = 200, description = "Comments on the review", body = [CommentView])
    )
)]
pub async fn list_review_comments(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<(StatusCode, Json<ApiResponse<Vec<CommentView>>>)> {
    let comments = state.comments.list_by_review(id).await?;

    Ok(ApiResponse::ok(comments))
}

/// Create a review; one per user per car
#[utoipa::path(
    post,
    path = "/api/reviews",
    tag = "Reviews",
    security(("bearer_auth" = [])),
    request_body = ReviewCreateRequest,
    responses(
        (status = 201, description = "Review created", body = ReviewDetail),
        (status = 401, description = "Missing or invalid token"),
        (status = 404, description = "Car not found"),
        (status = 409, description = "Review already exists for this car")
    )
)]
pub async fn create_review(
    State(state): State<AppState>,
    user: CurrentUser,
    ValidatedJson(payload): ValidatedJson<ReviewCreateRequest>,
) -> AppResult<(StatusCode, Json<ApiResponse<ReviewDetail>>)> {
    let review = state
        .reviews
        .create(NewReview {
            user_id: user.id,
            car_id: payload.car_id,
            title: payload.title,
            content: payload.content,
            image_url: payload.image_url,
        })
        .await?;

    Ok(ApiResponse::created(review))
}

/// Update the caller's own review
#[utoipa::path(
    patch,
    path = "/api/reviews/{id}",
    tag = "Reviews",
    security(("bearer_auth" = [])),
    params(("id" = i64, Path, description = "Review ID")),
    request_body = ReviewUpdateRequest,
    responses(
        (status = 200, description = "Review updated", body = ReviewDetail),
        (status = 401, description = "Missing or invalid token"),
        (status = 404, description = "Review not found")
    )
)]
pub async fn update_review(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<i64>,
    ValidatedJson(payload): ValidatedJson<ReviewUpdateRequest>,
) -> AppResult<(StatusCode, Json<ApiResponse<ReviewDetail>>)> {
    let patch = ReviewPatch {
        title: payload.title,
        content: payload.content,
        image_url: payload.image_url,
    };

    let review = state.reviews.update(user.id, id, patch).await?;

    Ok(ApiResponse::ok(review))
}

/// Delete the caller's own review
#[utoipa::path(
    delete,
    path = "/api/reviews/{id}",
    tag = "Reviews",
    security(("bearer_auth" = [])),
    params(("id" = i64, Path, description = "Review ID")),
    responses(
        (status = 200, description = "Review deleted"),
        (status = 401, description = "Missing or invalid token"),
        (status = 404, description = "Review not found")
    )
)]
pub async fn delete_review(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<i64>,
) -> AppResult<(StatusCode, Json<ApiResponse<MessageResponse>>)> {
    state.reviews.delete(user.id, id).await?;

    Ok(ApiResponse::ok(MessageResponse::new("review deleted")))
}
