//! Comment handlers. All mutations are owner-scoped.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
    routing::{patch, post},
    Router,
};
use serde::Deserialize;
use utoipa::ToSchema;
use validator::Validate;

use crate::api::extractors::ValidatedJson;
use crate::api::middleware::CurrentUser;
use crate::api::AppState;
use crate::domain::{CommentView, NewComment};
use crate::errors::AppResult;
use crate::types::{ApiResponse, MessageResponse};

/// Comment creation request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CommentCreateRequest {
    pub review_id: i64,
    #[validate(length(min = 1, message = "Content is required"))]
    pub content: String,
}

/// Comment update request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CommentUpdateRequest {
    #[validate(length(min = 1, message = "Content is required"))]
    pub content: String,
}

/// Create comment routes
pub fn comment_routes() -> Router<AppState> {
    Router::new()
        .route("/comments", post(create_comment))
        .route(
            "/comments/:id",
            patch(update_comment).delete(delete_comment),
        )
}

/// Comment on a review
#[utoipa::path(
    post,
    path = "/api/comments",
    tag = "Comments",
    security(("bearer_auth" = [])),
    request_body = CommentCreateRequest,
    responses(
        (status = 201, description = "Comment created", body = CommentView),
        (status = 401, description = "Missing or invalid token"),
        (status = 404, description = "Review not found")
    )
)]
pub async fn create_comment(
    State(state): State<AppState>,
    user: CurrentUser,
    ValidatedJson(payload): ValidatedJson<CommentCreateRequest>,
) -> AppResult<(StatusCode, Json<ApiResponse<CommentView>>)> {
    let comment = state
        .comments
        .create(NewComment {
            user_id: user.id,
            review_id: payload.review_id,
            content: payload.content,
        })
        .await?;

    Ok(ApiResponse::created(comment))
}

/// Update the caller's own comment
#[utoipa::path(
    patch,
    path = "/api/comments/{id}",
    tag = "Comments",
    security(("bearer_auth" = [])),
    params(("id" = i64, Path, description = "Comment ID")),
    request_body = CommentUpdateRequest,
    responses(
        (status = 200, description = "Comment updated", body = CommentView),
        (status = 401, description = "Missing or invalid token"),
        (status = 404, description = "Comment not found")
    )
)]
pub async fn update_comment(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<i64>,
    ValidatedJson(payload): ValidatedJson<CommentUpdateRequest>,
) -> AppResult<(StatusCode, Json<ApiResponse<CommentView>>)> {
    let comment = state.comments.update(user.id, id, payload.content).await?;

    Ok(ApiResponse::ok(comment))
}

/// Delete the caller's own comment
#[utoipa::path(
    delete,
    path = "/api/comments/{id}",
    tag = "Comments",
    security(("bearer_auth" = [])),
    params(("id" = i64, Path, description = "Comment ID")),
    responses(
        (status = 200, description = "Comment deleted"),
        (status = 401, description = "Missing or invalid token"),
        (status = 404, description = "Comment not found")
    )
)]
pub async fn delete_comment(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<i64>,
) -> AppResult<(StatusCode, Json<ApiResponse<MessageResponse>>)> {
    state.comments.delete(user.id, id).await?;

    Ok(ApiResponse::ok(MessageResponse::new("comment deleted")))
}
