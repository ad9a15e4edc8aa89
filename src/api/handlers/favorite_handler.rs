//! Favorite handlers.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
    routing::post,
    Router,
};

use crate::api::middleware::CurrentUser;
use crate::api::AppState;
use crate::errors::AppResult;
use crate::types::{ApiResponse, MessageResponse};

/// Create favorite routes
pub fn favorite_routes() -> Router<AppState> {
    Router::new().route(
        "/favorites/:car_id",
        post(add_favorite).delete(remove_favorite),
    )
}

/// Favorite a car
#[utoipa::path(
    post,
    path = "/api/favorites/{car_id}",
    tag = "Favorites",
    security(("bearer_auth" = [])),
    params(("car_id" = i64, Path, description = "Car ID")),
    responses(
        (status = 201, description = "Car favorited"),
        (status = 401, description = "Missing or invalid token"),
        (status = 404, description = "Car not found"),
        (status = 409, description = "Car is already favorited")
    )
)]
pub async fn add_favorite(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(car_id): Path<i64>,
) -> AppResult<(StatusCode, Json<ApiResponse<MessageResponse>>)> {
    state.favorites.add(user.id, car_id).await?;

    Ok(ApiResponse::created(MessageResponse::new("car favorited")))
}

/// Remove a favorite
#[utoipa::path(
    delete,
    path = "/api/favorites/{car_id}",
    tag = "Favorites",
    security(("bearer_auth" = [])),
    params(("car_id" = i64, Path, description = "Car ID")),
    responses(
        (status = 200, description = "Favorite removed"),
        (status = 401, description = "Missing or invalid token"),
        (status = 404, description = "Favorite not found")
    )
)]
pub async fn remove_favorite(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(car_id): Path<i64>,
) -> AppResult<(StatusCode, Json<ApiResponse<MessageResponse>>)> {
    state.favorites.remove(user.id, car_id).await?;

    Ok(ApiResponse::ok(MessageResponse::new("car unfavorited")))
}
