//! User profile handlers.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
    routing::{delete, get, patch},
    Router,
};
use serde::Deserialize;
use utoipa::ToSchema;
use validator::Validate;

use crate::api::extractors::ValidatedJson;
use crate::api::middleware::CurrentUser;
use crate::api::AppState;
use crate::domain::{FavoriteView, Gender, ProfileUpdate, ProfileView, UserSummary};
use crate::errors::AppResult;
use crate::types::{ApiResponse, MessageResponse};

/// Password change request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdatePasswordRequest {
    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub password: String,
}

/// Sparse profile update; absent fields leave stored values unchanged
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateProfileRequest {
    #[validate(length(min = 3, max = 20, message = "Username must be 3-20 characters"))]
    pub username: Option<String>,
    #[validate(email(message = "Invalid email format"))]
    pub email: Option<String>,
    #[validate(length(min = 3, max = 100, message = "Full name must be 3-100 characters"))]
    pub full_name: Option<String>,
    #[validate(length(max = 500, message = "Bio must be at most 500 characters"))]
    pub bio: Option<String>,
    #[validate(range(min = 0, message = "Age must not be negative"))]
    pub age: Option<i16>,
    pub gender: Option<Gender>,
}

impl From<UpdateProfileRequest> for ProfileUpdate {
    fn from(req: UpdateProfileRequest) -> Self {
        ProfileUpdate {
            username: req.username,
            email: req.email,
            full_name: req.full_name,
            bio: req.bio,
            age: req.age,
            gender: req.gender,
        }
    }
}

/// Create user routes
pub fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/users/profile/:id", get(get_profile))
        .route("/users/current", get(current_user))
        .route("/users/favorites", get(list_favorites))
        .route("/users/password", patch(update_password))
        .route("/users/profile", patch(update_profile))
        .route("/users", delete(delete_account))
}

/// Public profile read
#[utoipa::path(
    get,
    path = "/api/users/profile/{id}",
    tag = "Users",
    params(("id" = i64, Path, description = "User ID")),
    responses(
        (status = 200, description = "User profile", body = ProfileView),
        (status = 404, description = "User not found")
    )
)]
pub async fn get_profile(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<(StatusCode, Json<ApiResponse<ProfileView>>)> {
    let profile = state.users.profile(id).await?;

    Ok(ApiResponse::ok(profile))
}

/// Identity summary for the authenticated user
#[utoipa::path(
    get,
    path = "/api/users/current",
    tag = "Users",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Current user", body = UserSummary),
        (status = 401, description = "Missing or invalid token")
    )
)]
pub async fn current_user(
    State(state): State<AppState>,
    user: CurrentUser,
) -> AppResult<(StatusCode, Json<ApiResponse<UserSummary>>)> {
    let summary = state.users.current_user(user.id).await?;

    Ok(ApiResponse::ok(summary))
}

/// Favorites of the authenticated user
#[utoipa::path(
    get,
    path = "/api/users/favorites",
    tag = "Users",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Favorited cars", body = [FavoriteView]),
        (status = 401, description = "Missing or invalid token")
    )
)]
pub async fn list_favorites(
    State(state): State<AppState>,
    user: CurrentUser,
) -> AppResult<(StatusCode, Json<ApiResponse<Vec<FavoriteView>>>)> {
    let favorites = state.favorites.list(user.id).await?;

    Ok(ApiResponse::ok(favorites))
}

/// Change the caller's password
#[utoipa::path(
    patch,
    path = "/api/users/password",
    tag = "Users",
    security(("bearer_auth" = [])),
    request_body = UpdatePasswordRequest,
    responses(
        (status = 200, description = "Password updated"),
        (status = 401, description = "Missing or invalid token")
    )
)]
pub async fn update_password(
    State(state): State<AppState>,
    user: CurrentUser,
    ValidatedJson(payload): ValidatedJson<UpdatePasswordRequest>,
) -> AppResult<(StatusCode, Json<ApiResponse<MessageResponse>>)> {
    state.users.update_password(user.id, payload.password).await?;

    Ok(ApiResponse::ok(MessageResponse::new("password updated")))
}

/// Sparse update of the caller's profile
#[utoipa::path(
    patch,
    path = "/api/users/profile",
    tag = "Users",
    security(("bearer_auth" = [])),
    request_body = UpdateProfileRequest,
    responses(
        (status = 200, description = "Updated profile", body = ProfileView),
        (status = 401, description = "Missing or invalid token"),
        (status = 409, description = "Username or email already exists")
    )
)]
pub async fn update_profile(
    State(state): State<AppState>,
    user: CurrentUser,
    ValidatedJson(payload): ValidatedJson<UpdateProfileRequest>,
) -> AppResult<(StatusCode, Json<ApiResponse<ProfileView>>)> {
    let profile = state
        .users
        .update_profile(user.id, payload.into())
        .await?;

    Ok(ApiResponse::ok(profile))
}

/// Delete the caller's account and profile
#[utoipa::path(
    delete,
    path = "/api/users",
    tag = "Users",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Account deleted"),
        (status = 401, description = "Missing or invalid token")
    )
)]
pub async fn delete_account(
    State(state): State<AppState>,
    user: CurrentUser,
) -> AppResult<(StatusCode, Json<ApiResponse<MessageResponse>>)> {
    state.users.delete_account(user.id).await?;

    Ok(ApiResponse::ok(MessageResponse::new("account deleted")))
}
