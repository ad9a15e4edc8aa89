//! Brand handlers. Listing is public; mutations are admin-only.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
    routing::{get, patch},
    Router,
};
use serde::Deserialize;
use utoipa::ToSchema;
use validator::Validate;

use crate::api::extractors::ValidatedJson;
use crate::api::middleware::{require_admin, CurrentUser};
use crate::api::AppState;
use crate::domain::Brand;
use crate::errors::AppResult;
use crate::types::{ApiResponse, MessageResponse};

/// Brand create/update request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct BrandRequest {
    #[validate(length(min = 1, max = 50, message = "Name must be 1-50 characters"))]
    #[schema(example = "Subaru")]
    pub name: String,
}

/// Create brand routes
pub fn brand_routes() -> Router<AppState> {
    Router::new()
        .route("/brands", get(list_brands).post(create_brand))
        .route("/brands/:id", patch(update_brand).delete(delete_brand))
}

/// List all brands
#[utoipa::path(
    get,
    path = "/api/brands",
    tag = "Brands",
    responses(
        (status = 200, description = "All brands", body = [Brand])
    )
)]
pub async fn list_brands(
    State(state): State<AppState>,
) -> AppResult<(StatusCode, Json<ApiResponse<Vec<Brand>>>)> {
    let brands = state.brands.list().await?;

    Ok(ApiResponse::ok(brands))
}

/// Create a brand (admin only)
#[utoipa::path(
    post,
    path = "/api/brands",
    tag = "Brands",
    security(("bearer_auth" = [])),
    request_body = BrandRequest,
    responses(
        (status = 201, description = "Brand created", body = Brand),
        (status = 403, description = "Admin role required"),
        (status = 409, description = "Brand name already exists")
    )
)]
pub async fn create_brand(
    State(state): State<AppState>,
    user: CurrentUser,
    ValidatedJson(payload): ValidatedJson<BrandRequest>,
) -> AppResult<(StatusCode, Json<ApiResponse<Brand>>)> {
    require_admin(&user)?;

    let brand = state.brands.create(payload.name).await?;

    Ok(ApiResponse::created(brand))
}

/// Rename a brand (admin only)
#[utoipa::path(
    patch,
    path = "/api/brands/{id}",
    tag = "Brands",
    security(("bearer_auth" = [])),
    params(("id" = i64, Path, description = "Brand ID")),
    request_body = BrandRequest,
    responses(
        (status = 200, description = "Brand updated", body = Brand),
        (status = 403, description = "Admin role required"),
        (status = 404, description = "Brand not found"),
        (status = 409, description = "Brand name already exists")
    )
)]
pub async fn update_brand(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<i64>,
    ValidatedJson(payload): ValidatedJson<BrandRequest>,
) -> AppResult<(StatusCode, Json<ApiResponse<Brand>>)> {
    require_admin(&user)?;

    let brand = state.brands.update(id, payload.name).await?;

    Ok(ApiResponse::ok(brand))
}

/// Delete a brand (admin only)
#[utoipa::path(
    delete,
    path = "/api/brands/{id}",
    tag = "Brands",
    security(("bearer_auth" = [])),
    params(("id" = i64, Path, description = "Brand ID")),
    responses(
        (status = 200, description = "Brand deleted"),
        (status = 403, description = "Admin role required"),
        (status = 404, description = "Brand not found"),
        (status = 409, description = "Brand is still referenced by cars")
    )
)]
pub async fn delete_brand(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<i64>,
) -> AppResult<(StatusCode, Json<ApiResponse<MessageResponse>>)> {
    require_admin(&user)?;

    state.brands.delete(id).await?;

    Ok(ApiResponse::ok(MessageResponse::new("brand deleted")))
}
