//! Car catalog handlers. Reads are public; mutations are admin-only.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Json,
    routing::{get, patch},
    Router,
};
use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::api::extractors::ValidatedJson;
use crate::api::middleware::{require_admin, CurrentUser};
use crate::api::AppState;
use crate::domain::{
    CarDetail, CarFilter, CarPatch, CarSummary, NewCar, NewSpecification, SpecificationPatch,
};
use crate::errors::AppResult;
use crate::types::{ApiResponse, MessageResponse, PageMeta, PaginationParams};

/// Specification payload for car creation
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct SpecificationRequest {
    #[validate(range(min = 1, message = "Width must be positive"))]
    pub width: i16,
    #[validate(range(min = 1, message = "Height must be positive"))]
    pub height: i16,
    #[validate(range(min = 1, message = "Length must be positive"))]
    pub length: i16,
    #[validate(length(min = 1, max = 200, message = "Engine must be 1-200 characters"))]
    pub engine: String,
    #[validate(range(min = 1, message = "Torque must be positive"))]
    pub torque: i16,
    #[validate(length(min = 1, max = 50, message = "Transmission must be 1-50 characters"))]
    pub transmission: String,
    pub acceleration: f32,
    #[validate(range(min = 1, message = "Horse power must be positive"))]
    pub horse_power: i16,
    #[validate(length(min = 1, max = 50))]
    pub braking_front: String,
    #[validate(length(min = 1, max = 50))]
    pub braking_rear: String,
    #[validate(length(min = 1, max = 50))]
    pub fuel: String,
}

impl From<SpecificationRequest> for NewSpecification {
    fn from(req: SpecificationRequest) -> Self {
        NewSpecification {
            width: req.width,
            height: req.height,
            length: req.length,
            engine: req.engine,
            torque: req.torque,
            transmission: req.transmission,
            acceleration: req.acceleration,
            horse_power: req.horse_power,
            braking_front: req.braking_front,
            braking_rear: req.braking_rear,
            fuel: req.fuel,
        }
    }
}

/// Car creation request: the car and its specification as one unit
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CarCreateRequest {
    pub brand_id: i64,
    #[validate(length(min = 1, max = 50, message = "Model must be 1-50 characters"))]
    #[schema(example = "Impreza")]
    pub model: String,
    #[validate(range(min = 1878, message = "Year must be 1878 or later"))]
    #[schema(example = 2004)]
    pub year: i16,
    #[validate(url(message = "Image must be a valid URL"))]
    pub image_url: String,
    #[validate(nested)]
    pub specification: SpecificationRequest,
}

/// Sparse specification patch
#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
pub struct SpecificationPatchRequest {
    #[validate(range(min = 1, message = "Width must be positive"))]
    pub width: Option<i16>,
    #[validate(range(min = 1, message = "Height must be positive"))]
    pub height: Option<i16>,
    #[validate(range(min = 1, message = "Length must be positive"))]
    pub length: Option<i16>,
    #[validate(length(min = 1, max = 200))]
    pub engine: Option<String>,
    #[validate(range(min = 1, message = "Torque must be positive"))]
    pub torque: Option<i16>,
    #[validate(length(min = 1, max = 50))]
    pub transmission: Option<String>,
    pub acceleration: Option<f32>,
    #[validate(range(min = 1, message = "Horse power must be positive"))]
    pub horse_power: Option<i16>,
    #[validate(length(min = 1, max = 50))]
    pub braking_front: Option<String>,
    #[validate(length(min = 1, max = 50))]
    pub braking_rear: Option<String>,
    #[validate(length(min = 1, max = 50))]
    pub fuel: Option<String>,
}

impl From<SpecificationPatchRequest> for SpecificationPatch {
    fn from(req: SpecificationPatchRequest) -> Self {
        SpecificationPatch {
            width: req.width,
            height: req.height,
            length: req.length,
            engine: req.engine,
            torque: req.torque,
            transmission: req.transmission,
            acceleration: req.acceleration,
            horse_power: req.horse_power,
            braking_front: req.braking_front,
            braking_rear: req.braking_rear,
            fuel: req.fuel,
        }
    }
}

/// Sparse car update; absent fields leave stored values unchanged
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CarUpdateRequest {
    pub brand_id: Option<i64>,
    #[validate(length(min = 1, max = 50, message = "Model must be 1-50 characters"))]
    pub model: Option<String>,
    #[validate(range(min = 1878, message = "Year must be 1878 or later"))]
    pub year: Option<i16>,
    #[validate(url(message = "Image must be a valid URL"))]
    pub image_url: Option<String>,
    #[validate(nested)]
    pub specification: Option<SpecificationPatchRequest>,
}

/// Catalog list filters
#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct CarListQuery {
    /// Restrict to one brand
    pub brand_id: Option<i64>,
    /// Substring match against the model
    pub model: Option<String>,
    pub year_from: Option<i16>,
    pub year_to: Option<i16>,
}

impl From<CarListQuery> for CarFilter {
    fn from(query: CarListQuery) -> Self {
        CarFilter {
            brand_id: query.brand_id,
            model: query.model,
            year_from: query.year_from,
            year_to: query.year_to,
        }
    }
}

/// Create car routes
pub fn car_routes() -> Router<AppState> {
    Router::new()
        .route("/cars", get(list_cars).post(create_car))
        .route(
            "/cars/:id",
            get(get_car).patch(update_car).delete(delete_car),
        )
}

/// List cars with filters and pagination
#[utoipa::path(
    get,
    path = "/api/cars",
    tag = "Cars",
    params(CarListQuery, PaginationParams),
    responses(
        (status = 200, description = "Car catalog page", body = [CarSummary])
    )
)]
pub async fn list_cars(
    State(state): State<AppState>,
    Query(filter): Query<CarListQuery>,
    Query(pagination): Query<PaginationParams>,
) -> AppResult<(StatusCode, Json<ApiResponse<Vec<CarSummary>>>)> {
    let (cars, total) = state.cars.list(filter.into(), pagination.clone()).await?;
    let meta = PageMeta::new(&pagination, total);

    Ok(ApiResponse::paginated(cars, meta))
}

/// Single car with brand and specification
#[utoipa::path(
    get,
    path = "/api/cars/{id}",
    tag = "Cars",
    params(("id" = i64, Path, description = "Car ID")),
    responses(
        (status = 200, description = "Car detail", body = CarDetail),
        (status = 404, description = "Car not found")
    )
)]
pub async fn get_car(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<(StatusCode, Json<ApiResponse<CarDetail>>)> {
    let car = state.cars.get(id).await?;

    Ok(ApiResponse::ok(car))
}

/// Create a car with its specification (admin only)
#[utoipa::path(
    post,
    path = "/api/cars",
    tag = "Cars",
    security(("bearer_auth" = [])),
    request_body = CarCreateRequest,
    responses(
        (status = 201, description = "Car created", body = CarDetail),
        (status = 403, description = "Admin role required"),
        (status = 404, description = "Brand not found")
    )
)]
pub async fn create_car(
    State(state): State<AppState>,
    user: CurrentUser,
    ValidatedJson(payload): ValidatedJson<CarCreateRequest>,
) -> AppResult<(StatusCode, Json<ApiResponse<CarDetail>>)> {
    require_admin(&user)?;

    let new_car = NewCar {
        brand_id: payload.brand_id,
        model: payload.model,
        year: payload.year,
        image_url: payload.image_url,
    };

    let car = state
        .cars
        .create(new_car, payload.specification.into())
        .await?;

    Ok(ApiResponse::created(car))
}

/// Sparse update of a car and its specification (admin only)
#[utoipa::path(
    patch,
    path = "/api/cars/{id}",
    tag = "Cars",
    security(("bearer_auth" = [])),
    params(("id" = i64, Path, description = "Car ID")),
    request_body = CarUpdateRequest,
    responses(
        (status = 200, description = "Car updated", body = CarDetail),
        (status = 403, description = "Admin role required"),
        (status = 404, description = "Car or brand not found")
    )
)]
pub async fn update_car(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<i64>,
    ValidatedJson(payload): ValidatedJson<CarUpdateRequest>,
) -> AppResult<(StatusCode, Json<ApiResponse<CarDetail>>)> {
    require_admin(&user)?;

    let car_patch = CarPatch {
        brand_id: payload.brand_id,
        model: payload.model,
        year: payload.year,
        image_url: payload.image_url,
    };
    let spec_patch = payload
        .specification
        .map(SpecificationPatch::from)
        .unwrap_or_default();

    let car = state.cars.update(id, car_patch, spec_patch).await?;

    Ok(ApiResponse::ok(car))
}

/// Delete a car and its specification (admin only)
#[utoipa::path(
    delete,
    path = "/api/cars/{id}",
    tag = "Cars",
    security(("bearer_auth" = [])),
    params(("id" = i64, Path, description = "Car ID")),
    responses(
        (status = 200, description = "Car deleted"),
        (status = 403, description = "Admin role required"),
        (status = 404, description = "Car not found"),
        (status = 409, description = "Car still has reviews")
    )
)]
pub async fn delete_car(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<i64>,
) -> AppResult<(StatusCode, Json<ApiResponse<MessageResponse>>)> {
    require_admin(&user)?;

    state.cars.delete(id).await?;

    Ok(ApiResponse::ok(MessageResponse::new("car deleted")))
}
