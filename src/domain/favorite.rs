//! Favorite domain types.

use serde::Serialize;
use utoipa::ToSchema;

/// Denormalized favorite entry: the car joined through its brand
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct FavoriteView {
    pub car_id: i64,
    pub brand: String,
    pub model: String,
    pub image_url: String,
}
