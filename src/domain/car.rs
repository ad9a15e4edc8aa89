//! Car and car-specification domain types.
//!
//! A car and its specification form one unit: they are created, patched and
//! deleted together, never independently.

use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;

/// Data for a new car row
#[derive(Debug, Clone)]
pub struct NewCar {
    pub brand_id: i64,
    pub model: String,
    pub year: i16,
    pub image_url: String,
}

/// Sparse patch for the car row; absent fields stay unchanged
#[derive(Debug, Clone, Default)]
pub struct CarPatch {
    pub brand_id: Option<i64>,
    pub model: Option<String>,
    pub year: Option<i16>,
    pub image_url: Option<String>,
}

/// Data for a new car_specifications row
#[derive(Debug, Clone)]
pub struct NewSpecification {
    pub width: i16,
    pub height: i16,
    pub length: i16,
    pub engine: String,
    pub torque: i16,
    pub transmission: String,
    pub acceleration: f32,
    pub horse_power: i16,
    pub braking_front: String,
    pub braking_rear: String,
    pub fuel: String,
}

/// Sparse patch for the specification row
#[derive(Debug, Clone, Default)]
pub struct SpecificationPatch {
    pub width: Option<i16>,
    pub height: Option<i16>,
    pub length: Option<i16>,
    pub engine: Option<String>,
    pub torque: Option<i16>,
    pub transmission: Option<String>,
    pub acceleration: Option<f32>,
    pub horse_power: Option<i16>,
    pub braking_front: Option<String>,
    pub braking_rear: Option<String>,
    pub fuel: Option<String>,
}

impl SpecificationPatch {
    pub fn is_empty(&self) -> bool {
        self.width.is_none()
            && self.height.is_none()
            && self.length.is_none()
            && self.engine.is_none()
            && self.torque.is_none()
            && self.transmission.is_none()
            && self.acceleration.is_none()
            && self.horse_power.is_none()
            && self.braking_front.is_none()
            && self.braking_rear.is_none()
            && self.fuel.is_none()
    }
}

/// Specification as returned to clients
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct SpecificationView {
    pub width: i16,
    pub height: i16,
    pub length: i16,
    pub engine: String,
    pub torque: i16,
    pub transmission: String,
    pub acceleration: f32,
    pub horse_power: i16,
    pub braking_front: String,
    pub braking_rear: String,
    pub fuel: String,
}

/// Car list entry, joined with its brand name
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct CarSummary {
    pub id: i64,
    pub brand: String,
    pub model: String,
    pub year: i16,
    pub image_url: String,
}

/// Full car view: car row, brand name and specification
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct CarDetail {
    pub id: i64,
    pub brand_id: i64,
    pub brand: String,
    pub model: String,
    pub year: i16,
    pub image_url: String,
    pub specification: SpecificationView,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// List filters for the car catalog
#[derive(Debug, Clone, Default)]
pub struct CarFilter {
    pub brand_id: Option<i64>,
    /// Substring match against the model column
    pub model: Option<String>,
    pub year_from: Option<i16>,
    pub year_to: Option<i16>,
}
