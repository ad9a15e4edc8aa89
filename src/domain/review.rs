//! Review domain types.

use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;

/// Data for a new review row
#[derive(Debug, Clone)]
pub struct NewReview {
    pub user_id: i64,
    pub car_id: i64,
    pub title: String,
    pub content: String,
    pub image_url: String,
}

/// Sparse patch for a review; absent fields stay unchanged
#[derive(Debug, Clone, Default)]
pub struct ReviewPatch {
    pub title: Option<String>,
    pub content: Option<String>,
    pub image_url: Option<String>,
}

/// Author summary embedded in review reads
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ReviewAuthor {
    pub id: i64,
    pub username: String,
}

/// Reviewed car summary embedded in review reads
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ReviewCar {
    pub id: i64,
    pub model: String,
}

/// Review joined with its author and car
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ReviewDetail {
    pub id: i64,
    pub title: String,
    pub content: String,
    pub image_url: String,
    pub user: ReviewAuthor,
    pub car: ReviewCar,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// List filters for reviews
#[derive(Debug, Clone, Default)]
pub struct ReviewFilter {
    pub car_id: Option<i64>,
    /// Full-text search against review titles
    pub search: Option<String>,
}
