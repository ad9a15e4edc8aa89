//! Brand domain entity.

use serde::Serialize;
use utoipa::ToSchema;

/// Car manufacturer brand
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct Brand {
    pub id: i64,
    pub name: String,
}
