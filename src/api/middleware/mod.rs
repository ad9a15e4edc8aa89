//! API middleware - access control primitives.

pub mod auth;

pub use auth::{require_admin, CurrentUser};
