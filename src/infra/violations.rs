//! Storage constraint-violation translation.
//!
//! Uniqueness and referential integrity are enforced by the database, not by
//! check-then-act lookups. Every repository funnels write errors through this
//! single adapter to turn driver-level constraint violations into domain
//! errors; anything else keeps flowing as `AppError::Database`.

use sea_orm::{DbErr, SqlErr};

use crate::errors::{AppError, AppResult};

/// Constraint violations the domain layer reacts to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Violation {
    /// Unique constraint violation (duplicate key)
    Unique,
    /// Foreign key constraint violation (missing parent or restricted child)
    ForeignKey,
}

/// Classify a database error as a constraint violation, if it is one.
pub fn classify(err: &DbErr) -> Option<Violation> {
    match err.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(_)) => Some(Violation::Unique),
        Some(SqlErr::ForeignKeyConstraintViolation(_)) => Some(Violation::ForeignKey),
        _ => None,
    }
}

/// Extension for database results: map constraint violations to
/// resource-specific domain errors at the call site.
pub trait DbResultExt<T> {
    /// `map` returns `Some(domain error)` for violations the caller expects;
    /// unexpected violations and all other errors become `AppError::Database`.
    fn violation<F>(self, map: F) -> AppResult<T>
    where
        F: FnOnce(Violation) -> Option<AppError>;
}

impl<T> DbResultExt<T> for Result<T, DbErr> {
    fn violation<F>(self, map: F) -> AppResult<T>
    where
        F: FnOnce(Violation) -> Option<AppError>,
    {
        self.map_err(|err| match classify(&err).and_then(map) {
            Some(domain_err) => domain_err,
            None => AppError::Database(err),
        })
    }
}
