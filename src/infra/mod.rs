//! Infrastructure layer - External systems integration
//!
//! This module handles all external system concerns:
//! - Database connection and migrations
//! - Repositories over the shared pool
//! - Unit of Work for transaction management
//! - Constraint-violation translation

pub mod db;
pub mod repositories;
pub mod unit_of_work;
pub mod violations;

pub use db::{Database, Migrator};
pub use repositories::{
    BrandRepository, CarRepository, CommentRepository, FavoriteRepository, ReviewRepository,
    UserRepository,
};
pub use unit_of_work::{Persistence, TransactionContext, UnitOfWork};
pub use violations::{DbResultExt, Violation};
