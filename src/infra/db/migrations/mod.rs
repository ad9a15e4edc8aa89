//! Database migrations.
//!
//! Each migration is a separate module following SeaORM conventions.
//! Migration names follow the pattern: m{YYYYMMDD}_{NNNNNN}_{description}

use sea_orm_migration::prelude::*;

mod m20250301_000001_create_users_and_profiles;
mod m20250301_000002_create_car_catalog;
mod m20250301_000003_create_reviews_and_comments;
mod m20250301_000004_create_favorites;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250301_000001_create_users_and_profiles::Migration),
            Box::new(m20250301_000002_create_car_catalog::Migration),
            Box::new(m20250301_000003_create_reviews_and_comments::Migration),
            Box::new(m20250301_000004_create_favorites::Migration),
        ]
    }
}
