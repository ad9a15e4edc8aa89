//! Migration: brands, cars and car_specifications tables.
//!
//! Brand deletion is restricted while cars reference it; the specification
//! row goes with its car. The trigram index backs substring search on the
//! model column.

use sea_orm::ConnectionTrait;
use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Brands::Table)
                    .col(
                        ColumnDef::new(Brands::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Brands::Name)
                            .string_len(50)
                            .not_null()
                            .unique_key(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Cars::Table)
                    .col(
                        ColumnDef::new(Cars::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Cars::BrandId).big_integer().not_null())
                    .col(ColumnDef::new(Cars::Model).string_len(50).not_null())
                    .col(ColumnDef::new(Cars::Year).small_integer().not_null())
                    .col(ColumnDef::new(Cars::ImageUrl).string_len(255).not_null())
                    .col(
                        ColumnDef::new(Cars::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Cars::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_cars_brand")
                            .from(Cars::Table, Cars::BrandId)
                            .to(Brands::Table, Brands::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(CarSpecifications::Table)
                    .col(
                        ColumnDef::new(CarSpecifications::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(CarSpecifications::CarId)
                            .big_integer()
                            .not_null()
                            .unique_key(),
                    )
                    .col(
                        ColumnDef::new(CarSpecifications::Width)
                            .small_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(CarSpecifications::Height)
                            .small_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(CarSpecifications::Length)
                            .small_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(CarSpecifications::Engine)
                            .string_len(200)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(CarSpecifications::Torque)
                            .small_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(CarSpecifications::Transmission)
                            .string_len(50)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(CarSpecifications::Acceleration)
                            .float()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(CarSpecifications::HorsePower)
                            .small_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(CarSpecifications::BrakingFront)
                            .string_len(50)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(CarSpecifications::BrakingRear)
                            .string_len(50)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(CarSpecifications::Fuel)
                            .string_len(50)
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_car_specifications_car")
                            .from(CarSpecifications::Table, CarSpecifications::CarId)
                            .to(Cars::Table, Cars::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Trigram index for substring search on the model column
        let db = manager.get_connection();
        db.execute_unprepared("CREATE EXTENSION IF NOT EXISTS pg_trgm")
            .await?;
        db.execute_unprepared(
            "CREATE INDEX idx_cars_model_trgm ON cars USING GIN (model gin_trgm_ops)",
        )
        .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(CarSpecifications::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Cars::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Brands::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Brands {
    Table,
    Id,
    Name,
}

#[derive(Iden)]
enum Cars {
    Table,
    Id,
    BrandId,
    Model,
    Year,
    ImageUrl,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum CarSpecifications {
    Table,
    Id,
    CarId,
    Width,
    Height,
    Length,
    Engine,
    Torque,
    Transmission,
    Acceleration,
    HorsePower,
    BrakingFront,
    BrakingRear,
    Fuel,
}
