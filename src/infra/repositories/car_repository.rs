//! Car repository: catalog reads over the shared pool.
//!
//! Car/specification writes are multi-row units and live on the transaction
//! context (see `unit_of_work`). The model filter relies on the trigram index
//! on `cars.model` for substring matching at scale.

use std::sync::Arc;

use async_trait::async_trait;
use sea_orm::sea_query::extension::postgres::PgExpr;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, FromQueryResult, JoinType,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, RelationTrait,
};

use super::entities::{brand, car, car_specification};
use crate::domain::{CarDetail, CarFilter, CarSummary};
use crate::errors::{AppError, AppResult};
use crate::types::PaginationParams;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Car repository trait for dependency injection.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait CarRepository: Send + Sync {
    /// List cars matching the filter, joined with brand names.
    /// Returns the page and the total row count.
    async fn list(
        &self,
        filter: CarFilter,
        pagination: PaginationParams,
    ) -> AppResult<(Vec<CarSummary>, u64)>;

    /// Full car view with brand and specification
    async fn detail(&self, id: i64) -> AppResult<Option<CarDetail>>;
}

/// Concrete implementation of CarRepository over the shared pool
pub struct CarStore {
    db: Arc<DatabaseConnection>,
}

impl CarStore {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl CarRepository for CarStore {
    async fn list(
        &self,
        filter: CarFilter,
        pagination: PaginationParams,
    ) -> AppResult<(Vec<CarSummary>, u64)> {
        let mut query = car::Entity::find()
            .select_only()
            .columns([
                car::Column::Id,
                car::Column::Model,
                car::Column::Year,
                car::Column::ImageUrl,
            ])
            .column_as(brand::Column::Name, "brand")
            .join(JoinType::InnerJoin, car::Relation::Brand.def())
            .order_by_asc(car::Column::Id);

        if let Some(brand_id) = filter.brand_id {
            query = query.filter(car::Column::BrandId.eq(brand_id));
        }
        if let Some(model) = &filter.model {
            query = query.filter(
                Expr::col((car::Entity, car::Column::Model)).ilike(format!("%{}%", model)),
            );
        }
        if let Some(year_from) = filter.year_from {
            query = query.filter(car::Column::Year.gte(year_from));
        }
        if let Some(year_to) = filter.year_to {
            query = query.filter(car::Column::Year.lte(year_to));
        }

        let paginator = query
            .into_model::<CarSummaryRow>()
            .paginate(&*self.db, pagination.limit());
        let total = paginator.num_items().await.map_err(AppError::from)?;
        let rows = paginator
            .fetch_page(pagination.page_index())
            .await
            .map_err(AppError::from)?;

        Ok((rows.into_iter().map(CarSummary::from).collect(), total))
    }

    async fn detail(&self, id: i64) -> AppResult<Option<CarDetail>> {
        select_car_detail(&*self.db, id).await
    }
}

#[derive(Debug, FromQueryResult)]
struct CarSummaryRow {
    id: i64,
    brand: String,
    model: String,
    year: i16,
    image_url: String,
}

impl From<CarSummaryRow> for CarSummary {
    fn from(row: CarSummaryRow) -> Self {
        CarSummary {
            id: row.id,
            brand: row.brand,
            model: row.model,
            year: row.year,
            image_url: row.image_url,
        }
    }
}

#[derive(Debug, FromQueryResult)]
struct CarRow {
    id: i64,
    brand_id: i64,
    brand: String,
    model: String,
    year: i16,
    image_url: String,
    created_at: chrono::DateTime<chrono::Utc>,
    updated_at: chrono::DateTime<chrono::Utc>,
}

/// Shared car-brand-specification read, usable on the pool and inside
/// transactions. A car without its specification row is an invariant
/// violation and surfaces as an internal error.
pub(crate) async fn select_car_detail<C: ConnectionTrait>(
    conn: &C,
    car_id: i64,
) -> AppResult<Option<CarDetail>> {
    let row = car::Entity::find_by_id(car_id)
        .select_only()
        .columns([
            car::Column::Id,
            car::Column::BrandId,
            car::Column::Model,
            car::Column::Year,
            car::Column::ImageUrl,
            car::Column::CreatedAt,
            car::Column::UpdatedAt,
        ])
        .column_as(brand::Column::Name, "brand")
        .join(JoinType::InnerJoin, car::Relation::Brand.def())
        .into_model::<CarRow>()
        .one(conn)
        .await
        .map_err(AppError::from)?;

    let Some(row) = row else {
        return Ok(None);
    };

    let spec = car_specification::Entity::find()
        .filter(car_specification::Column::CarId.eq(car_id))
        .one(conn)
        .await
        .map_err(AppError::from)?
        .ok_or_else(|| AppError::internal(format!("car {} has no specification row", car_id)))?;

    Ok(Some(CarDetail {
        id: row.id,
        brand_id: row.brand_id,
        brand: row.brand,
        model: row.model,
        year: row.year,
        image_url: row.image_url,
        specification: spec.into(),
        created_at: row.created_at,
        updated_at: row.updated_at,
    }))
}
