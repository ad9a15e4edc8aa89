//! Car service - catalog management.
//!
//! A car and its specification are one unit: create, update and delete all
//! run inside a single transaction, and the materialized car is re-read
//! before commit so partial rows can never be observed.

use async_trait::async_trait;
use std::sync::Arc;

use crate::domain::{CarDetail, CarFilter, CarPatch, CarSummary, NewCar, NewSpecification, SpecificationPatch};
use crate::errors::{AppResult, OptionExt};
use crate::infra::UnitOfWork;
use crate::types::PaginationParams;

/// Car service trait for dependency injection.
#[async_trait]
pub trait CarService: Send + Sync {
    /// Create a car with its specification as one unit
    async fn create(&self, car: NewCar, spec: NewSpecification) -> AppResult<CarDetail>;

    /// Sparse patch across the car and specification rows as one unit
    async fn update(&self, id: i64, car: CarPatch, spec: SpecificationPatch)
        -> AppResult<CarDetail>;

    /// Delete a car together with its specification
    async fn delete(&self, id: i64) -> AppResult<()>;

    /// Filtered, paginated catalog listing; returns the page and total count
    async fn list(
        &self,
        filter: CarFilter,
        pagination: PaginationParams,
    ) -> AppResult<(Vec<CarSummary>, u64)>;

    /// Full car view
    async fn get(&self, id: i64) -> AppResult<CarDetail>;
}

/// Concrete implementation of CarService using Unit of Work.
pub struct CarManager<U: UnitOfWork> {
    uow: Arc<U>,
}

impl<U: UnitOfWork> CarManager<U> {
    pub fn new(uow: Arc<U>) -> Self {
        Self { uow }
    }
}

#[async_trait]
impl<U: UnitOfWork> CarService for CarManager<U> {
    async fn create(&self, car: NewCar, spec: NewSpecification) -> AppResult<CarDetail> {
        let detail = self
            .uow
            .transaction(move |ctx| {
                Box::pin(async move {
                    let car_id = ctx.cars().insert(car).await?;
                    ctx.specifications().insert(car_id, spec).await?;
                    ctx.cars().detail(car_id).await
                })
            })
            .await?;

        tracing::info!(car_id = detail.id, "car created");

        Ok(detail)
    }

    async fn update(
        &self,
        id: i64,
        car: CarPatch,
        spec: SpecificationPatch,
    ) -> AppResult<CarDetail> {
        let detail = self
            .uow
            .transaction(move |ctx| {
                Box::pin(async move {
                    ctx.cars().patch(id, car).await?;
                    ctx.specifications().patch_by_car(id, spec).await?;
                    ctx.cars().detail(id).await
                })
            })
            .await?;

        tracing::info!(car_id = id, "car updated");

        Ok(detail)
    }

    async fn delete(&self, id: i64) -> AppResult<()> {
        self.uow
            .transaction(move |ctx| Box::pin(async move { ctx.cars().delete(id).await }))
            .await?;

        tracing::info!(car_id = id, "car deleted");

        Ok(())
    }

    async fn list(
        &self,
        filter: CarFilter,
        pagination: PaginationParams,
    ) -> AppResult<(Vec<CarSummary>, u64)> {
        self.uow.cars().list(filter, pagination).await
    }

    async fn get(&self, id: i64) -> AppResult<CarDetail> {
        self.uow.cars().detail(id).await?.ok_or_not_found("car")
    }
}
