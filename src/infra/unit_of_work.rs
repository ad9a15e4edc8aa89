//! Unit of Work - transaction manager for multi-row writes.
//!
//! Guarantees that units such as user+profile creation or car+specification
//! updates either fully commit or fully roll back, and funnels storage
//! constraint violations through the violation adapter so services see
//! domain errors, never driver error codes.

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::sea_query::Expr;
use sea_orm::{
    AccessMode, ActiveModelTrait, ColumnTrait, DatabaseConnection, DatabaseTransaction,
    EntityTrait, IsolationLevel, NotSet, QueryFilter, Set, TransactionTrait,
};
use std::sync::Arc;

use super::repositories::entities::{car, car_specification, profile, user};
use super::repositories::{
    select_car_detail, select_profile_view, BrandRepository, BrandStore, CarRepository, CarStore,
    CommentRepository, CommentStore, FavoriteRepository, FavoriteStore, ReviewRepository,
    ReviewStore, UserRepository, UserStore,
};
use crate::config::ROLE_USER;
use crate::domain::{CarDetail, CarPatch, NewCar, NewSpecification, ProfileView, SpecificationPatch, User};
use crate::errors::{AppError, AppResult, OptionExt};
use crate::infra::violations::{DbResultExt, Violation};

/// Unit of Work trait for dependency injection.
///
/// Provides centralized access to all repositories and transaction
/// management. The generic `transaction` method makes this trait
/// non-mockable; tests mock at the repository level instead.
#[async_trait]
pub trait UnitOfWork: Send + Sync {
    fn users(&self) -> Arc<dyn UserRepository>;
    fn brands(&self) -> Arc<dyn BrandRepository>;
    fn cars(&self) -> Arc<dyn CarRepository>;
    fn reviews(&self) -> Arc<dyn ReviewRepository>;
    fn comments(&self) -> Arc<dyn CommentRepository>;
    fn favorites(&self) -> Arc<dyn FavoriteRepository>;

    /// Execute a closure within a transaction.
    ///
    /// The transaction is committed on success and rolled back on error.
    /// Uses READ COMMITTED isolation; uniqueness invariants rely on the
    /// unique constraints themselves, not on a stronger isolation level.
    async fn transaction<F, T>(&self, f: F) -> AppResult<T>
    where
        F: for<'a> FnOnce(
                TransactionContext<'a>,
            ) -> std::pin::Pin<
                Box<dyn std::future::Future<Output = AppResult<T>> + Send + 'a>,
            > + Send,
        T: Send;
}

/// Repository access scoped to one open transaction.
pub struct TransactionContext<'a> {
    txn: &'a DatabaseTransaction,
}

impl<'a> TransactionContext<'a> {
    fn new(txn: &'a DatabaseTransaction) -> Self {
        Self { txn }
    }

    pub fn users(&self) -> TxUsers<'_> {
        TxUsers { txn: self.txn }
    }

    pub fn profiles(&self) -> TxProfiles<'_> {
        TxProfiles { txn: self.txn }
    }

    pub fn cars(&self) -> TxCars<'_> {
        TxCars { txn: self.txn }
    }

    pub fn specifications(&self) -> TxSpecifications<'_> {
        TxSpecifications { txn: self.txn }
    }
}

/// Concrete implementation of UnitOfWork over the shared pool
pub struct Persistence {
    db: Arc<DatabaseConnection>,
    users: Arc<UserStore>,
    brands: Arc<BrandStore>,
    cars: Arc<CarStore>,
    reviews: Arc<ReviewStore>,
    comments: Arc<CommentStore>,
    favorites: Arc<FavoriteStore>,
}

impl Persistence {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self {
            users: Arc::new(UserStore::new(db.clone())),
            brands: Arc::new(BrandStore::new(db.clone())),
            cars: Arc::new(CarStore::new(db.clone())),
            reviews: Arc::new(ReviewStore::new(db.clone())),
            comments: Arc::new(CommentStore::new(db.clone())),
            favorites: Arc::new(FavoriteStore::new(db.clone())),
            db,
        }
    }
}

#[async_trait]
impl UnitOfWork for Persistence {
    fn users(&self) -> Arc<dyn UserRepository> {
        self.users.clone()
    }

    fn brands(&self) -> Arc<dyn BrandRepository> {
        self.brands.clone()
    }

    fn cars(&self) -> Arc<dyn CarRepository> {
        self.cars.clone()
    }

    fn reviews(&self) -> Arc<dyn ReviewRepository> {
        self.reviews.clone()
    }

    fn comments(&self) -> Arc<dyn CommentRepository> {
        self.comments.clone()
    }

    fn favorites(&self) -> Arc<dyn FavoriteRepository> {
        self.favorites.clone()
    }

    async fn transaction<F, T>(&self, f: F) -> AppResult<T>
    where
        F: for<'a> FnOnce(
                TransactionContext<'a>,
            ) -> std::pin::Pin<
                Box<dyn std::future::Future<Output = AppResult<T>> + Send + 'a>,
            > + Send,
        T: Send,
    {
        let txn = self
            .db
            .begin_with_config(Some(IsolationLevel::ReadCommitted), Some(AccessMode::ReadWrite))
            .await
            .map_err(AppError::from)?;

        let ctx = TransactionContext::new(&txn);

        match f(ctx).await {
            Ok(result) => {
                txn.commit().await.map_err(AppError::from)?;
                Ok(result)
            }
            Err(e) => {
                if let Err(rollback_err) = txn.rollback().await {
                    tracing::error!("Transaction rollback failed: {}", rollback_err);
                }
                Err(e)
            }
        }
    }
}

/// Transaction-scoped user writes
pub struct TxUsers<'a> {
    txn: &'a DatabaseTransaction,
}

impl<'a> TxUsers<'a> {
    /// Insert a user row with the default role
    pub async fn insert(
        &self,
        username: String,
        email: String,
        password_hash: String,
    ) -> AppResult<User> {
        let now = Utc::now();
        let active = user::ActiveModel {
            id: NotSet,
            username: Set(username),
            email: Set(email),
            password: Set(password_hash),
            role: Set(ROLE_USER.to_string()),
            created_at: Set(now),
            updated_at: Set(now),
        };

        let model = active.insert(self.txn).await.violation(|v| match v {
            Violation::Unique => Some(AppError::conflict("username or email already exists")),
            _ => None,
        })?;

        Ok(User::from(model))
    }

    /// Sparse patch of the identity columns
    pub async fn patch_identity(
        &self,
        user_id: i64,
        username: Option<String>,
        email: Option<String>,
    ) -> AppResult<()> {
        let mut query = user::Entity::update_many()
            .col_expr(user::Column::UpdatedAt, Expr::value(Utc::now()))
            .filter(user::Column::Id.eq(user_id));

        if let Some(username) = username {
            query = query.col_expr(user::Column::Username, Expr::value(username));
        }
        if let Some(email) = email {
            query = query.col_expr(user::Column::Email, Expr::value(email));
        }

        let result = query.exec(self.txn).await.violation(|v| match v {
            Violation::Unique => Some(AppError::conflict("username or email already exists")),
            _ => None,
        })?;

        if result.rows_affected == 0 {
            return Err(AppError::not_found("user"));
        }

        Ok(())
    }

    /// Delete the user row
    pub async fn delete(&self, user_id: i64) -> AppResult<()> {
        let result = user::Entity::delete_by_id(user_id)
            .exec(self.txn)
            .await
            .map_err(AppError::from)?;

        if result.rows_affected == 0 {
            return Err(AppError::not_found("user"));
        }

        Ok(())
    }

    /// Re-read the user joined with its profile inside the unit
    pub async fn profile_view(&self, user_id: i64) -> AppResult<ProfileView> {
        select_profile_view(self.txn, user_id)
            .await?
            .ok_or_not_found("user")
    }
}

/// Transaction-scoped profile writes
pub struct TxProfiles<'a> {
    txn: &'a DatabaseTransaction,
}

impl<'a> TxProfiles<'a> {
    /// Insert the empty profile row owned by a freshly created user
    pub async fn insert_empty(&self, user_id: i64) -> AppResult<()> {
        let now = Utc::now();
        let active = profile::ActiveModel {
            id: NotSet,
            user_id: Set(user_id),
            full_name: Set(None),
            bio: Set(None),
            age: Set(None),
            gender: Set(None),
            created_at: Set(now),
            updated_at: Set(now),
        };

        active.insert(self.txn).await.violation(|v| match v {
            Violation::Unique => Some(AppError::conflict("username or email already exists")),
            _ => None,
        })?;

        Ok(())
    }

    /// Sparse patch of the personal attributes
    pub async fn patch(
        &self,
        user_id: i64,
        full_name: Option<String>,
        bio: Option<String>,
        age: Option<i16>,
        gender: Option<String>,
    ) -> AppResult<()> {
        let mut query = profile::Entity::update_many()
            .col_expr(profile::Column::UpdatedAt, Expr::value(Utc::now()))
            .filter(profile::Column::UserId.eq(user_id));

        if let Some(full_name) = full_name {
            query = query.col_expr(profile::Column::FullName, Expr::value(full_name));
        }
        if let Some(bio) = bio {
            query = query.col_expr(profile::Column::Bio, Expr::value(bio));
        }
        if let Some(age) = age {
            query = query.col_expr(profile::Column::Age, Expr::value(age));
        }
        if let Some(gender) = gender {
            query = query.col_expr(profile::Column::Gender, Expr::value(gender));
        }

        let result = query.exec(self.txn).await.map_err(AppError::from)?;

        if result.rows_affected == 0 {
            return Err(AppError::not_found("profile"));
        }

        Ok(())
    }

    /// Delete the profile row ahead of its owning user
    pub async fn delete_by_user(&self, user_id: i64) -> AppResult<()> {
        profile::Entity::delete_many()
            .filter(profile::Column::UserId.eq(user_id))
            .exec(self.txn)
            .await
            .map_err(AppError::from)?;

        Ok(())
    }
}

/// Transaction-scoped car writes
pub struct TxCars<'a> {
    txn: &'a DatabaseTransaction,
}

impl<'a> TxCars<'a> {
    /// Insert a car row and return its id; the brand must exist
    pub async fn insert(&self, new_car: NewCar) -> AppResult<i64> {
        let now = Utc::now();
        let active = car::ActiveModel {
            id: NotSet,
            brand_id: Set(new_car.brand_id),
            model: Set(new_car.model),
            year: Set(new_car.year),
            image_url: Set(new_car.image_url),
            created_at: Set(now),
            updated_at: Set(now),
        };

        let model = active.insert(self.txn).await.violation(|v| match v {
            Violation::ForeignKey => Some(AppError::not_found("brand")),
            _ => None,
        })?;

        Ok(model.id)
    }

    /// Sparse patch of the car row
    pub async fn patch(&self, car_id: i64, patch: CarPatch) -> AppResult<()> {
        let mut query = car::Entity::update_many()
            .col_expr(car::Column::UpdatedAt, Expr::value(Utc::now()))
            .filter(car::Column::Id.eq(car_id));

        if let Some(brand_id) = patch.brand_id {
            query = query.col_expr(car::Column::BrandId, Expr::value(brand_id));
        }
        if let Some(model) = patch.model {
            query = query.col_expr(car::Column::Model, Expr::value(model));
        }
        if let Some(year) = patch.year {
            query = query.col_expr(car::Column::Year, Expr::value(year));
        }
        if let Some(image_url) = patch.image_url {
            query = query.col_expr(car::Column::ImageUrl, Expr::value(image_url));
        }

        let result = query.exec(self.txn).await.violation(|v| match v {
            Violation::ForeignKey => Some(AppError::not_found("brand")),
            _ => None,
        })?;

        if result.rows_affected == 0 {
            return Err(AppError::not_found("car"));
        }

        Ok(())
    }

    /// Delete the car row. The specification and favorites cascade with it;
    /// reviews hold it in place and surface as a conflict.
    pub async fn delete(&self, car_id: i64) -> AppResult<()> {
        let result = car::Entity::delete_by_id(car_id)
            .exec(self.txn)
            .await
            .violation(|v| match v {
                Violation::ForeignKey => Some(AppError::conflict("car still has reviews")),
                _ => None,
            })?;

        if result.rows_affected == 0 {
            return Err(AppError::not_found("car"));
        }

        Ok(())
    }

    /// Re-read the materialized car inside the unit
    pub async fn detail(&self, car_id: i64) -> AppResult<CarDetail> {
        select_car_detail(self.txn, car_id)
            .await?
            .ok_or_not_found("car")
    }
}

/// Transaction-scoped specification writes
pub struct TxSpecifications<'a> {
    txn: &'a DatabaseTransaction,
}

impl<'a> TxSpecifications<'a> {
    /// Insert the specification row for a freshly created car
    pub async fn insert(&self, car_id: i64, spec: NewSpecification) -> AppResult<()> {
        let active = car_specification::ActiveModel {
            id: NotSet,
            car_id: Set(car_id),
            width: Set(spec.width),
            height: Set(spec.height),
            length: Set(spec.length),
            engine: Set(spec.engine),
            torque: Set(spec.torque),
            transmission: Set(spec.transmission),
            acceleration: Set(spec.acceleration),
            horse_power: Set(spec.horse_power),
            braking_front: Set(spec.braking_front),
            braking_rear: Set(spec.braking_rear),
            fuel: Set(spec.fuel),
        };

        active
            .insert(self.txn)
            .await
            .map_err(AppError::from)?;

        Ok(())
    }

    /// Sparse patch of the specification row
    pub async fn patch_by_car(&self, car_id: i64, patch: SpecificationPatch) -> AppResult<()> {
        if patch.is_empty() {
            return Ok(());
        }

        let mut query = car_specification::Entity::update_many()
            .filter(car_specification::Column::CarId.eq(car_id));

        if let Some(width) = patch.width {
            query = query.col_expr(car_specification::Column::Width, Expr::value(width));
        }
        if let Some(height) = patch.height {
            query = query.col_expr(car_specification::Column::Height, Expr::value(height));
        }
        if let Some(length) = patch.length {
            query = query.col_expr(car_specification::Column::Length, Expr::value(length));
        }
        if let Some(engine) = patch.engine {
            query = query.col_expr(car_specification::Column::Engine, Expr::value(engine));
        }
        if let Some(torque) = patch.torque {
            query = query.col_expr(car_specification::Column::Torque, Expr::value(torque));
        }
        if let Some(transmission) = patch.transmission {
            query = query.col_expr(
                car_specification::Column::Transmission,
                Expr::value(transmission),
            );
        }
        if let Some(acceleration) = patch.acceleration {
            query = query.col_expr(
                car_specification::Column::Acceleration,
                Expr::value(acceleration),
            );
        }
        if let Some(horse_power) = patch.horse_power {
            query = query.col_expr(
                car_specification::Column::HorsePower,
                Expr::value(horse_power),
            );
        }
        if let Some(braking_front) = patch.braking_front {
            query = query.col_expr(
                car_specification::Column::BrakingFront,
                Expr::value(braking_front),
            );
        }
        if let Some(braking_rear) = patch.braking_rear {
            query = query.col_expr(
                car_specification::Column::BrakingRear,
                Expr::value(braking_rear),
            );
        }
        if let Some(fuel) = patch.fuel {
            query = query.col_expr(car_specification::Column::Fuel, Expr::value(fuel));
        }

        let result = query.exec(self.txn).await.map_err(AppError::from)?;

        if result.rows_affected == 0 {
            return Err(AppError::not_found("car"));
        }

        Ok(())
    }
}
