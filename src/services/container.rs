//! Service container - builds and holds all application services.

use std::sync::Arc;

use sea_orm::DatabaseConnection;

use super::{
    BrandManager, BrandService, CarManager, CarService, CommentManager, CommentService,
    FavoriteManager, FavoriteService, ReviewManager, ReviewService, TokenService, UserManager,
    UserService,
};
use crate::config::Config;
use crate::infra::Persistence;

/// All application services wired over one Unit of Work.
pub struct Services {
    pub tokens: Arc<TokenService>,
    pub users: Arc<dyn UserService>,
    pub cars: Arc<dyn CarService>,
    pub reviews: Arc<dyn ReviewService>,
    pub comments: Arc<dyn CommentService>,
    pub brands: Arc<dyn BrandService>,
    pub favorites: Arc<dyn FavoriteService>,
}

impl Services {
    /// Create the service container from a database connection and config
    pub fn from_connection(db: Arc<DatabaseConnection>, config: &Config) -> Self {
        let uow = Arc::new(Persistence::new(db));
        let tokens = Arc::new(TokenService::from_config(config));

        Self {
            tokens: tokens.clone(),
            users: Arc::new(UserManager::new(uow.clone(), tokens)),
            cars: Arc::new(CarManager::new(uow.clone())),
            reviews: Arc::new(ReviewManager::new(uow.clone())),
            comments: Arc::new(CommentManager::new(uow.clone())),
            brands: Arc::new(BrandManager::new(uow.clone())),
            favorites: Arc::new(FavoriteManager::new(uow)),
        }
    }
}
