//! Application state - dependency injection container for the HTTP layer.

use std::sync::Arc;

use sea_orm::DatabaseConnection;

use crate::config::Config;
use crate::infra::Database;
use crate::services::{
    BrandService, CarService, CommentService, FavoriteService, ReviewService, Services,
    TokenService, UserService,
};

/// Application state containing all services.
#[derive(Clone)]
pub struct AppState {
    pub tokens: Arc<TokenService>,
    pub users: Arc<dyn UserService>,
    pub cars: Arc<dyn CarService>,
    pub reviews: Arc<dyn ReviewService>,
    pub comments: Arc<dyn CommentService>,
    pub brands: Arc<dyn BrandService>,
    pub favorites: Arc<dyn FavoriteService>,
    pub db: Arc<DatabaseConnection>,
}

impl AppState {
    /// Create application state from the connected database and config.
    pub fn from_config(database: &Database, config: &Config) -> Self {
        let connection = database.get_connection();
        let services = Services::from_connection(connection.clone(), config);

        Self {
            tokens: services.tokens,
            users: services.users,
            cars: services.cars,
            reviews: services.reviews,
            comments: services.comments,
            brands: services.brands,
            favorites: services.favorites,
            db: connection,
        }
    }

    /// Create application state with manually injected services (tests).
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        tokens: Arc<TokenService>,
        users: Arc<dyn UserService>,
        cars: Arc<dyn CarService>,
        reviews: Arc<dyn ReviewService>,
        comments: Arc<dyn CommentService>,
        brands: Arc<dyn BrandService>,
        favorites: Arc<dyn FavoriteService>,
        db: DatabaseConnection,
    ) -> Self {
        Self {
            tokens,
            users,
            cars,
            reviews,
            comments,
            brands,
            favorites,
            db: Arc::new(db),
        }
    }
}
