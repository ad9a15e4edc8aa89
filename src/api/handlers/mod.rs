//! HTTP request handlers.

pub mod auth_handler;
pub mod brand_handler;
pub mod car_handler;
pub mod comment_handler;
pub mod favorite_handler;
pub mod review_handler;
pub mod user_handler;

pub use auth_handler::auth_routes;
pub use brand_handler::brand_routes;
pub use car_handler::car_routes;
pub use comment_handler::comment_routes;
pub use favorite_handler::favorite_routes;
pub use review_handler::review_routes;
pub use user_handler::user_routes;
