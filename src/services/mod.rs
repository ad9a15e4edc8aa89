//! Application services layer - use cases and business logic.
//!
//! Services compose access control inputs, the Unit of Work and domain rules
//! to fulfill application use cases. They depend on abstractions (traits)
//! for dependency inversion.

mod brand_service;
mod car_service;
mod comment_service;
mod container;
mod favorite_service;
mod review_service;
mod token_service;
mod user_service;

pub use brand_service::{BrandManager, BrandService};
pub use car_service::{CarManager, CarService};
pub use comment_service::{CommentManager, CommentService};
pub use container::Services;
pub use favorite_service::{FavoriteManager, FavoriteService};
pub use review_service::{ReviewManager, ReviewService};
pub use token_service::{AccessClaims, ResetClaims, TokenService};
pub use user_service::{LoginView, ResetTokenView, UserManager, UserService};
