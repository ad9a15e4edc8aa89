//! Repository layer - Data access abstraction
//!
//! Repositories provide an abstraction over data persistence. Single-row
//! operations run over the shared pool; multi-row units go through the
//! transaction context in `unit_of_work`.

pub(crate) mod entities;

mod brand_repository;
mod car_repository;
mod comment_repository;
mod favorite_repository;
mod review_repository;
mod user_repository;

pub use brand_repository::{BrandRepository, BrandStore};
pub use car_repository::{CarRepository, CarStore};
pub use comment_repository::{CommentRepository, CommentStore};
pub use favorite_repository::{FavoriteRepository, FavoriteStore};
pub use review_repository::{ReviewRepository, ReviewStore};
pub use user_repository::{UserRepository, UserStore};

pub(crate) use car_repository::select_car_detail;
pub(crate) use user_repository::select_profile_view;

// Export mocks for tests (both unit and integration)
#[cfg(any(test, feature = "test-utils"))]
pub use brand_repository::MockBrandRepository;
#[cfg(any(test, feature = "test-utils"))]
pub use car_repository::MockCarRepository;
#[cfg(any(test, feature = "test-utils"))]
pub use comment_repository::MockCommentRepository;
#[cfg(any(test, feature = "test-utils"))]
pub use favorite_repository::MockFavoriteRepository;
#[cfg(any(test, feature = "test-utils"))]
pub use review_repository::MockReviewRepository;
#[cfg(any(test, feature = "test-utils"))]
pub use user_repository::MockUserRepository;
