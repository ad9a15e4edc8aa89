//! Domain layer - Core business entities and logic
//!
//! Contains the core domain models independent of infrastructure concerns:
//! entities, value objects, view projections and write payloads.

pub mod brand;
pub mod car;
pub mod comment;
pub mod favorite;
pub mod password;
pub mod review;
pub mod user;

pub use brand::Brand;
pub use car::{
    CarDetail, CarFilter, CarPatch, CarSummary, NewCar, NewSpecification, SpecificationPatch,
    SpecificationView,
};
pub use comment::{CommentAuthor, CommentView, NewComment};
pub use favorite::FavoriteView;
pub use password::Password;
pub use review::{NewReview, ReviewAuthor, ReviewCar, ReviewDetail, ReviewFilter, ReviewPatch};
pub use user::{Gender, ProfileUpdate, ProfileView, User, UserRole, UserSummary};
