//! OpenAPI documentation configuration.
//!
//! Provides Swagger UI for API exploration and testing.

use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::api::handlers::{
    auth_handler, brand_handler, car_handler, comment_handler, favorite_handler, review_handler,
    user_handler,
};
use crate::domain::{
    Brand, CarDetail, CarSummary, CommentAuthor, CommentView, FavoriteView, Gender, ProfileView,
    ReviewAuthor, ReviewCar, ReviewDetail, SpecificationView, UserRole, UserSummary,
};
use crate::services::{LoginView, ResetTokenView};

/// OpenAPI documentation for the car review API
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Car Review API",
        version = "0.1.0",
        description = "REST API for a car review platform: browse cars and brands, review, comment and favorite.",
        license(name = "MIT", url = "https://opensource.org/licenses/MIT")
    ),
    servers(
        (url = "http://localhost:3000", description = "Local development server")
    ),
    paths(
        // Authentication
        auth_handler::register,
        auth_handler::login,
        auth_handler::forgot_password,
        auth_handler::reset_password,
        // Users
        user_handler::get_profile,
        user_handler::current_user,
        user_handler::list_favorites,
        user_handler::update_password,
        user_handler::update_profile,
        user_handler::delete_account,
        // Cars
        car_handler::list_cars,
        car_handler::get_car,
        car_handler::create_car,
        car_handler::update_car,
        car_handler::delete_car,
        // Brands
        brand_handler::list_brands,
        brand_handler::create_brand,
        brand_handler::update_brand,
        brand_handler::delete_brand,
        // Reviews
        review_handler::list_reviews,
        review_handler::get_review,
        review_handler::list_review_comments,
        review_handler::create_review,
        review_handler::update_review,
        review_handler::delete_review,
        // Comments
        comment_handler::create_comment,
        comment_handler::update_comment,
        comment_handler::delete_comment,
        // Favorites
        favorite_handler::add_favorite,
        favorite_handler::remove_favorite,
    ),
    components(
        schemas(
            UserRole,
            Gender,
            UserSummary,
            ProfileView,
            Brand,
            CarSummary,
            CarDetail,
            SpecificationView,
            ReviewDetail,
            ReviewAuthor,
            ReviewCar,
            CommentView,
            CommentAuthor,
            FavoriteView,
            LoginView,
            ResetTokenView,
            auth_handler::RegisterRequest,
            auth_handler::LoginRequest,
            auth_handler::ForgotPasswordRequest,
            auth_handler::ResetPasswordRequest,
            user_handler::UpdatePasswordRequest,
            user_handler::UpdateProfileRequest,
            car_handler::CarCreateRequest,
            car_handler::CarUpdateRequest,
            car_handler::SpecificationRequest,
            car_handler::SpecificationPatchRequest,
            brand_handler::BrandRequest,
            review_handler::ReviewCreateRequest,
            review_handler::ReviewUpdateRequest,
            comment_handler::CommentCreateRequest,
            comment_handler::CommentUpdateRequest,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Authentication", description = "User registration and login"),
        (name = "Users", description = "Profile and account operations"),
        (name = "Cars", description = "Car catalog"),
        (name = "Brands", description = "Brand catalog"),
        (name = "Reviews", description = "Car reviews"),
        (name = "Comments", description = "Comments on reviews"),
        (name = "Favorites", description = "Favorited cars")
    )
)]
pub struct ApiDoc;

/// Security scheme modifier for JWT Bearer authentication
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .description(Some("Token obtained from /api/auth/login"))
                        .build(),
                ),
            );
        }
    }
}
