//! Router-level tests with mock services.
//!
//! These drive the axum router end to end: envelope shapes, status codes,
//! access control and the registration/login/favorite scenario, with the
//! service layer replaced by in-memory mocks.

use std::collections::HashSet;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use chrono::Utc;
use sea_orm::{DatabaseBackend, MockDatabase};
use serde_json::{json, Value};
use tower::ServiceExt;

use carview::api::{create_router, AppState};
use carview::domain::{
    Brand, CarDetail, CarFilter, CarPatch, CarSummary, CommentAuthor, CommentView, FavoriteView,
    NewCar, NewComment, NewReview, NewSpecification, ProfileUpdate, ProfileView, ReviewAuthor,
    ReviewCar, ReviewDetail, ReviewFilter, ReviewPatch, SpecificationPatch, SpecificationView,
    UserRole, UserSummary,
};
use carview::errors::{AppError, AppResult};
use carview::services::{
    BrandService, CarService, CommentService, FavoriteService, LoginView, ResetTokenView,
    ReviewService, TokenService, UserService,
};
use carview::types::PaginationParams;

const SECRET: &[u8] = b"test-secret-key-for-testing-only-32chars";

// =============================================================================
// Mock Services
// =============================================================================

/// User service mock with an in-memory username registry
struct MockUserService {
    tokens: Arc<TokenService>,
    registered: Mutex<HashSet<String>>,
}

impl MockUserService {
    fn new(tokens: Arc<TokenService>) -> Self {
        Self {
            tokens,
            registered: Mutex::new(HashSet::new()),
        }
    }
}

#[async_trait]
impl UserService for MockUserService {
    async fn register(
        &self,
        username: String,
        email: String,
        _password: String,
    ) -> AppResult<UserSummary> {
        let mut registered = self.registered.lock().unwrap();
        if !registered.insert(username.clone()) {
            return Err(AppError::conflict("username or email already exists"));
        }

        Ok(UserSummary {
            username,
            email,
            role: UserRole::User,
        })
    }

    async fn login(&self, identifier: String, password: String) -> AppResult<LoginView> {
        match (identifier.as_str(), password.as_str()) {
            ("alice", "password1") => Ok(LoginView {
                username: "alice".to_string(),
                email: "alice@x.com".to_string(),
                role: UserRole::User,
                token: self.tokens.issue_access_token(1, &UserRole::User)?,
            }),
            ("admin", "adminpass1") => Ok(LoginView {
                username: "admin".to_string(),
                email: "admin@x.com".to_string(),
                role: UserRole::Admin,
                token: self.tokens.issue_access_token(99, &UserRole::Admin)?,
            }),
            _ => Err(AppError::InvalidCredentials),
        }
    }

    async fn update_password(&self, _user_id: i64, _new_password: String) -> AppResult<()> {
        Ok(())
    }

    async fn profile(&self, user_id: i64) -> AppResult<ProfileView> {
        Ok(ProfileView {
            id: user_id,
            username: "alice".to_string(),
            email: "alice@x.com".to_string(),
            role: UserRole::User,
            full_name: None,
            bio: None,
            age: None,
            gender: None,
        })
    }

    async fn update_profile(&self, user_id: i64, _update: ProfileUpdate) -> AppResult<ProfileView> {
        self.profile(user_id).await
    }

    async fn delete_account(&self, _user_id: i64) -> AppResult<()> {
        Ok(())
    }

    async fn forgot_password(&self, _username: String, _email: String) -> AppResult<ResetTokenView> {
        Ok(ResetTokenView {
            token: self.tokens.issue_reset_token(1)?,
        })
    }

    async fn reset_password(&self, _token: String, _new_password: String) -> AppResult<()> {
        Ok(())
    }

    async fn current_user(&self, _user_id: i64) -> AppResult<UserSummary> {
        Ok(UserSummary {
            username: "alice".to_string(),
            email: "alice@x.com".to_string(),
            role: UserRole::User,
        })
    }
}

fn car_detail(id: i64, brand_id: i64) -> CarDetail {
    CarDetail {
        id,
        brand_id,
        brand: "Subaru".to_string(),
        model: "Impreza".to_string(),
        year: 2004,
        image_url: "https://img.example.com/impreza.jpg".to_string(),
        specification: SpecificationView {
            width: 1740,
            height: 1440,
            length: 4415,
            engine: "2.0L flat-four".to_string(),
            torque: 300,
            transmission: "manual".to_string(),
            acceleration: 5.5,
            horse_power: 227,
            braking_front: "ventilated disc".to_string(),
            braking_rear: "disc".to_string(),
            fuel: "petrol".to_string(),
        },
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
}

/// Car service mock: brand 999 does not exist
struct MockCarService;

#[async_trait]
impl CarService for MockCarService {
    async fn create(&self, car: NewCar, _spec: NewSpecification) -> AppResult<CarDetail> {
        if car.brand_id == 999 {
            return Err(AppError::not_found("brand"));
        }
        Ok(car_detail(5, car.brand_id))
    }

    async fn update(
        &self,
        _id: i64,
        _car: CarPatch,
        _spec: SpecificationPatch,
    ) -> AppResult<CarDetail> {
        Err(AppError::not_found("car"))
    }

    async fn delete(&self, _id: i64) -> AppResult<()> {
        Ok(())
    }

    async fn list(
        &self,
        _filter: CarFilter,
        _pagination: PaginationParams,
    ) -> AppResult<(Vec<CarSummary>, u64)> {
        Ok((vec![], 0))
    }

    async fn get(&self, _id: i64) -> AppResult<CarDetail> {
        Err(AppError::not_found("car"))
    }
}

struct MockReviewService;

#[async_trait]
impl ReviewService for MockReviewService {
    async fn create(&self, review: NewReview) -> AppResult<ReviewDetail> {
        Ok(ReviewDetail {
            id: 10,
            title: review.title,
            content: review.content,
            image_url: review.image_url,
            user: ReviewAuthor {
                id: review.user_id,
                username: "alice".to_string(),
            },
            car: ReviewCar {
                id: review.car_id,
                model: "Impreza".to_string(),
            },
            created_at: Utc::now(),
            updated_at: Utc::now(),
        })
    }

    async fn update(
        &self,
        _user_id: i64,
        _review_id: i64,
        _patch: ReviewPatch,
    ) -> AppResult<ReviewDetail> {
        Err(AppError::not_found("review"))
    }

    async fn delete(&self, _user_id: i64, _review_id: i64) -> AppResult<()> {
        Err(AppError::not_found("review"))
    }

    async fn list(
        &self,
        _filter: ReviewFilter,
        _pagination: PaginationParams,
    ) -> AppResult<(Vec<ReviewDetail>, u64)> {
        Ok((vec![], 0))
    }

    async fn get(&self, _id: i64) -> AppResult<ReviewDetail> {
        Err(AppError::not_found("review"))
    }
}

struct MockCommentService;

#[async_trait]
impl CommentService for MockCommentService {
    async fn create(&self, comment: NewComment) -> AppResult<CommentView> {
        Ok(CommentView {
            id: 1,
            review_id: comment.review_id,
            content: comment.content,
            user: CommentAuthor {
                id: comment.user_id,
                username: "alice".to_string(),
            },
            created_at: Utc::now(),
            updated_at: Utc::now(),
        })
    }

    async fn update(
        &self,
        _user_id: i64,
        _comment_id: i64,
        _content: String,
    ) -> AppResult<CommentView> {
        Err(AppError::not_found("comment"))
    }

    async fn delete(&self, _user_id: i64, _comment_id: i64) -> AppResult<()> {
        Err(AppError::not_found("comment"))
    }

    async fn list_by_review(&self, _review_id: i64) -> AppResult<Vec<CommentView>> {
        Ok(vec![])
    }
}

struct MockBrandService;

#[async_trait]
impl BrandService for MockBrandService {
    async fn create(&self, name: String) -> AppResult<Brand> {
        Ok(Brand { id: 1, name })
    }

    async fn update(&self, _id: i64, _name: String) -> AppResult<Brand> {
        Err(AppError::not_found("brand"))
    }

    async fn delete(&self, _id: i64) -> AppResult<()> {
        Err(AppError::conflict("brand is still referenced by cars"))
    }

    async fn list(&self) -> AppResult<Vec<Brand>> {
        Ok(vec![Brand {
            id: 1,
            name: "Subaru".to_string(),
        }])
    }
}

/// Favorite service mock with an in-memory (user, car) registry
struct MockFavoriteService {
    favorites: Mutex<HashSet<(i64, i64)>>,
}

impl MockFavoriteService {
    fn new() -> Self {
        Self {
            favorites: Mutex::new(HashSet::new()),
        }
    }
}

#[async_trait]
impl FavoriteService for MockFavoriteService {
    async fn add(&self, user_id: i64, car_id: i64) -> AppResult<()> {
        if car_id == 404 {
            return Err(AppError::not_found("car"));
        }
        let mut favorites = self.favorites.lock().unwrap();
        if !favorites.insert((user_id, car_id)) {
            return Err(AppError::conflict("car is already favorited"));
        }
        Ok(())
    }

    async fn remove(&self, user_id: i64, car_id: i64) -> AppResult<()> {
        let mut favorites = self.favorites.lock().unwrap();
        if !favorites.remove(&(user_id, car_id)) {
            return Err(AppError::not_found("favorite"));
        }
        Ok(())
    }

    async fn list(&self, _user_id: i64) -> AppResult<Vec<FavoriteView>> {
        Ok(vec![])
    }
}

// =============================================================================
// Test Helpers
// =============================================================================

fn test_app() -> axum::Router {
    let tokens = Arc::new(TokenService::new(SECRET, 1));
    let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();

    let state = AppState::new(
        tokens.clone(),
        Arc::new(MockUserService::new(tokens)),
        Arc::new(MockCarService),
        Arc::new(MockReviewService),
        Arc::new(MockCommentService),
        Arc::new(MockBrandService),
        Arc::new(MockFavoriteService::new()),
        db,
    );

    create_router(state)
}

fn user_token() -> String {
    TokenService::new(SECRET, 1)
        .issue_access_token(1, &UserRole::User)
        .unwrap()
}

fn admin_token() -> String {
    TokenService::new(SECRET, 1)
        .issue_access_token(99, &UserRole::Admin)
        .unwrap()
}

fn json_request(method: &str, uri: &str, token: Option<&str>, body: Value) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

fn get_request(uri: &str, token: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method("GET").uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    builder.body(Body::empty()).unwrap()
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

fn car_body(brand_id: i64) -> Value {
    json!({
        "brand_id": brand_id,
        "model": "Impreza",
        "year": 2004,
        "image_url": "https://img.example.com/impreza.jpg",
        "specification": {
            "width": 1740,
            "height": 1440,
            "length": 4415,
            "engine": "2.0L flat-four",
            "torque": 300,
            "transmission": "manual",
            "acceleration": 5.5,
            "horse_power": 227,
            "braking_front": "ventilated disc",
            "braking_rear": "disc",
            "fuel": "petrol"
        }
    })
}

// =============================================================================
// Scenario: register, login, create car, favorite
// =============================================================================

#[tokio::test]
async fn register_returns_created_user_with_default_role() {
    let app = test_app();

    let response = app
        .oneshot(json_request(
            "POST",
            "/api/auth/register",
            None,
            json!({"username": "alice", "email": "alice@x.com", "password": "password1"}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);
    let body = body_json(response).await;
    assert_eq!(body["code"], 201);
    assert_eq!(body["data"]["role"], "USER");
    assert_eq!(body["data"]["username"], "alice");
}

#[tokio::test]
async fn duplicate_registration_conflicts() {
    let app = test_app();
    let payload = json!({"username": "alice", "email": "alice@x.com", "password": "password1"});

    let first = app
        .clone()
        .oneshot(json_request("POST", "/api/auth/register", None, payload.clone()))
        .await
        .unwrap();
    assert_eq!(first.status(), StatusCode::CREATED);

    let second = app
        .oneshot(json_request("POST", "/api/auth/register", None, payload))
        .await
        .unwrap();
    assert_eq!(second.status(), StatusCode::CONFLICT);

    let body = body_json(second).await;
    assert_eq!(body["code"], 409);
    assert!(body["errors"].is_string());
}

#[tokio::test]
async fn login_with_wrong_password_is_unauthorized() {
    let app = test_app();

    let response = app
        .oneshot(json_request(
            "POST",
            "/api/auth/login",
            None,
            json!({"identifier": "alice", "password": "wrong"}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn login_returns_a_verifiable_token() {
    let app = test_app();

    let response = app
        .oneshot(json_request(
            "POST",
            "/api/auth/login",
            None,
            json!({"identifier": "alice", "password": "password1"}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    let token = body["data"]["token"].as_str().unwrap();

    let claims = TokenService::new(SECRET, 1)
        .verify_access_token(token)
        .unwrap();
    assert_eq!(claims.user_id, 1);
    assert_eq!(claims.user_role, "USER");
}

#[tokio::test]
async fn car_creation_without_token_is_unauthorized() {
    let app = test_app();

    let response = app
        .oneshot(json_request("POST", "/api/cars", None, car_body(1)))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn car_creation_with_user_role_is_forbidden() {
    let app = test_app();

    let response = app
        .oneshot(json_request(
            "POST",
            "/api/cars",
            Some(&user_token()),
            car_body(1),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn car_with_unknown_brand_is_not_found() {
    let app = test_app();

    let response = app
        .oneshot(json_request(
            "POST",
            "/api/cars",
            Some(&admin_token()),
            car_body(999),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body = body_json(response).await;
    assert_eq!(body["errors"], "brand not found");
}

#[tokio::test]
async fn admin_can_create_a_car() {
    let app = test_app();

    let response = app
        .oneshot(json_request(
            "POST",
            "/api/cars",
            Some(&admin_token()),
            car_body(1),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);
    let body = body_json(response).await;
    assert_eq!(body["data"]["model"], "Impreza");
    assert_eq!(body["data"]["specification"]["horse_power"], 227);
}

#[tokio::test]
async fn favoriting_the_same_car_twice_conflicts() {
    let app = test_app();
    let token = user_token();

    let first = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/favorites/5",
            Some(&token),
            json!({}),
        ))
        .await
        .unwrap();
    assert_eq!(first.status(), StatusCode::CREATED);

    let second = app
        .oneshot(json_request(
            "POST",
            "/api/favorites/5",
            Some(&token),
            json!({}),
        ))
        .await
        .unwrap();
    assert_eq!(second.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn removing_a_missing_favorite_is_not_found() {
    let app = test_app();

    let mut builder = Request::builder()
        .method("DELETE")
        .uri("/api/favorites/7");
    builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", user_token()));
    let response = app
        .oneshot(builder.body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

// =============================================================================
// Envelopes, validation and token extraction
// =============================================================================

#[tokio::test]
async fn success_envelope_has_code_message_and_data() {
    let app = test_app();

    let response = app.oneshot(get_request("/api/brands", None)).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["code"], 200);
    assert_eq!(body["message"], "success");
    assert_eq!(body["data"][0]["name"], "Subaru");
    assert!(body.get("metadata").is_none());
}

#[tokio::test]
async fn list_endpoints_carry_pagination_metadata() {
    let app = test_app();

    let response = app
        .oneshot(get_request("/api/cars?page=2&limit=5", None))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["metadata"]["page"], 2);
    assert_eq!(body["metadata"]["limit"], 5);
    assert_eq!(body["metadata"]["total_data"], 0);
}

#[tokio::test]
async fn validation_failure_is_bad_request() {
    let app = test_app();

    let response = app
        .oneshot(json_request(
            "POST",
            "/api/auth/register",
            None,
            json!({"username": "alice", "email": "alice@x.com", "password": "short"}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["code"], 400);
}

#[tokio::test]
async fn token_in_query_parameter_is_accepted() {
    let app = test_app();
    let uri = format!("/api/users/current?token={}", user_token());

    let response = app.oneshot(get_request(&uri, None)).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["data"]["username"], "alice");
}

#[tokio::test]
async fn expired_token_is_rejected() {
    let app = test_app();

    // Issued with a negative lifespan so the expiry is in the past
    let expired = TokenService::new(SECRET, -2)
        .issue_access_token(1, &UserRole::User)
        .unwrap();

    let response = app
        .oneshot(get_request("/api/users/current", Some(&expired)))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn public_reads_require_no_token() {
    let app = test_app();

    let cars = app
        .clone()
        .oneshot(get_request("/api/cars", None))
        .await
        .unwrap();
    assert_eq!(cars.status(), StatusCode::OK);

    let reviews = app
        .oneshot(get_request("/api/reviews", None))
        .await
        .unwrap();
    assert_eq!(reviews.status(), StatusCode::OK);
}
