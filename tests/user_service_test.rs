//! User service unit tests with mocked repositories.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use mockall::predicate::eq;

use carview::domain::{Password, User, UserRole};
use carview::errors::{AppError, AppResult};
use carview::infra::repositories::{
    MockUserRepository, UserRepository,
};
use carview::infra::{
    BrandRepository, CarRepository, CommentRepository, FavoriteRepository, ReviewRepository,
    TransactionContext, UnitOfWork,
};
use carview::services::{TokenService, UserManager, UserService};

const SECRET: &[u8] = b"test-secret-key-for-testing-only-32chars";

fn test_user(id: i64, password: &str) -> User {
    User {
        id,
        username: "alice".to_string(),
        email: "alice@x.com".to_string(),
        password_hash: Password::new(password).unwrap().into_string(),
        role: UserRole::User,
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
}

/// Unit-of-work mock wrapping a MockUserRepository.
///
/// Transactions are not supported here; transactional units are covered by
/// the repository layer against a real database.
struct TestUnitOfWork {
    users: Arc<MockUserRepository>,
}

impl TestUnitOfWork {
    fn new(users: MockUserRepository) -> Self {
        Self {
            users: Arc::new(users),
        }
    }
}

#[async_trait]
impl UnitOfWork for TestUnitOfWork {
    fn users(&self) -> Arc<dyn UserRepository> {
        self.users.clone()
    }

    fn brands(&self) -> Arc<dyn BrandRepository> {
        unimplemented!("not used in user service tests")
    }

    fn cars(&self) -> Arc<dyn CarRepository> {
        unimplemented!("not used in user service tests")
    }

    fn reviews(&self) -> Arc<dyn ReviewRepository> {
        unimplemented!("not used in user service tests")
    }

    fn comments(&self) -> Arc<dyn CommentRepository> {
        unimplemented!("not used in user service tests")
    }

    fn favorites(&self) -> Arc<dyn FavoriteRepository> {
        unimplemented!("not used in user service tests")
    }

    async fn transaction<F, T>(&self, _f: F) -> AppResult<T>
    where
        F: for<'a> FnOnce(
                TransactionContext<'a>,
            ) -> std::pin::Pin<
                Box<dyn std::future::Future<Output = AppResult<T>> + Send + 'a>,
            > + Send,
        T: Send,
    {
        Err(AppError::internal("Transactions not supported in test mock"))
    }
}

fn service(users: MockUserRepository) -> UserManager<TestUnitOfWork> {
    UserManager::new(
        Arc::new(TestUnitOfWork::new(users)),
        Arc::new(TokenService::new(SECRET, 1)),
    )
}

#[tokio::test]
async fn login_issues_a_verifiable_token() {
    let mut repo = MockUserRepository::new();
    repo.expect_find_by_identifier()
        .with(eq("alice"))
        .returning(|_| Ok(Some(test_user(42, "password1"))));

    let service = service(repo);
    let login = service
        .login("alice".to_string(), "password1".to_string())
        .await
        .unwrap();

    assert_eq!(login.username, "alice");
    assert_eq!(login.role, UserRole::User);

    // The token round-trips through the same verifier
    let tokens = TokenService::new(SECRET, 1);
    let claims = tokens.verify_access_token(&login.token).unwrap();
    assert_eq!(claims.user_id, 42);
    assert_eq!(claims.user_role, "USER");
}

#[tokio::test]
async fn login_with_wrong_password_is_invalid_credentials() {
    let mut repo = MockUserRepository::new();
    repo.expect_find_by_identifier()
        .returning(|_| Ok(Some(test_user(1, "password1"))));

    let service = service(repo);
    let err = service
        .login("alice".to_string(), "wrong".to_string())
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::InvalidCredentials));
}

#[tokio::test]
async fn login_with_unknown_identifier_is_the_same_error() {
    let mut repo = MockUserRepository::new();
    repo.expect_find_by_identifier().returning(|_| Ok(None));

    let service = service(repo);
    let err = service
        .login("nobody".to_string(), "password1".to_string())
        .await
        .unwrap_err();

    // Identical error whether the identifier or the password was wrong
    assert!(matches!(err, AppError::InvalidCredentials));
}

#[tokio::test]
async fn current_user_not_found() {
    let mut repo = MockUserRepository::new();
    repo.expect_find_by_id().returning(|_| Ok(None));

    let service = service(repo);
    let err = service.current_user(99).await.unwrap_err();

    assert!(matches!(err, AppError::NotFound(_)));
}

#[tokio::test]
async fn forgot_password_issues_a_reset_token_for_matching_user() {
    let mut repo = MockUserRepository::new();
    repo.expect_find_by_username_and_email()
        .with(eq("alice"), eq("alice@x.com"))
        .returning(|_, _| Ok(Some(test_user(7, "password1"))));

    let service = service(repo);
    let reset = service
        .forgot_password("alice".to_string(), "alice@x.com".to_string())
        .await
        .unwrap();

    let tokens = TokenService::new(SECRET, 1);
    let claims = tokens.verify_reset_token(&reset.token).unwrap();
    assert_eq!(claims.user_id, 7);

    // A reset token must not pass access verification
    assert!(tokens.verify_access_token(&reset.token).is_err());
}

#[tokio::test]
async fn forgot_password_unknown_pair_is_not_found() {
    let mut repo = MockUserRepository::new();
    repo.expect_find_by_username_and_email()
        .returning(|_, _| Ok(None));

    let service = service(repo);
    let err = service
        .forgot_password("alice".to_string(), "other@x.com".to_string())
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::NotFound(_)));
}

#[tokio::test]
async fn reset_password_with_garbage_token_is_rejected() {
    let repo = MockUserRepository::new();

    let service = service(repo);
    let err = service
        .reset_password("not-a-token".to_string(), "newpassword1".to_string())
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::Jwt(_)));
}

#[tokio::test]
async fn reset_password_stores_a_new_hash() {
    let tokens = TokenService::new(SECRET, 1);
    let token = tokens.issue_reset_token(7).unwrap();

    let mut repo = MockUserRepository::new();
    repo.expect_find_by_id()
        .with(eq(7))
        .returning(|id| Ok(Some(test_user(id, "password1"))));
    repo.expect_update_password()
        .withf(|id, hash| {
            *id == 7 && Password::from_hash(hash.clone()).verify("newpassword1")
        })
        .returning(|_, _| Ok(()));

    let service = service(repo);
    service
        .reset_password(token, "newpassword1".to_string())
        .await
        .unwrap();
}

#[tokio::test]
async fn update_password_rejects_short_passwords() {
    let repo = MockUserRepository::new();

    let service = service(repo);
    let err = service
        .update_password(1, "short".to_string())
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::Validation(_)));
}
