//! User service - registration, authentication and profile management.
//!
//! Account creation and deletion are multi-row units (user + profile) and go
//! through the Unit of Work; everything else runs over the pool-backed
//! repositories.

use async_trait::async_trait;
use serde::Serialize;
use std::sync::Arc;
use utoipa::ToSchema;

use crate::domain::{Password, ProfileUpdate, ProfileView, UserRole, UserSummary};
use crate::errors::{AppError, AppResult, OptionExt};
use crate::infra::UnitOfWork;
use crate::services::TokenService;

/// Response returned after successful login
#[derive(Debug, Serialize, ToSchema)]
pub struct LoginView {
    pub username: String,
    pub email: String,
    pub role: UserRole,
    /// Signed bearer token
    pub token: String,
}

/// Response returned by the forgot-password flow
#[derive(Debug, Serialize, ToSchema)]
pub struct ResetTokenView {
    pub token: String,
}

/// User service trait for dependency injection.
#[async_trait]
pub trait UserService: Send + Sync {
    /// Create a user with its empty profile; role defaults to USER
    async fn register(&self, username: String, email: String, password: String)
        -> AppResult<UserSummary>;

    /// Authenticate by username or email and issue an access token
    async fn login(&self, identifier: String, password: String) -> AppResult<LoginView>;

    /// Replace the caller's password
    async fn update_password(&self, user_id: i64, new_password: String) -> AppResult<()>;

    /// Public profile read
    async fn profile(&self, user_id: i64) -> AppResult<ProfileView>;

    /// Sparse patch across the user and profile rows
    async fn update_profile(&self, user_id: i64, update: ProfileUpdate) -> AppResult<ProfileView>;

    /// Delete the profile and the user in one unit
    async fn delete_account(&self, user_id: i64) -> AppResult<()>;

    /// Issue a short-lived reset token for a matching username and email
    async fn forgot_password(&self, username: String, email: String) -> AppResult<ResetTokenView>;

    /// Consume a reset token and store a new password
    async fn reset_password(&self, token: String, new_password: String) -> AppResult<()>;

    /// Identity summary for the authenticated user
    async fn current_user(&self, user_id: i64) -> AppResult<UserSummary>;
}

/// Concrete implementation of UserService using Unit of Work.
pub struct UserManager<U: UnitOfWork> {
    uow: Arc<U>,
    tokens: Arc<TokenService>,
}

impl<U: UnitOfWork> UserManager<U> {
    pub fn new(uow: Arc<U>, tokens: Arc<TokenService>) -> Self {
        Self { uow, tokens }
    }
}

#[async_trait]
impl<U: UnitOfWork> UserService for UserManager<U> {
    async fn register(
        &self,
        username: String,
        email: String,
        password: String,
    ) -> AppResult<UserSummary> {
        let username = sanitize_username(&username);
        let password_hash = Password::new(&password)?.into_string();

        let user = self
            .uow
            .transaction(move |ctx| {
                Box::pin(async move {
                    let user = ctx.users().insert(username, email, password_hash).await?;
                    ctx.profiles().insert_empty(user.id).await?;
                    Ok(user)
                })
            })
            .await?;

        tracing::info!(user_id = user.id, "user registered");

        Ok(UserSummary::from(user))
    }

    async fn login(&self, identifier: String, password: String) -> AppResult<LoginView> {
        let user = self.uow.users().find_by_identifier(&identifier).await?;

        // Verify against a dummy hash when the identifier is unknown so the
        // response does not reveal which credential was wrong, by timing or
        // by message.
        let dummy_hash =
            "$argon2id$v=19$m=19456,t=2,p=1$dummysalt123456$dummyhash1234567890123456789012";
        let stored = user
            .as_ref()
            .map(|u| u.password_hash.clone())
            .unwrap_or_else(|| dummy_hash.to_string());
        let password_valid = Password::from_hash(stored).verify(&password);

        match user {
            Some(user) if password_valid => {
                let token = self.tokens.issue_access_token(user.id, &user.role)?;

                tracing::info!(user_id = user.id, "user logged in");

                Ok(LoginView {
                    username: user.username,
                    email: user.email,
                    role: user.role,
                    token,
                })
            }
            _ => Err(AppError::InvalidCredentials),
        }
    }

    async fn update_password(&self, user_id: i64, new_password: String) -> AppResult<()> {
        let password_hash = Password::new(&new_password)?.into_string();
        self.uow.users().update_password(user_id, password_hash).await?;

        tracing::info!(user_id, "password updated");

        Ok(())
    }

    async fn profile(&self, user_id: i64) -> AppResult<ProfileView> {
        self.uow
            .users()
            .profile_view(user_id)
            .await?
            .ok_or_not_found("user")
    }

    async fn update_profile(&self, user_id: i64, update: ProfileUpdate) -> AppResult<ProfileView> {
        let view = self
            .uow
            .transaction(move |ctx| {
                Box::pin(async move {
                    let touches_identity = update.touches_identity();
                    let touches_profile = update.touches_profile();

                    if touches_identity {
                        let username = update.username.map(|u| sanitize_username(&u));
                        ctx.users()
                            .patch_identity(user_id, username, update.email)
                            .await?;
                    }

                    if touches_profile {
                        ctx.profiles()
                            .patch(
                                user_id,
                                update.full_name,
                                update.bio,
                                update.age,
                                update.gender.map(|g| g.to_string()),
                            )
                            .await?;
                    }

                    ctx.users().profile_view(user_id).await
                })
            })
            .await?;

        tracing::info!(user_id, "profile updated");

        Ok(view)
    }

    async fn delete_account(&self, user_id: i64) -> AppResult<()> {
        self.uow
            .transaction(move |ctx| {
                Box::pin(async move {
                    ctx.profiles().delete_by_user(user_id).await?;
                    ctx.users().delete(user_id).await
                })
            })
            .await?;

        tracing::info!(user_id, "profile and user deleted");

        Ok(())
    }

    async fn forgot_password(&self, username: String, email: String) -> AppResult<ResetTokenView> {
        let user = self
            .uow
            .users()
            .find_by_username_and_email(&username, &email)
            .await?
            .ok_or_not_found("user")?;

        let token = self.tokens.issue_reset_token(user.id)?;

        Ok(ResetTokenView { token })
    }

    async fn reset_password(&self, token: String, new_password: String) -> AppResult<()> {
        let claims = self.tokens.verify_reset_token(&token)?;

        let user = self
            .uow
            .users()
            .find_by_id(claims.user_id)
            .await?
            .ok_or_not_found("user")?;

        let password_hash = Password::new(&new_password)?.into_string();
        self.uow.users().update_password(user.id, password_hash).await?;

        tracing::info!(user_id = user.id, "password reset");

        Ok(())
    }

    async fn current_user(&self, user_id: i64) -> AppResult<UserSummary> {
        let user = self
            .uow
            .users()
            .find_by_id(user_id)
            .await?
            .ok_or_not_found("user")?;

        Ok(UserSummary::from(user))
    }
}

/// Trim surrounding whitespace and escape HTML metacharacters so a stored
/// username can never smuggle markup into clients.
fn sanitize_username(raw: &str) -> String {
    let trimmed = raw.trim();
    let mut out = String::with_capacity(trimmed.len());
    for c in trimmed.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
