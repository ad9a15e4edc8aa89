//! User repository: pool-backed reads and targeted updates.
//!
//! User/profile creation and deletion are multi-row units and live on the
//! transaction context instead (see `unit_of_work`).

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ColumnTrait, Condition, ConnectionTrait, DatabaseConnection, EntityTrait, FromQueryResult,
    JoinType, QueryFilter, QuerySelect, RelationTrait,
};

use super::entities::{profile, user};
use crate::domain::{ProfileView, User, UserRole};
use crate::errors::{AppError, AppResult};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// User repository trait for dependency injection.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Find user by ID
    async fn find_by_id(&self, id: i64) -> AppResult<Option<User>>;

    /// Find user by username or email (login identifier)
    async fn find_by_identifier(&self, identifier: &str) -> AppResult<Option<User>>;

    /// Find user matching both username and email (password-reset lookup)
    async fn find_by_username_and_email(
        &self,
        username: &str,
        email: &str,
    ) -> AppResult<Option<User>>;

    /// Read the user joined with its profile row
    async fn profile_view(&self, user_id: i64) -> AppResult<Option<ProfileView>>;

    /// Replace the stored password hash
    async fn update_password(&self, user_id: i64, password_hash: String) -> AppResult<()>;
}

/// Concrete implementation of UserRepository over the shared pool
pub struct UserStore {
    db: Arc<DatabaseConnection>,
}

impl UserStore {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl UserRepository for UserStore {
    async fn find_by_id(&self, id: i64) -> AppResult<Option<User>> {
        let result = user::Entity::find_by_id(id)
            .one(&*self.db)
            .await
            .map_err(AppError::from)?;

        Ok(result.map(User::from))
    }

    async fn find_by_identifier(&self, identifier: &str) -> AppResult<Option<User>> {
        let result = user::Entity::find()
            .filter(
                Condition::any()
                    .add(user::Column::Username.eq(identifier))
                    .add(user::Column::Email.eq(identifier)),
            )
            .one(&*self.db)
            .await
            .map_err(AppError::from)?;

        Ok(result.map(User::from))
    }

    async fn find_by_username_and_email(
        &self,
        username: &str,
        email: &str,
    ) -> AppResult<Option<User>> {
        let result = user::Entity::find()
            .filter(user::Column::Username.eq(username))
            .filter(user::Column::Email.eq(email))
            .one(&*self.db)
            .await
            .map_err(AppError::from)?;

        Ok(result.map(User::from))
    }

    async fn profile_view(&self, user_id: i64) -> AppResult<Option<ProfileView>> {
        select_profile_view(&*self.db, user_id).await
    }

    async fn update_password(&self, user_id: i64, password_hash: String) -> AppResult<()> {
        let result = user::Entity::update_many()
            .col_expr(user::Column::Password, Expr::value(password_hash))
            .col_expr(user::Column::UpdatedAt, Expr::value(Utc::now()))
            .filter(user::Column::Id.eq(user_id))
            .exec(&*self.db)
            .await
            .map_err(AppError::from)?;

        if result.rows_affected == 0 {
            return Err(AppError::not_found("user"));
        }

        Ok(())
    }
}

/// Flat row for the user-profile join
#[derive(Debug, FromQueryResult)]
struct ProfileRow {
    id: i64,
    username: String,
    email: String,
    role: String,
    full_name: Option<String>,
    bio: Option<String>,
    age: Option<i16>,
    gender: Option<String>,
}

impl From<ProfileRow> for ProfileView {
    fn from(row: ProfileRow) -> Self {
        ProfileView {
            id: row.id,
            username: row.username,
            email: row.email,
            role: UserRole::from(row.role.as_str()),
            full_name: row.full_name,
            bio: row.bio,
            age: row.age,
            gender: row.gender,
        }
    }
}

/// Shared user-profile join, usable on the pool and inside transactions.
pub(crate) async fn select_profile_view<C: ConnectionTrait>(
    conn: &C,
    user_id: i64,
) -> AppResult<Option<ProfileView>> {
    let row = user::Entity::find_by_id(user_id)
        .select_only()
        .columns([
            user::Column::Id,
            user::Column::Username,
            user::Column::Email,
            user::Column::Role,
        ])
        .columns([
            profile::Column::FullName,
            profile::Column::Bio,
            profile::Column::Age,
            profile::Column::Gender,
        ])
        .join(JoinType::LeftJoin, user::Relation::Profile.def())
        .into_model::<ProfileRow>()
        .one(conn)
        .await
        .map_err(AppError::from)?;

    Ok(row.map(ProfileView::from))
}
