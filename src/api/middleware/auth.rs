//! Bearer-token access control.
//!
//! `CurrentUser` is an extractor: any handler that takes it has the token
//! verified before its body runs, and rejects with 401 through the uniform
//! error envelope. Role gating sits on top via `require_admin`.
//!
//! Ownership checks are not here: user-owned resources are mutated through
//! owner-scoped queries, so a non-owner sees a plain not-found.

use axum::{async_trait, extract::FromRequestParts, http::header::AUTHORIZATION, http::request::Parts};

use crate::api::AppState;
use crate::config::{BEARER_TOKEN_PREFIX, TOKEN_QUERY_PARAM};
use crate::domain::UserRole;
use crate::errors::AppError;

/// Authenticated identity resolved from a verified access token
#[derive(Clone, Debug)]
pub struct CurrentUser {
    pub id: i64,
    pub role: UserRole,
}

impl CurrentUser {
    /// Check if user has admin role.
    pub fn is_admin(&self) -> bool {
        self.role.is_admin()
    }
}

#[async_trait]
impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, AppError> {
        let token = extract_token(parts).ok_or(AppError::Unauthorized)?;
        let claims = state.tokens.verify_access_token(&token)?;

        Ok(CurrentUser {
            id: claims.user_id,
            role: UserRole::from(claims.user_role.as_str()),
        })
    }
}

/// Require admin role, returns Forbidden error if not admin.
pub fn require_admin(user: &CurrentUser) -> Result<(), AppError> {
    if user.is_admin() {
        Ok(())
    } else {
        Err(AppError::Forbidden)
    }
}

/// Extract the bearer token from a request.
///
/// A `token` query parameter takes precedence over the Authorization header.
fn extract_token(parts: &Parts) -> Option<String> {
    if let Some(query) = parts.uri.query() {
        for pair in query.split('&') {
            if let Some(value) = pair
                .strip_prefix(TOKEN_QUERY_PARAM)
                .and_then(|rest| rest.strip_prefix('='))
            {
                if !value.is_empty() {
                    return Some(value.to_string());
                }
            }
        }
    }

    let header = parts.headers.get(AUTHORIZATION)?.to_str().ok()?;
    let token = header.strip_prefix(BEARER_TOKEN_PREFIX)?.trim();

    if token.is_empty() {
        None
    } else {
        Some(token.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Request;

    fn parts(uri: &str, auth_header: Option<&str>) -> Parts {
        let mut builder = Request::builder().uri(uri);
        if let Some(value) = auth_header {
            builder = builder.header(AUTHORIZATION, value);
        }
        builder.body(()).unwrap().into_parts().0
    }

    #[test]
    fn query_parameter_takes_precedence_over_header() {
        let parts = parts("/api/cars?token=from-query", Some("Bearer from-header"));
        assert_eq!(extract_token(&parts).as_deref(), Some("from-query"));
    }

    #[test]
    fn falls_back_to_bearer_header() {
        let parts = parts("/api/cars", Some("Bearer abc.def.ghi"));
        assert_eq!(extract_token(&parts).as_deref(), Some("abc.def.ghi"));
    }

    #[test]
    fn missing_token_yields_none() {
        let parts = parts("/api/cars", None);
        assert_eq!(extract_token(&parts), None);
    }

    #[test]
    fn non_bearer_header_is_ignored() {
        let parts = parts("/api/cars", Some("Basic dXNlcjpwYXNz"));
        assert_eq!(extract_token(&parts), None);
    }

    #[test]
    fn empty_query_token_is_ignored() {
        let parts = parts("/api/cars?token=", Some("Bearer fallback"));
        assert_eq!(extract_token(&parts).as_deref(), Some("fallback"));
    }

    #[test]
    fn require_admin_rejects_plain_users() {
        let user = CurrentUser {
            id: 1,
            role: UserRole::User,
        };
        assert!(matches!(require_admin(&user), Err(AppError::Forbidden)));

        let admin = CurrentUser {
            id: 2,
            role: UserRole::Admin,
        };
        assert!(require_admin(&admin).is_ok());
    }
}
