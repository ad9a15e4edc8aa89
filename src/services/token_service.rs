//! Token service - issues and verifies signed bearer tokens.
//!
//! Access tokens and password-reset tokens share one HMAC signing key but
//! carry disjoint claim shapes: an access token never deserializes as reset
//! claims and vice versa. Verification is stateless; claims are trusted
//! whenever the signature and expiry check out.

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::config::{Config, RESET_TOKEN_LIFESPAN_MINUTES};
use crate::domain::UserRole;
use crate::errors::AppResult;

/// Access token claims
#[derive(Debug, Serialize, Deserialize)]
pub struct AccessClaims {
    pub authorized: bool,
    pub user_id: i64,
    pub user_role: String,
    pub exp: i64,
}

/// Password-reset token claims.
///
/// `deny_unknown_fields` rejects access tokens here even though both token
/// kinds are signed with the same key.
#[derive(Debug, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ResetClaims {
    pub user_id: i64,
    pub exp: i64,
}

/// Issues and verifies tokens with a process-wide signing key.
///
/// Constructed once at startup from `Config`; a missing or short secret is a
/// startup failure, never a request-time one.
pub struct TokenService {
    encoding: EncodingKey,
    decoding: DecodingKey,
    lifespan_hours: i64,
}

impl TokenService {
    pub fn new(secret: &[u8], lifespan_hours: i64) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
            lifespan_hours,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.api_secret_bytes(), config.token_lifespan_hours)
    }

    /// Issue an access token carrying identity and role
    pub fn issue_access_token(&self, user_id: i64, role: &UserRole) -> AppResult<String> {
        let claims = AccessClaims {
            authorized: true,
            user_id,
            user_role: role.to_string(),
            exp: (Utc::now() + Duration::hours(self.lifespan_hours)).timestamp(),
        };

        Ok(encode(&Header::default(), &claims, &self.encoding)?)
    }

    /// Issue a short-lived password-reset token
    pub fn issue_reset_token(&self, user_id: i64) -> AppResult<String> {
        let claims = ResetClaims {
            user_id,
            exp: (Utc::now() + Duration::minutes(RESET_TOKEN_LIFESPAN_MINUTES)).timestamp(),
        };

        Ok(encode(&Header::default(), &claims, &self.encoding)?)
    }

    /// Verify signature and expiry of an access token
    pub fn verify_access_token(&self, token: &str) -> AppResult<AccessClaims> {
        let data = decode::<AccessClaims>(token, &self.decoding, &Validation::default())?;
        Ok(data.claims)
    }

    /// Verify signature and expiry of a reset token
    pub fn verify_reset_token(&self, token: &str) -> AppResult<ResetClaims> {
        let data = decode::<ResetClaims>(token, &self.decoding, &Validation::default())?;
        Ok(data.claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::AppError;

    const SECRET: &[u8] = b"test-secret-key-for-testing-only-32chars";

    fn service() -> TokenService {
        TokenService::new(SECRET, 1)
    }

    #[test]
    fn access_token_round_trips() {
        let ts = service();
        let token = ts.issue_access_token(42, &UserRole::Admin).unwrap();
        let claims = ts.verify_access_token(&token).unwrap();

        assert!(claims.authorized);
        assert_eq!(claims.user_id, 42);
        assert_eq!(claims.user_role, "ADMIN");
        assert_eq!(UserRole::from(claims.user_role.as_str()), UserRole::Admin);
    }

    #[test]
    fn reset_token_round_trips() {
        let ts = service();
        let token = ts.issue_reset_token(7).unwrap();
        let claims = ts.verify_reset_token(&token).unwrap();

        assert_eq!(claims.user_id, 7);
    }

    #[test]
    fn expired_token_is_rejected_even_with_valid_signature() {
        let ts = service();
        let claims = AccessClaims {
            authorized: true,
            user_id: 1,
            user_role: "USER".to_string(),
            // Well past the default validation leeway
            exp: (Utc::now() - Duration::hours(2)).timestamp(),
        };
        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(SECRET),
        )
        .unwrap();

        assert!(matches!(
            ts.verify_access_token(&token),
            Err(AppError::Jwt(_))
        ));
    }

    #[test]
    fn token_signed_with_other_key_is_rejected() {
        let ts = service();
        let other = TokenService::new(b"another-secret-key-with-32-chars!!", 1);
        let token = other.issue_access_token(1, &UserRole::User).unwrap();

        assert!(ts.verify_access_token(&token).is_err());
    }

    #[test]
    fn malformed_token_is_rejected() {
        let ts = service();
        assert!(ts.verify_access_token("not-a-token").is_err());
        assert!(ts.verify_reset_token("").is_err());
    }

    #[test]
    fn access_token_is_not_a_reset_token() {
        let ts = service();
        let access = ts.issue_access_token(1, &UserRole::User).unwrap();

        assert!(ts.verify_reset_token(&access).is_err());
    }

    #[test]
    fn reset_token_is_not_an_access_token() {
        let ts = service();
        let reset = ts.issue_reset_token(1).unwrap();

        assert!(ts.verify_access_token(&reset).is_err());
    }
}
