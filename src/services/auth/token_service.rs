//! HS256 session tokens.
//!
//! The token travels in the HTTP-only session cookie (or a `Bearer` header
//! for API clients) and carries enough identity that most requests never
//! touch the `users` collection.

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, errors::ErrorKind, DecodingKey, EncodingKey, Header, Validation};

use singleton_macro::service;

use crate::config::JwtConfig;
use crate::core::errors::{AppError, ErrorContext};
use crate::domain::entities::users::User;
use crate::domain::token::{IssuedToken, TokenClaims};

#[service(name = "token")]
pub struct TokenService;

impl TokenService {
    /// Signs a session token for `user` with `JWT_SECRET`.
    ///
    /// # Returns
    ///
    /// The token and its expiry, `JWT_EXPIRATION_HOURS` from now.
    ///
    /// # Errors
    ///
    /// `InternalError` when the user has no id yet or signing fails.
    ///
    /// # Examples
    ///
    /// ```rust,ignore
    /// let issued = TokenService::instance().issue(&user)?;
    /// let claims = TokenService::instance().verify(&issued.token)?;
    /// assert_eq!(claims.sub, user.id_string().unwrap());
    /// ```
    pub fn issue(&self, user: &User) -> Result<IssuedToken, AppError> {
        issue_with(user, &JwtConfig::secret(), JwtConfig::expiration_hours())
    }

    /// Checks signature and expiry. Any failure is an `AuthenticationError`.
    pub fn verify(&self, token: &str) -> Result<TokenClaims, AppError> {
        verify_with(token, &JwtConfig::secret())
    }

    /// `"Bearer abc"` → `"abc"`.
    pub fn extract_bearer_token<'a>(&self, auth_header: &'a str) -> Result<&'a str, AppError> {
        auth_header
            .strip_prefix("Bearer ")
            .map(str::trim)
            .filter(|token| !token.is_empty())
            .ok_or_else(|| AppError::AuthenticationError("invalid authorization header".to_string()))
    }
}

fn issue_with(user: &User, secret: &str, hours: i64) -> Result<IssuedToken, AppError> {
    let now = Utc::now();
    let expiration = now + Duration::hours(hours);

    let claims = TokenClaims {
        sub: user
            .id_string()
            .ok_or_else(|| AppError::InternalError("user has no id".to_string()))?,
        email: user.email.clone(),
        user_name: user.user_name.clone(),
        role: user.role,
        iat: now.timestamp(),
        exp: expiration.timestamp(),
    };

    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .context("failed to sign token")?;

    Ok(IssuedToken {
        token,
        expires_in: hours * 3600,
    })
}

fn verify_with(token: &str, secret: &str) -> Result<TokenClaims, AppError> {
    decode::<TokenClaims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .map(|data| data.claims)
    .map_err(|e| match e.kind() {
        ErrorKind::ExpiredSignature => AppError::AuthenticationError("token has expired".to_string()),
        _ => AppError::AuthenticationError("invalid token".to_string()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::users::UserRole;
    use mongodb::bson::oid::ObjectId;

    fn user() -> User {
        let mut user = User::new("admin".into(), "admin@example.com".into(), "hash".into());
        user.id = Some(ObjectId::new());
        user.role = UserRole::Admin;
        user
    }

    #[test]
    fn test_issue_and_verify_roundtrip() {
        let user = user();
        let issued = issue_with(&user, "test-secret", 2).unwrap();
        assert_eq!(issued.expires_in, 7200);

        let claims = verify_with(&issued.token, "test-secret").unwrap();
        assert_eq!(Some(claims.sub), user.id_string());
        assert_eq!(claims.role, UserRole::Admin);
        assert_eq!(claims.email, "admin@example.com");
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let issued = issue_with(&user(), "test-secret", 2).unwrap();
        assert!(matches!(
            verify_with(&issued.token, "other-secret"),
            Err(AppError::AuthenticationError(_))
        ));
    }

    #[test]
    fn test_expired_token_rejected() {
        // beyond the default 60s leeway
        let issued = issue_with(&user(), "test-secret", -1).unwrap();
        match verify_with(&issued.token, "test-secret") {
            Err(AppError::AuthenticationError(msg)) => assert!(msg.contains("expired")),
            other => panic!("expected expiry error, got {:?}", other),
        }
    }

    #[test]
    fn test_user_without_id_cannot_get_token() {
        let user = User::new("x".into(), "x@example.com".into(), "hash".into());
        assert!(issue_with(&user, "s", 1).is_err());
    }

    #[test]
    fn test_bearer_extraction() {
        let service = TokenService;
        assert_eq!(service.extract_bearer_token("Bearer abc.def").unwrap(), "abc.def");
        assert!(service.extract_bearer_token("Basic abc").is_err());
        assert!(service.extract_bearer_token("Bearer ").is_err());
    }
}
