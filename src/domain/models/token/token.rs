use serde::{Deserialize, Serialize};

use crate::domain::entities::users::UserRole;

/// JWT payload of the session cookie.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenClaims {
    /// User id (hex ObjectId).
    pub sub: String,
    pub email: String,
    pub user_name: String,
    pub role: UserRole,
    pub iat: i64,
    pub exp: i64,
}

/// Signed token plus its lifetime in seconds.
#[derive(Debug, Clone)]
pub struct IssuedToken {
    pub token: String,
    pub expires_in: i64,
}
