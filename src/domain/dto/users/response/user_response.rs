use serde::Serialize;

use crate::domain::entities::users::{User, UserRole, UserStatus};
use crate::utils::format_utils::{to_rfc3339, to_rfc3339_opt};

/// Public view of a [`User`]; the password hash never leaves the server.
#[derive(Debug, Clone, Serialize)]
pub struct UserResponse {
    pub id: String,
    pub user_name: String,
    pub email: String,
    pub role: UserRole,
    pub status: UserStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_login_at: Option<String>,
    pub created_at: String,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id_string().unwrap_or_default(),
            user_name: user.user_name,
            email: user.email,
            role: user.role,
            status: user.status,
            phone: user.phone,
            last_login_at: to_rfc3339_opt(user.last_login_at),
            created_at: to_rfc3339(user.created_at),
        }
    }
}

/// Body of a successful login.
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub user: UserResponse,
    /// Seconds until the session cookie expires.
    pub expires_in: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_response_hides_password() {
        let user = User::new("layla".into(), "layla@example.com".into(), "$2b$04$hash".into());
        let value = serde_json::to_value(UserResponse::from(user)).unwrap();

        assert!(value.get("password_hash").is_none());
        assert_eq!(value["role"], "user");
        assert_eq!(value["status"], "active");
    }
}
