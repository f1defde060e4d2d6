//! Shop account entity (`users` collection).

use mongodb::bson::{oid::ObjectId, DateTime};
use serde::{Deserialize, Serialize};

/// Access level of an account. Only `Admin` passes the back-office guard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    #[default]
    User,
    Admin,
}

impl UserRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::User => "user",
            UserRole::Admin => "admin",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_lowercase().as_str() {
            "user" => Some(UserRole::User),
            "admin" => Some(UserRole::Admin),
            _ => None,
        }
    }
}

/// Suspended accounts can no longer log in or place orders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserStatus {
    #[default]
    Active,
    Suspended,
}

impl UserStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserStatus::Active => "active",
            UserStatus::Suspended => "suspended",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_lowercase().as_str() {
            "active" => Some(UserStatus::Active),
            "suspended" => Some(UserStatus::Suspended),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,

    pub user_name: String,

    /// Always stored lower-cased; unique index `email_unique`.
    pub email: String,

    /// bcrypt hash, never the plain password.
    pub password_hash: String,

    #[serde(default)]
    pub role: UserRole,

    #[serde(default)]
    pub status: UserStatus,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_login_at: Option<DateTime>,

    pub created_at: DateTime,
    pub updated_at: DateTime,
}

impl User {
    /// A freshly registered customer account.
    pub fn new(user_name: String, email: String, password_hash: String) -> Self {
        let now = DateTime::now();
        Self {
            id: None,
            user_name,
            email: email.trim().to_lowercase(),
            password_hash,
            role: UserRole::User,
            status: UserStatus::Active,
            phone: None,
            last_login_at: None,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn id_string(&self) -> Option<String> {
        self.id.as_ref().map(|id| id.to_hex())
    }

    pub fn is_admin(&self) -> bool {
        self.role == UserRole::Admin
    }

    pub fn is_active(&self) -> bool {
        self.status == UserStatus::Active
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_user_defaults() {
        let user = User::new("Noura".into(), "  Noura@Example.COM ".into(), "$2b$04$hash".into());

        assert_eq!(user.email, "noura@example.com");
        assert_eq!(user.role, UserRole::User);
        assert!(user.is_active());
        assert!(!user.is_admin());
        assert!(user.id_string().is_none());
    }

    #[test]
    fn test_role_and_status_names() {
        assert_eq!(UserRole::from_name("ADMIN"), Some(UserRole::Admin));
        assert_eq!(UserRole::from_name("owner"), None);
        assert_eq!(UserStatus::from_name("suspended"), Some(UserStatus::Suspended));
        assert_eq!(UserRole::Admin.as_str(), "admin");
        assert_eq!(serde_json::to_string(&UserStatus::Suspended).unwrap(), "\"suspended\"");
    }

    #[test]
    fn test_missing_role_deserializes_as_user() {
        let document = mongodb::bson::doc! {
            "user_name": "legacy",
            "email": "legacy@example.com",
            "password_hash": "x",
            "created_at": DateTime::now(),
            "updated_at": DateTime::now(),
        };
        let user: User = mongodb::bson::from_document(document).unwrap();
        assert_eq!(user.role, UserRole::User);
        assert_eq!(user.status, UserStatus::Active);
    }
}
