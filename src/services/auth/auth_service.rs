//! # Account registration and login
//!
//! Passwords are hashed with bcrypt using the per-environment cost from
//! [`PasswordConfig`]. Login failures never reveal whether the email exists.

use std::sync::Arc;
use std::time::Instant;

use singleton_macro::service;

use crate::config::PasswordConfig;
use crate::core::errors::{AppError, AppResult, ErrorContext};
use crate::domain::dto::users::{LoginRequest, RegisterRequest, UserResponse};
use crate::domain::entities::users::User;
use crate::domain::token::IssuedToken;
use crate::repositories::users::UserRepository;
use crate::services::auth::TokenService;
use crate::utils::string_utils::parse_object_id;

const INVALID_CREDENTIALS: &str = "invalid email or password";

#[service(name = "auth")]
pub struct AuthService {
    user_repo: Arc<UserRepository>,
    token_service: Arc<TokenService>,
}

impl AuthService {
    /// Creates a customer account. A taken email is a 409.
    pub async fn register(&self, request: RegisterRequest) -> AppResult<UserResponse> {
        let email = request.email.trim().to_lowercase();

        let hash_start = Instant::now();
        let password_hash = bcrypt::hash(&request.password, PasswordConfig::bcrypt_cost())
            .context("password hashing failed")?;
        log::debug!("Password hashing took: {:?}", hash_start.elapsed());

        let user = User::new(request.user_name.trim().to_string(), email, password_hash);
        let created = self.user_repo.create(user).await?;

        log::info!("New customer registered: {}", created.email);
        Ok(UserResponse::from(created))
    }

    /// Checks the credentials and issues a session token.
    pub async fn login(&self, request: LoginRequest) -> AppResult<(UserResponse, IssuedToken)> {
        let user = self
            .user_repo
            .find_by_email(&request.email)
            .await?
            .ok_or_else(|| {
                log::warn!("Login attempt for unknown email");
                AppError::AuthenticationError(INVALID_CREDENTIALS.to_string())
            })?;

        let verify_start = Instant::now();
        let valid = bcrypt::verify(&request.password, &user.password_hash)
            .context("password verification failed")?;
        log::debug!("Password verification took: {:?}", verify_start.elapsed());

        if !valid {
            log::warn!("Wrong password for {}", user.email);
            return Err(AppError::AuthenticationError(INVALID_CREDENTIALS.to_string()));
        }
        if !user.is_active() {
            log::warn!("Suspended account tried to log in: {}", user.email);
            return Err(AppError::AuthorizationError(
                "this account has been suspended".to_string(),
            ));
        }

        let token = self.token_service.issue(&user)?;
        if let Some(id) = user.id {
            self.user_repo.touch_last_login(&id).await?;
        }

        log::info!("User logged in: {}", user.email);
        Ok((UserResponse::from(user), token))
    }

    /// Current account of a session; a deleted account ends the session.
    pub async fn current_user(&self, user_id: &str) -> AppResult<UserResponse> {
        let id = parse_object_id(user_id, "user")?;
        let user = self
            .user_repo
            .find_by_id(&id)
            .await?
            .ok_or_else(|| AppError::AuthenticationError("unauthorised user".to_string()))?;

        if !user.is_active() {
            return Err(AppError::AuthorizationError(
                "this account has been suspended".to_string(),
            ));
        }
        Ok(UserResponse::from(user))
    }
}

