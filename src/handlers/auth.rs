//! Account endpoints under `/api/auth`.
//!
//! The session token is returned only as an HTTP-only cookie so the storefront
//! script never sees it; API clients may still send it back as a Bearer header.

use actix_web::cookie::{time::Duration, Cookie, SameSite};
use actix_web::{get, post, web, HttpResponse};
use validator::Validate;

use crate::config::CookieConfig;
use crate::core::errors::AppError;
use crate::domain::auth::AuthenticatedUser;
use crate::domain::dto::common::ApiResponse;
use crate::domain::dto::users::{LoginRequest, LoginResponse, RegisterRequest};
use crate::middlewares::AuthMiddleware;
use crate::services::auth::AuthService;

pub fn session_cookie(token: String, max_age_seconds: i64) -> Cookie<'static> {
    Cookie::build(CookieConfig::name(), token)
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(CookieConfig::secure())
        .max_age(Duration::seconds(max_age_seconds))
        .finish()
}

/// Cookie that makes the browser drop the session.
pub fn cleared_session_cookie() -> Cookie<'static> {
    let mut cookie = Cookie::build(CookieConfig::name(), "")
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(CookieConfig::secure())
        .finish();
    cookie.make_removal();
    cookie
}

#[post("/register")]
pub async fn register(payload: web::Json<RegisterRequest>) -> Result<HttpResponse, AppError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e.to_string()))?;

    let user = AuthService::instance().register(payload.into_inner()).await?;
    Ok(HttpResponse::Created().json(ApiResponse::with_message(user, "Registration successful")))
}

#[post("/login")]
pub async fn login(payload: web::Json<LoginRequest>) -> Result<HttpResponse, AppError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e.to_string()))?;

    let (user, issued) = AuthService::instance().login(payload.into_inner()).await?;
    let cookie = session_cookie(issued.token, issued.expires_in);

    Ok(HttpResponse::Ok().cookie(cookie).json(ApiResponse::with_message(
        LoginResponse {
            user,
            expires_in: issued.expires_in,
        },
        "Logged in successfully",
    )))
}

#[post("/logout")]
pub async fn logout() -> HttpResponse {
    HttpResponse::Ok()
        .cookie(cleared_session_cookie())
        .json(ApiResponse::message("Logged out successfully!"))
}

#[get("/check-auth", wrap = "AuthMiddleware::required()")]
pub async fn check_auth(user: AuthenticatedUser) -> Result<HttpResponse, AppError> {
    let profile = AuthService::instance().current_user(&user.user_id).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::with_message(profile, "Authenticated user!")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_cookie_flags() {
        let cookie = session_cookie("jwt".to_string(), 3600);
        assert_eq!(cookie.value(), "jwt");
        assert_eq!(cookie.http_only(), Some(true));
        assert_eq!(cookie.same_site(), Some(SameSite::Lax));
        assert_eq!(cookie.path(), Some("/"));
        assert_eq!(cookie.max_age(), Some(Duration::seconds(3600)));
    }

    #[test]
    fn test_cleared_cookie_expires_immediately() {
        let cookie = cleared_session_cookie();
        assert_eq!(cookie.value(), "");
        assert_eq!(cookie.max_age(), Some(Duration::ZERO));
    }
}
