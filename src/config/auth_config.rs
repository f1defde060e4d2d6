//! Authentication settings: JWT signing and the session cookie.

use std::env;

use super::data_config::Environment;

pub struct JwtConfig;

impl JwtConfig {
    pub fn secret() -> String {
        env::var("JWT_SECRET").unwrap_or_else(|_| {
            log::warn!("JWT_SECRET not set, using default (not secure for production!)");
            "perfume-shop-dev-secret".to_string()
        })
    }

    pub fn expiration_hours() -> i64 {
        env::var("JWT_EXPIRATION_HOURS")
            .ok()
            .and_then(|raw| raw.parse().ok())
            .filter(|hours| *hours > 0)
            .unwrap_or(24)
    }
}

/// The HTTP-only cookie carrying the access token.
pub struct CookieConfig;

impl CookieConfig {
    pub fn name() -> String {
        env::var("AUTH_COOKIE_NAME").unwrap_or_else(|_| "token".to_string())
    }

    /// `Secure` is only set in production so that local http development works.
    pub fn secure() -> bool {
        match env::var("AUTH_COOKIE_SECURE") {
            Ok(raw) => matches!(raw.to_lowercase().as_str(), "1" | "true" | "yes"),
            Err(_) => Environment::current().is_production(),
        }
    }

    pub fn max_age_seconds() -> i64 {
        JwtConfig::expiration_hours() * 3600
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cookie_defaults() {
        if env::var("AUTH_COOKIE_NAME").is_err() {
            assert_eq!(CookieConfig::name(), "token");
        }
        if env::var("JWT_EXPIRATION_HOURS").is_err() {
            assert_eq!(JwtConfig::expiration_hours(), 24);
            assert_eq!(CookieConfig::max_age_seconds(), 24 * 3600);
        }
    }
}
