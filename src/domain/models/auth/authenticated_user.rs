//! Request-scoped identity placed in the request extensions by
//! [`AuthMiddleware`](crate::middlewares::AuthMiddleware).
//!
//! Handlers behind a required-auth scope take [`AuthenticatedUser`] as an
//! argument; handlers behind an optional scope take [`OptionalUser`].
//!
//! ```rust,ignore
//! #[get("")]
//! pub async fn get_cart(user: AuthenticatedUser) -> Result<HttpResponse, AppError> {
//!     let cart = CartService::instance().get_cart(&user.object_id()?).await?;
//!     Ok(HttpResponse::Ok().json(ApiResponse::ok(cart)))
//! }
//! ```

use std::future::{ready, Ready};

use actix_web::{FromRequest, HttpMessage, HttpRequest};
use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

use crate::core::errors::AppError;
use crate::domain::entities::users::UserRole;
use crate::domain::token::TokenClaims;
use crate::utils::string_utils::parse_object_id;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthenticatedUser {
    pub user_id: String,
    pub email: String,
    pub user_name: String,
    pub role: UserRole,
}

impl AuthenticatedUser {
    pub fn is_admin(&self) -> bool {
        self.role == UserRole::Admin
    }

    pub fn object_id(&self) -> Result<ObjectId, AppError> {
        parse_object_id(&self.user_id, "user")
    }
}

impl From<TokenClaims> for AuthenticatedUser {
    fn from(claims: TokenClaims) -> Self {
        Self {
            user_id: claims.sub,
            email: claims.email,
            user_name: claims.user_name,
            role: claims.role,
        }
    }
}

impl FromRequest for AuthenticatedUser {
    type Error = AppError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut actix_web::dev::Payload) -> Self::Future {
        match req.extensions().get::<AuthenticatedUser>() {
            Some(user) => ready(Ok(user.clone())),
            None => ready(Err(AppError::AuthenticationError(
                "unauthorised user".to_string(),
            ))),
        }
    }
}

/// Identity for routes that work with or without a session.
#[derive(Debug, Clone)]
pub struct OptionalUser(pub Option<AuthenticatedUser>);

impl FromRequest for OptionalUser {
    type Error = AppError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut actix_web::dev::Payload) -> Self::Future {
        let user = req.extensions().get::<AuthenticatedUser>().cloned();
        ready(Ok(OptionalUser(user)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::test::TestRequest;

    fn customer() -> AuthenticatedUser {
        AuthenticatedUser {
            user_id: ObjectId::new().to_hex(),
            email: "layla@example.com".to_string(),
            user_name: "layla".to_string(),
            role: UserRole::User,
        }
    }

    #[actix_web::test]
    async fn test_extractor_reads_extensions() {
        let req = TestRequest::default().to_http_request();
        req.extensions_mut().insert(customer());

        let user = AuthenticatedUser::extract(&req).await.unwrap();
        assert_eq!(user.user_name, "layla");
        assert!(user.object_id().is_ok());
        assert!(!user.is_admin());
    }

    #[actix_web::test]
    async fn test_extractor_without_session_is_unauthorised() {
        let req = TestRequest::default().to_http_request();

        assert!(matches!(
            AuthenticatedUser::extract(&req).await,
            Err(AppError::AuthenticationError(_))
        ));
        assert!(OptionalUser::extract(&req).await.unwrap().0.is_none());
    }
}
