//! Session check for protected scopes.
//!
//! Reads the JWT from the session cookie (or an `Authorization: Bearer`
//! header), verifies it, and stores an [`AuthenticatedUser`] in the request
//! extensions.
//!
//! ```rust,ignore
//! web::scope("/api/admin/orders")
//!     .wrap(AuthMiddleware::admin())
//!     .configure(admin_orders::configure)
//! ```
//!
//! [`AuthenticatedUser`]: crate::domain::auth::AuthenticatedUser

use std::future::{ready, Ready};
use std::rc::Rc;

use actix_web::{
    body::EitherBody,
    dev::{Service, ServiceRequest, ServiceResponse, Transform},
    Error, Result,
};

use crate::domain::auth::{AuthMode, RequiredRole};
use crate::domain::entities::users::UserRole;
use crate::middlewares::auth_inner::AuthMiddlewareService;

pub struct AuthMiddleware {
    mode: AuthMode,
    required_role: Option<RequiredRole>,
}

impl AuthMiddleware {
    pub fn new(mode: AuthMode) -> Self {
        Self {
            mode,
            required_role: None,
        }
    }

    pub fn new_with_role(mode: AuthMode, required_role: RequiredRole) -> Self {
        Self {
            mode,
            required_role: Some(required_role),
        }
    }

    /// Rejects anonymous requests with 401.
    pub fn required() -> Self {
        Self::new(AuthMode::Required)
    }

    /// Attaches the user when a valid session exists, never rejects.
    pub fn optional() -> Self {
        Self::new(AuthMode::Optional)
    }

    /// 401 without a session, 403 for non-admins.
    pub fn admin() -> Self {
        Self::new_with_role(AuthMode::Required, RequiredRole::Single(UserRole::Admin))
    }
}

impl<S, B> Transform<S, ServiceRequest> for AuthMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Transform = AuthMiddlewareService<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(AuthMiddlewareService {
            service: Rc::new(service),
            mode: self.mode.clone(),
            required_role: self.required_role.clone(),
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{http::StatusCode, test, web, App, HttpResponse};
    use mongodb::bson::oid::ObjectId;

    use crate::config::CookieConfig;
    use crate::domain::auth::AuthenticatedUser;
    use crate::domain::entities::users::User;
    use crate::services::auth::TokenService;

    fn token_for(role: UserRole) -> String {
        let mut user = User::new(
            "Reem".to_string(),
            "reem@example.com".to_string(),
            "hash".to_string(),
        );
        user.id = Some(ObjectId::new());
        user.role = role;
        TokenService::instance().issue(&user).unwrap().token
    }

    async fn whoami(user: AuthenticatedUser) -> HttpResponse {
        HttpResponse::Ok().body(user.user_name)
    }

    #[actix_web::test]
    async fn test_required_scope_rejects_anonymous() {
        let app = test::init_service(
            App::new().service(
                web::scope("/cart")
                    .wrap(AuthMiddleware::required())
                    .route("", web::get().to(whoami)),
            ),
        )
        .await;

        let res = test::call_service(&app, test::TestRequest::get().uri("/cart").to_request()).await;
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

        let body: serde_json::Value = test::read_body_json(res).await;
        assert_eq!(body["success"], false);
    }

    #[actix_web::test]
    async fn test_cookie_session_is_accepted() {
        let app = test::init_service(
            App::new().service(
                web::scope("/cart")
                    .wrap(AuthMiddleware::required())
                    .route("", web::get().to(whoami)),
            ),
        )
        .await;

        let cookie = actix_web::cookie::Cookie::new(CookieConfig::name(), token_for(UserRole::User));
        let req = test::TestRequest::get().uri("/cart").cookie(cookie).to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::OK);
        assert_eq!(test::read_body(res).await, "Reem");
    }

    #[actix_web::test]
    async fn test_admin_scope_forbids_customers() {
        let app = test::init_service(
            App::new().service(
                web::scope("/admin")
                    .wrap(AuthMiddleware::admin())
                    .route("", web::get().to(whoami)),
            ),
        )
        .await;

        let customer = test::TestRequest::get()
            .uri("/admin")
            .insert_header(("Authorization", format!("Bearer {}", token_for(UserRole::User))))
            .to_request();
        assert_eq!(test::call_service(&app, customer).await.status(), StatusCode::FORBIDDEN);

        let admin = test::TestRequest::get()
            .uri("/admin")
            .insert_header(("Authorization", format!("Bearer {}", token_for(UserRole::Admin))))
            .to_request();
        assert_eq!(test::call_service(&app, admin).await.status(), StatusCode::OK);
    }
}
