//! Request-level work of [`AuthMiddleware`](super::AuthMiddleware).

use std::rc::Rc;

use actix_web::body::EitherBody;
use actix_web::dev::{forward_ready, Service, ServiceRequest, ServiceResponse};
use actix_web::{Error, HttpMessage, HttpResponse};
use futures_util::future::LocalBoxFuture;

use crate::config::CookieConfig;
use crate::core::errors::AppError;
use crate::domain::auth::{AuthMode, AuthenticatedUser, RequiredRole};
use crate::services::auth::TokenService;

pub struct AuthMiddlewareService<S> {
    pub service: Rc<S>,
    pub mode: AuthMode,
    pub required_role: Option<RequiredRole>,
}

fn reject<B>(req: ServiceRequest, response: HttpResponse) -> ServiceResponse<EitherBody<B>> {
    let (req, _) = req.into_parts();
    ServiceResponse::new(req, response).map_into_right_body()
}

impl<S, B> Service<ServiceRequest> for AuthMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, actix_web::Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = self.service.clone();
        let mode = self.mode.clone();
        let required_role = self.required_role.clone();

        Box::pin(async move {
            let auth_result = authenticate(&req);

            match (&mode, auth_result) {
                (AuthMode::Required, Err(err)) => {
                    log::warn!("Rejected {} {}: {}", req.method(), req.path(), err);
                    let response = HttpResponse::Unauthorized().json(serde_json::json!({
                        "success": false,
                        "message": "Unauthorised user!"
                    }));
                    return Ok(reject(req, response));
                }
                (AuthMode::Required, Ok(user)) => {
                    if let Some(required) = &required_role {
                        if !required.is_satisfied(user.role) {
                            log::warn!(
                                "User {} ({}) denied access to {}",
                                user.user_id,
                                user.role.as_str(),
                                req.path()
                            );
                            let response = HttpResponse::Forbidden().json(serde_json::json!({
                                "success": false,
                                "message": "Access denied"
                            }));
                            return Ok(reject(req, response));
                        }
                    }
                    log::debug!("Authenticated user {}", user.user_id);
                    req.extensions_mut().insert(user);
                }
                (AuthMode::Optional, Ok(user)) => {
                    req.extensions_mut().insert(user);
                }
                (AuthMode::Optional, Err(_)) => {}
            }

            let res = service.call(req).await?;
            Ok(res.map_into_left_body())
        })
    }
}

/// Session cookie first, then the `Authorization` header.
fn authenticate(req: &ServiceRequest) -> Result<AuthenticatedUser, AppError> {
    let token_service = TokenService::instance();

    let token = match req.cookie(&CookieConfig::name()) {
        Some(cookie) if !cookie.value().is_empty() => cookie.value().to_string(),
        _ => {
            let header = req
                .headers()
                .get("Authorization")
                .and_then(|h| h.to_str().ok())
                .ok_or_else(|| AppError::AuthenticationError("no session".to_string()))?;
            token_service.extract_bearer_token(header)?.to_string()
        }
    };

    let claims = token_service.verify(&token)?;
    Ok(AuthenticatedUser::from(claims))
}
