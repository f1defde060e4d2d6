//! Customer accounts as seen by the back office (`/api/admin/users`).

use actix_web::{delete, get, put, web, HttpResponse};
use validator::Validate;

use crate::core::errors::AppError;
use crate::domain::auth::AuthenticatedUser;
use crate::domain::dto::common::ApiResponse;
use crate::domain::dto::users::{UpdateRoleRequest, UpdateStatusRequest, UserListQuery};
use crate::services::users::UserService;

/// `?search=sara&page=1&limit=20`, matching name or email.
#[get("")]
pub async fn list_users(query: web::Query<UserListQuery>) -> Result<HttpResponse, AppError> {
    query
        .validate()
        .map_err(|e| AppError::ValidationError(e.to_string()))?;

    let users = UserService::instance().list(query.into_inner()).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok(users)))
}

#[get("/{id}")]
pub async fn get_user(path: web::Path<String>) -> Result<HttpResponse, AppError> {
    let user = UserService::instance().get(&path).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok(user)))
}

#[put("/{id}/role")]
pub async fn update_user_role(
    admin: AuthenticatedUser,
    path: web::Path<String>,
    payload: web::Json<UpdateRoleRequest>,
) -> Result<HttpResponse, AppError> {
    let user = UserService::instance()
        .update_role(&admin, &path, payload.role)
        .await?;
    Ok(HttpResponse::Ok().json(ApiResponse::with_message(user, "Role updated")))
}

#[put("/{id}/status")]
pub async fn update_user_status(
    admin: AuthenticatedUser,
    path: web::Path<String>,
    payload: web::Json<UpdateStatusRequest>,
) -> Result<HttpResponse, AppError> {
    let user = UserService::instance()
        .update_status(&admin, &path, payload.status)
        .await?;
    Ok(HttpResponse::Ok().json(ApiResponse::with_message(user, "Status updated")))
}

#[delete("/{id}")]
pub async fn delete_user(
    admin: AuthenticatedUser,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    UserService::instance().delete(&admin, &path).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::message("User deleted")))
}
