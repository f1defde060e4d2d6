//! Saved delivery addresses (`/api/shop/address`).

use actix_web::{delete, get, post, put, web, HttpResponse};
use validator::Validate;

use crate::core::errors::AppError;
use crate::domain::auth::AuthenticatedUser;
use crate::domain::dto::addresses::{AddressRequest, UpdateAddressRequest};
use crate::domain::dto::common::ApiResponse;
use crate::services::addresses::AddressService;

#[post("/add")]
pub async fn add_address(
    user: AuthenticatedUser,
    payload: web::Json<AddressRequest>,
) -> Result<HttpResponse, AppError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e.to_string()))?;

    let address = AddressService::instance()
        .add(&user.object_id()?, payload.into_inner())
        .await?;
    Ok(HttpResponse::Created().json(ApiResponse::ok(address)))
}

#[get("/get")]
pub async fn fetch_addresses(user: AuthenticatedUser) -> Result<HttpResponse, AppError> {
    let addresses = AddressService::instance().list(&user.object_id()?).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok(addresses)))
}

#[put("/update/{id}")]
pub async fn edit_address(
    user: AuthenticatedUser,
    path: web::Path<String>,
    payload: web::Json<UpdateAddressRequest>,
) -> Result<HttpResponse, AppError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e.to_string()))?;

    let address = AddressService::instance()
        .update(&user.object_id()?, &path, payload.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok(address)))
}

#[delete("/delete/{id}")]
pub async fn delete_address(
    user: AuthenticatedUser,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    AddressService::instance()
        .delete(&user.object_id()?, &path)
        .await?;
    Ok(HttpResponse::Ok().json(ApiResponse::message("Address deleted")))
}
