//! Customer checkout and order history (`/api/orders`).

use actix_multipart::Multipart;
use actix_web::{get, post, put, web, HttpResponse};
use validator::Validate;

use crate::core::errors::AppError;
use crate::domain::auth::AuthenticatedUser;
use crate::domain::dto::common::ApiResponse;
use crate::domain::dto::orders::CreateOrderRequest;
use crate::domain::models::uploads::UploadCategory;
use crate::services::orders::OrderService;
use crate::services::uploads::UploadService;

#[post("")]
pub async fn create_order(
    user: AuthenticatedUser,
    payload: web::Json<CreateOrderRequest>,
) -> Result<HttpResponse, AppError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e.to_string()))?;

    let order = OrderService::instance()
        .create(&user.object_id()?, payload.into_inner())
        .await?;
    Ok(HttpResponse::Created().json(ApiResponse::with_message(order, "Order placed")))
}

/// Bank-transfer receipt; the returned `file_name` goes into `payment_proof`.
#[post("/payment-proof")]
pub async fn upload_payment_proof(
    _user: AuthenticatedUser,
    payload: Multipart,
) -> Result<HttpResponse, AppError> {
    let file = UploadService::instance()
        .store_first(UploadCategory::Payments, payload)
        .await?;
    Ok(HttpResponse::Created().json(ApiResponse::ok(file)))
}

#[get("")]
pub async fn list_my_orders(user: AuthenticatedUser) -> Result<HttpResponse, AppError> {
    let orders = OrderService::instance()
        .list_for_user(&user.object_id()?)
        .await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok(orders)))
}

#[get("/{id}")]
pub async fn get_order_details(
    user: AuthenticatedUser,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let order = OrderService::instance().get_details(&user, &path).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok(order)))
}

#[put("/{id}/cancel")]
pub async fn cancel_order(
    user: AuthenticatedUser,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let order = OrderService::instance().cancel(&user, &path).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::with_message(order, "Order cancelled")))
}
