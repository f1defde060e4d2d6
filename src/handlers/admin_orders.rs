//! Back-office order management (`/api/admin/orders`).

use actix_web::{get, put, web, HttpResponse};
use validator::Validate;

use crate::core::errors::AppError;
use crate::domain::dto::common::ApiResponse;
use crate::domain::dto::orders::{OrderListQuery, UpdateOrderStatusRequest, UpdatePaymentStatusRequest};
use crate::services::orders::OrderService;

/// `?status=pending&page=1&limit=20`
#[get("")]
pub async fn list_all_orders(query: web::Query<OrderListQuery>) -> Result<HttpResponse, AppError> {
    let orders = OrderService::instance().list_all(&query).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok(orders)))
}

#[get("/{id}")]
pub async fn get_order(path: web::Path<String>) -> Result<HttpResponse, AppError> {
    let order = OrderService::instance().get(&path).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok(order)))
}

#[put("/{id}/status")]
pub async fn update_order_status(
    path: web::Path<String>,
    payload: web::Json<UpdateOrderStatusRequest>,
) -> Result<HttpResponse, AppError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e.to_string()))?;

    let order = OrderService::instance()
        .update_status(&path, &payload.status)
        .await?;
    Ok(HttpResponse::Ok().json(ApiResponse::with_message(order, "Order status updated")))
}

#[put("/{id}/payment")]
pub async fn update_payment_status(
    path: web::Path<String>,
    payload: web::Json<UpdatePaymentStatusRequest>,
) -> Result<HttpResponse, AppError> {
    let order = OrderService::instance()
        .update_payment_status(&path, payload.status)
        .await?;
    Ok(HttpResponse::Ok().json(ApiResponse::with_message(order, "Payment status updated")))
}
