//! Coupons: checkout-time validation for customers and back-office management.

use actix_web::{delete, get, patch, post, put, web, HttpResponse};
use validator::Validate;

use crate::core::errors::AppError;
use crate::domain::auth::AuthenticatedUser;
use crate::domain::dto::common::{ApiResponse, PageQuery};
use crate::domain::dto::coupons::{CreateCouponRequest, UpdateCouponRequest, ValidateCouponRequest};
use crate::services::coupons::CouponService;

/// `POST /api/shop/coupons/validate` with `{code, subtotal}`.
#[post("/validate")]
pub async fn validate_coupon(
    user: AuthenticatedUser,
    payload: web::Json<ValidateCouponRequest>,
) -> Result<HttpResponse, AppError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e.to_string()))?;

    let result = CouponService::instance()
        .validate(&user.object_id()?, payload.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(ApiResponse::with_message(result, "Coupon applied")))
}

#[post("")]
pub async fn create_coupon(payload: web::Json<CreateCouponRequest>) -> Result<HttpResponse, AppError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e.to_string()))?;

    let coupon = CouponService::instance().create(payload.into_inner()).await?;
    Ok(HttpResponse::Created().json(ApiResponse::with_message(coupon, "Coupon created")))
}

#[get("")]
pub async fn list_coupons(query: web::Query<PageQuery>) -> Result<HttpResponse, AppError> {
    let coupons = CouponService::instance().list(query.into_inner()).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok(coupons)))
}

#[get("/{id}")]
pub async fn get_coupon(path: web::Path<String>) -> Result<HttpResponse, AppError> {
    let coupon = CouponService::instance().get(&path).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok(coupon)))
}

#[put("/{id}")]
pub async fn update_coupon(
    path: web::Path<String>,
    payload: web::Json<UpdateCouponRequest>,
) -> Result<HttpResponse, AppError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e.to_string()))?;

    let coupon = CouponService::instance()
        .update(&path, payload.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(ApiResponse::with_message(coupon, "Coupon updated")))
}

#[patch("/{id}/toggle")]
pub async fn toggle_coupon(path: web::Path<String>) -> Result<HttpResponse, AppError> {
    let coupon = CouponService::instance().toggle(&path).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok(coupon)))
}

#[delete("/{id}")]
pub async fn delete_coupon(path: web::Path<String>) -> Result<HttpResponse, AppError> {
    CouponService::instance().delete(&path).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::message("Coupon deleted")))
}
