//! Shopping cart of the signed-in customer (`/api/shop/cart`).

use actix_web::{delete, get, post, put, web, HttpResponse};
use validator::Validate;

use crate::core::errors::AppError;
use crate::domain::auth::AuthenticatedUser;
use crate::domain::dto::carts::{AddToCartRequest, UpdateCartQuantityRequest};
use crate::domain::dto::common::ApiResponse;
use crate::services::carts::CartService;

#[post("/add")]
pub async fn add_to_cart(
    user: AuthenticatedUser,
    payload: web::Json<AddToCartRequest>,
) -> Result<HttpResponse, AppError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e.to_string()))?;

    let cart = CartService::instance()
        .add(&user.object_id()?, payload.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok(cart)))
}

#[get("")]
pub async fn fetch_cart(user: AuthenticatedUser) -> Result<HttpResponse, AppError> {
    let cart = CartService::instance().get(&user.object_id()?).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok(cart)))
}

#[put("/update-quantity")]
pub async fn update_cart_quantity(
    user: AuthenticatedUser,
    payload: web::Json<UpdateCartQuantityRequest>,
) -> Result<HttpResponse, AppError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e.to_string()))?;

    let cart = CartService::instance()
        .update_quantity(&user.object_id()?, payload.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok(cart)))
}

#[delete("/{product_id}")]
pub async fn remove_cart_item(
    user: AuthenticatedUser,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let cart = CartService::instance()
        .remove(&user.object_id()?, &path)
        .await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok(cart)))
}

#[delete("")]
pub async fn clear_cart(user: AuthenticatedUser) -> Result<HttpResponse, AppError> {
    CartService::instance().clear(&user.object_id()?).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::message("Cart cleared")))
}
