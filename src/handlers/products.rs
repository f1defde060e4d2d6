//! Storefront catalog: listing with filters, details and keyword search.

use actix_web::{get, web, HttpResponse};
use validator::Validate;

use crate::core::errors::AppError;
use crate::domain::dto::common::ApiResponse;
use crate::domain::dto::products::ProductFilterQuery;
use crate::services::products::ProductService;

/// `GET /api/shop/products/get?category=men,women&brand=...&sortBy=price-lowtohigh`
#[get("/get")]
pub async fn get_filtered_products(
    query: web::Query<ProductFilterQuery>,
) -> Result<HttpResponse, AppError> {
    query
        .validate()
        .map_err(|e| AppError::ValidationError(e.to_string()))?;

    let products = ProductService::instance().list_filtered(&query).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok(products)))
}

#[get("/get/{id}")]
pub async fn get_product_details(path: web::Path<String>) -> Result<HttpResponse, AppError> {
    let product = ProductService::instance().get_details(&path).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok(product)))
}

#[get("/{keyword}")]
pub async fn search_products(path: web::Path<String>) -> Result<HttpResponse, AppError> {
    let products = ProductService::instance().search(&path).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok(products)))
}
