//! Back-office catalog management under `/api/admin/products`.

use actix_multipart::Multipart;
use actix_web::{delete, get, post, put, web, HttpResponse};
use validator::Validate;

use crate::core::errors::AppError;
use crate::domain::dto::common::ApiResponse;
use crate::domain::dto::products::{CreateProductRequest, ProductFilterQuery, UpdateProductRequest};
use crate::domain::models::uploads::UploadCategory;
use crate::services::products::ProductService;
use crate::services::uploads::UploadService;

/// Multipart image upload; the returned `url` goes into the product's `images`.
#[post("/upload-image")]
pub async fn upload_product_image(payload: Multipart) -> Result<HttpResponse, AppError> {
    let file = UploadService::instance()
        .store_first(UploadCategory::Products, payload)
        .await?;
    Ok(HttpResponse::Created().json(ApiResponse::ok(file)))
}

#[post("/add")]
pub async fn add_product(payload: web::Json<CreateProductRequest>) -> Result<HttpResponse, AppError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e.to_string()))?;

    let product = ProductService::instance().create(payload.into_inner()).await?;
    Ok(HttpResponse::Created().json(ApiResponse::with_message(product, "Product added")))
}

/// Lists inactive products too.
#[get("/get")]
pub async fn fetch_all_products(
    query: web::Query<ProductFilterQuery>,
) -> Result<HttpResponse, AppError> {
    query
        .validate()
        .map_err(|e| AppError::ValidationError(e.to_string()))?;

    let products = ProductService::instance().list_all(&query).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok(products)))
}

#[put("/edit/{id}")]
pub async fn edit_product(
    path: web::Path<String>,
    payload: web::Json<UpdateProductRequest>,
) -> Result<HttpResponse, AppError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e.to_string()))?;

    let product = ProductService::instance()
        .update(&path, payload.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(ApiResponse::with_message(product, "Product updated")))
}

#[delete("/delete/{id}")]
pub async fn delete_product(path: web::Path<String>) -> Result<HttpResponse, AppError> {
    ProductService::instance().delete(&path).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::message("Product deleted")))
}
