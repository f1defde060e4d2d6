//! Perfume houses: public list for the filter sidebar plus back-office CRUD.

use actix_multipart::Multipart;
use actix_web::{delete, get, post, put, web, HttpResponse};
use validator::Validate;

use crate::core::errors::AppError;
use crate::domain::dto::common::ApiResponse;
use crate::domain::dto::products::{CreateBrandRequest, UpdateBrandRequest};
use crate::domain::models::uploads::UploadCategory;
use crate::services::products::BrandService;
use crate::services::uploads::UploadService;

#[get("")]
pub async fn list_brands() -> Result<HttpResponse, AppError> {
    let brands = BrandService::instance().list_active().await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok(brands)))
}

#[get("")]
pub async fn list_all_brands() -> Result<HttpResponse, AppError> {
    let brands = BrandService::instance().list_all().await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok(brands)))
}

#[post("")]
pub async fn create_brand(payload: web::Json<CreateBrandRequest>) -> Result<HttpResponse, AppError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e.to_string()))?;

    let brand = BrandService::instance().create(payload.into_inner()).await?;
    Ok(HttpResponse::Created().json(ApiResponse::with_message(brand, "Brand created")))
}

#[put("/{id}")]
pub async fn update_brand(
    path: web::Path<String>,
    payload: web::Json<UpdateBrandRequest>,
) -> Result<HttpResponse, AppError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e.to_string()))?;

    let brand = BrandService::instance()
        .update(&path, payload.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(ApiResponse::with_message(brand, "Brand updated")))
}

#[delete("/{id}")]
pub async fn delete_brand(path: web::Path<String>) -> Result<HttpResponse, AppError> {
    BrandService::instance().delete(&path).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::message("Brand deleted")))
}

#[post("/upload-logo")]
pub async fn upload_brand_logo(payload: Multipart) -> Result<HttpResponse, AppError> {
    let file = UploadService::instance()
        .store_first(UploadCategory::Brands, payload)
        .await?;
    Ok(HttpResponse::Created().json(ApiResponse::ok(file)))
}
