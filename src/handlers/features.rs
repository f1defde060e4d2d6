//! Homepage banners.

use actix_multipart::Multipart;
use actix_web::{delete, get, post, web, HttpResponse};
use validator::Validate;

use crate::core::errors::AppError;
use crate::domain::dto::common::ApiResponse;
use crate::domain::dto::features::CreateFeatureRequest;
use crate::domain::models::uploads::UploadCategory;
use crate::services::features::FeatureService;
use crate::services::uploads::UploadService;

#[get("/get")]
pub async fn get_feature_images() -> Result<HttpResponse, AppError> {
    let features = FeatureService::instance().list_active().await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok(features)))
}

#[post("/add")]
pub async fn add_feature_image(
    payload: web::Json<CreateFeatureRequest>,
) -> Result<HttpResponse, AppError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e.to_string()))?;

    let feature = FeatureService::instance().add(payload.into_inner()).await?;
    Ok(HttpResponse::Created().json(ApiResponse::ok(feature)))
}

#[delete("/{id}")]
pub async fn delete_feature_image(path: web::Path<String>) -> Result<HttpResponse, AppError> {
    FeatureService::instance().delete(&path).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::message("Banner deleted")))
}

#[post("/upload-image")]
pub async fn upload_feature_image(payload: Multipart) -> Result<HttpResponse, AppError> {
    let file = UploadService::instance()
        .store_first(UploadCategory::Features, payload)
        .await?;
    Ok(HttpResponse::Created().json(ApiResponse::ok(file)))
}
