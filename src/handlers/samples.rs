//! Free samples: eligibility and history for customers, review for admins.

use actix_web::{get, put, web, HttpResponse};

use crate::core::errors::AppError;
use crate::domain::auth::AuthenticatedUser;
use crate::domain::dto::common::ApiResponse;
use crate::domain::dto::samples::{SampleListQuery, UpdateSampleStatusRequest};
use crate::services::samples::SampleService;

#[get("/eligibility/{product_id}")]
pub async fn check_sample_eligibility(
    user: AuthenticatedUser,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let eligibility = SampleService::instance()
        .eligibility(&user.object_id()?, &path)
        .await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok(eligibility)))
}

#[get("")]
pub async fn list_my_samples(user: AuthenticatedUser) -> Result<HttpResponse, AppError> {
    let samples = SampleService::instance()
        .list_mine(&user.object_id()?)
        .await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok(samples)))
}

#[get("")]
pub async fn list_sample_requests(
    query: web::Query<SampleListQuery>,
) -> Result<HttpResponse, AppError> {
    let samples = SampleService::instance().list_all(&query).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok(samples)))
}

#[put("/{id}/status")]
pub async fn update_sample_status(
    path: web::Path<String>,
    payload: web::Json<UpdateSampleStatusRequest>,
) -> Result<HttpResponse, AppError> {
    let sample = SampleService::instance()
        .update_status(&path, payload.status)
        .await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok(sample)))
}
