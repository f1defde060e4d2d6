//! Homepage banners.

use std::sync::Arc;

use singleton_macro::service;

use crate::core::errors::{AppError, AppResult};
use crate::domain::dto::features::{CreateFeatureRequest, FeatureResponse};
use crate::domain::entities::features::Feature;
use crate::repositories::features::FeatureRepository;
use crate::utils::string_utils::{clean_optional_string, parse_object_id, validate_required_string};

#[service(name = "feature")]
pub struct FeatureService {
    feature_repo: Arc<FeatureRepository>,
}

impl FeatureService {
    pub async fn list_active(&self) -> AppResult<Vec<FeatureResponse>> {
        let features = self.feature_repo.list_active().await?;
        Ok(features.into_iter().map(FeatureResponse::from).collect())
    }

    pub async fn add(&self, request: CreateFeatureRequest) -> AppResult<FeatureResponse> {
        let image = validate_required_string(&request.image, "image")?;
        let feature = Feature::new(
            image,
            clean_optional_string(request.title),
            clean_optional_string(request.link),
            request.sort_order,
        );

        let created = self.feature_repo.create(feature).await?;
        log::info!("Banner added: {}", created.image);
        Ok(FeatureResponse::from(created))
    }

    pub async fn delete(&self, id: &str) -> AppResult<()> {
        let id = parse_object_id(id, "banner")?;
        if !self.feature_repo.delete(&id).await? {
            return Err(AppError::NotFound("banner not found".to_string()));
        }
        Ok(())
    }
}

