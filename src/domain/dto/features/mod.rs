use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::domain::entities::features::Feature;

/// Body of `POST /api/admin/features/add`.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateFeatureRequest {
    /// URL returned by `POST /api/admin/features/upload-image`.
    #[validate(length(min = 1, max = 500, message = "image is required"))]
    pub image: String,
    #[validate(length(max = 120, message = "title is too long"))]
    pub title: Option<String>,
    #[validate(length(max = 500, message = "link is too long"))]
    pub link: Option<String>,
    #[serde(default)]
    pub sort_order: i32,
}

#[derive(Debug, Clone, Serialize)]
pub struct FeatureResponse {
    pub id: String,
    pub image: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
    pub sort_order: i32,
}

impl From<Feature> for FeatureResponse {
    fn from(feature: Feature) -> Self {
        Self {
            id: feature.id.map(|id| id.to_hex()).unwrap_or_default(),
            image: feature.image,
            title: feature.title,
            link: feature.link,
            sort_order: feature.sort_order,
        }
    }
}
