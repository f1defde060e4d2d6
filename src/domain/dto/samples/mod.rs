use serde::{Deserialize, Serialize};

use crate::domain::entities::samples::{SampleRequest, SampleStatus};
use crate::utils::format_utils::to_rfc3339;

#[derive(Debug, Clone, Serialize)]
pub struct SampleEligibilityResponse {
    pub eligible: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl SampleEligibilityResponse {
    pub fn eligible() -> Self {
        Self {
            eligible: true,
            reason: None,
        }
    }

    pub fn ineligible(reason: impl Into<String>) -> Self {
        Self {
            eligible: false,
            reason: Some(reason.into()),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SampleRequestResponse {
    pub id: String,
    pub user_id: String,
    pub product_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order_id: Option<String>,
    pub status: SampleStatus,
    pub created_at: String,
}

impl From<SampleRequest> for SampleRequestResponse {
    fn from(sample: SampleRequest) -> Self {
        Self {
            id: sample.id.map(|id| id.to_hex()).unwrap_or_default(),
            user_id: sample.user_id.to_hex(),
            product_id: sample.product_id.to_hex(),
            order_id: sample.order_id.map(|id| id.to_hex()),
            status: sample.status,
            created_at: to_rfc3339(sample.created_at),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct UpdateSampleStatusRequest {
    pub status: SampleStatus,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SampleListQuery {
    pub status: Option<String>,
}
