//! Free trial units: one per customer and perfume.

use std::sync::Arc;

use mongodb::bson::oid::ObjectId;

use singleton_macro::service;

use crate::core::errors::{AppError, AppResult};
use crate::domain::dto::samples::{SampleEligibilityResponse, SampleListQuery, SampleRequestResponse};
use crate::domain::entities::samples::{SampleRequest, SampleStatus};
use crate::repositories::products::ProductRepository;
use crate::repositories::samples::SampleRepository;
use crate::utils::string_utils::parse_object_id;

#[service(name = "sample")]
pub struct SampleService {
    sample_repo: Arc<SampleRepository>,
    product_repo: Arc<ProductRepository>,
}

impl SampleService {
    pub async fn eligibility(
        &self,
        user_id: &ObjectId,
        product_id: &str,
    ) -> AppResult<SampleEligibilityResponse> {
        let product_id = parse_object_id(product_id, "product")?;
        let product = self
            .product_repo
            .find_by_id(&product_id)
            .await?
            .filter(|product| product.is_active)
            .ok_or_else(|| AppError::NotFound("product not found".to_string()))?;

        if !product.sample_available {
            return Ok(SampleEligibilityResponse::ineligible(
                "no sample is offered for this product",
            ));
        }
        if self.sample_repo.exists(user_id, &product_id).await? {
            return Ok(SampleEligibilityResponse::ineligible(
                "you have already requested a sample of this product",
            ));
        }
        Ok(SampleEligibilityResponse::eligible())
    }

    /// Fails with 409 naming the first product the customer already sampled.
    pub async fn ensure_not_requested(
        &self,
        user_id: &ObjectId,
        products: &[(ObjectId, String)],
    ) -> AppResult<()> {
        for (product_id, title) in products {
            if self.sample_repo.exists(user_id, product_id).await? {
                return Err(AppError::ConflictError(format!(
                    "you have already requested a sample of {}",
                    title
                )));
            }
        }
        Ok(())
    }

    pub async fn record_for_order(
        &self,
        user_id: &ObjectId,
        order_id: &ObjectId,
        product_ids: &[ObjectId],
    ) -> AppResult<()> {
        let requests: Vec<SampleRequest> = product_ids
            .iter()
            .map(|product_id| SampleRequest::new(*user_id, *product_id, Some(*order_id)))
            .collect();
        self.sample_repo.create_many(&requests).await
    }

    pub async fn discard_for_order(&self, order_id: &ObjectId) -> AppResult<()> {
        let removed = self.sample_repo.delete_for_order(order_id).await?;
        log::debug!("Removed {} sample request(s) of order {}", removed, order_id);
        Ok(())
    }

    /// Keeps sample requests in step with the order that carries them.
    pub async fn sync_with_order(&self, order_id: &ObjectId, status: SampleStatus) -> AppResult<()> {
        self.sample_repo.update_status_for_order(order_id, status).await?;
        Ok(())
    }

    pub async fn list_mine(&self, user_id: &ObjectId) -> AppResult<Vec<SampleRequestResponse>> {
        let samples = self.sample_repo.list_for_user(user_id).await?;
        Ok(samples.into_iter().map(SampleRequestResponse::from).collect())
    }

    pub async fn list_all(&self, query: &SampleListQuery) -> AppResult<Vec<SampleRequestResponse>> {
        let status = match query.status.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
            Some(name) => Some(SampleStatus::from_name(name).ok_or_else(|| {
                AppError::ValidationError(format!("unknown sample status: {}", name))
            })?),
            None => None,
        };

        let samples = self.sample_repo.list(status).await?;
        Ok(samples.into_iter().map(SampleRequestResponse::from).collect())
    }

    pub async fn update_status(&self, id: &str, status: SampleStatus) -> AppResult<SampleRequestResponse> {
        let id = parse_object_id(id, "sample request")?;
        let sample = self
            .sample_repo
            .update_status(&id, status)
            .await?
            .ok_or_else(|| AppError::NotFound("sample request not found".to_string()))?;

        log::info!("Sample request {} is now {}", id, status.as_str());
        Ok(SampleRequestResponse::from(sample))
    }
}

