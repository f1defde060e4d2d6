//! Brand (perfume house) management.

use std::sync::Arc;

use mongodb::bson::Document;

use singleton_macro::service;

use crate::core::errors::{AppError, AppResult};
use crate::domain::dto::products::{BrandResponse, CreateBrandRequest, UpdateBrandRequest};
use crate::domain::entities::products::Brand;
use crate::repositories::products::{BrandRepository, ProductRepository};
use crate::utils::string_utils::{clean_optional_string, parse_object_id, slugify};

#[service(name = "brand")]
pub struct BrandService {
    brand_repo: Arc<BrandRepository>,
    product_repo: Arc<ProductRepository>,
}

impl BrandService {
    pub async fn list_active(&self) -> AppResult<Vec<BrandResponse>> {
        let brands = self.brand_repo.list(false).await?;
        Ok(brands.into_iter().map(BrandResponse::from).collect())
    }

    pub async fn list_all(&self) -> AppResult<Vec<BrandResponse>> {
        let brands = self.brand_repo.list(true).await?;
        Ok(brands.into_iter().map(BrandResponse::from).collect())
    }

    pub async fn create(&self, request: CreateBrandRequest) -> AppResult<BrandResponse> {
        let brand = Brand::new(
            request.name.trim().to_string(),
            clean_optional_string(request.logo),
            clean_optional_string(request.description),
        );
        let created = self.brand_repo.create(brand).await?;
        log::info!("Brand created: {}", created.name);
        Ok(BrandResponse::from(created))
    }

    pub async fn update(&self, id: &str, request: UpdateBrandRequest) -> AppResult<BrandResponse> {
        let id = parse_object_id(id, "brand")?;

        let mut fields = Document::new();
        if let Some(name) = request.name.as_deref().map(str::trim) {
            fields.insert("name", name);
            fields.insert("slug", slugify(name));
        }
        if let Some(logo) = clean_optional_string(request.logo) {
            fields.insert("logo", logo);
        }
        if let Some(description) = clean_optional_string(request.description) {
            fields.insert("description", description);
        }
        if let Some(is_active) = request.is_active {
            fields.insert("is_active", is_active);
        }

        let updated = self
            .brand_repo
            .update_fields(&id, fields)
            .await?
            .ok_or_else(|| AppError::NotFound("brand not found".to_string()))?;
        Ok(BrandResponse::from(updated))
    }

    /// Refused while any product still points at the brand.
    pub async fn delete(&self, id: &str) -> AppResult<()> {
        let id = parse_object_id(id, "brand")?;

        let in_use = self.product_repo.count_by_brand(&id).await?;
        if in_use > 0 {
            return Err(AppError::ConflictError(format!(
                "brand is still used by {} product(s)",
                in_use
            )));
        }
        if !self.brand_repo.delete(&id).await? {
            return Err(AppError::NotFound("brand not found".to_string()));
        }
        log::info!("Brand deleted: {}", id);
        Ok(())
    }
}

