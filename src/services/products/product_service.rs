//! # Catalog service
//!
//! Storefront browsing (active products only) and the back-office product
//! CRUD. Catalog reads are cached by [`ProductRepository`]; every write here
//! goes through it and therefore evicts the cache.

use std::sync::Arc;

use mongodb::bson::{oid::ObjectId, Bson, DateTime, Document};

use singleton_macro::service;

use crate::core::errors::{AppError, AppResult};
use crate::domain::dto::common::{PageQuery, Paginated};
use crate::domain::dto::products::{
    CreateProductRequest, ProductFilterQuery, ProductResponse, UpdateProductRequest,
};
use crate::domain::entities::products::{Gender, Product};
use crate::repositories::products::{BrandRepository, ProductFilter, ProductRepository, ProductSort};
use crate::utils::string_utils::{clean_optional_string, parse_object_id, split_csv};

#[service(name = "product")]
pub struct ProductService {
    product_repo: Arc<ProductRepository>,
    brand_repo: Arc<BrandRepository>,
}

/// Turns the catalog query string into a repository filter.
pub(crate) fn build_filter(query: &ProductFilterQuery, include_inactive: bool) -> AppResult<ProductFilter> {
    let brands = split_csv(query.brand.as_deref())
        .iter()
        .map(|id| parse_object_id(id, "brand"))
        .collect::<AppResult<Vec<ObjectId>>>()?;

    let gender = match query.gender.as_deref().map(str::trim).filter(|g| !g.is_empty()) {
        Some(name) => Some(
            Gender::from_name(name)
                .ok_or_else(|| AppError::ValidationError(format!("unknown gender: {}", name)))?,
        ),
        None => None,
    };

    if let (Some(min), Some(max)) = (query.min_price, query.max_price) {
        if min > max {
            return Err(AppError::ValidationError(
                "min_price cannot be greater than max_price".to_string(),
            ));
        }
    }

    Ok(ProductFilter {
        categories: split_csv(query.category.as_deref()),
        brands,
        gender,
        min_price: query.min_price,
        max_price: query.max_price,
        in_stock: query.in_stock.unwrap_or(false),
        include_inactive,
    })
}

/// `$set` document for a partial product update.
pub(crate) fn update_document(request: &UpdateProductRequest, brand: Option<ObjectId>) -> Document {
    let mut fields = Document::new();

    if let Some(title) = &request.title {
        fields.insert("title", title.trim());
    }
    if let Some(description) = &request.description {
        fields.insert("description", description.trim());
    }
    if let Some(category) = &request.category {
        fields.insert("category", category.trim().to_lowercase());
    }
    if let Some(brand) = brand {
        fields.insert("brand_id", brand);
    }
    if let Some(price) = request.price {
        fields.insert("price", price);
    }
    if let Some(sale_price) = request.sale_price {
        fields.insert("sale_price", sale_price);
    }
    if let Some(stock) = request.total_stock {
        fields.insert("total_stock", stock);
    }
    if let Some(images) = &request.images {
        let images: Vec<Bson> = images.iter().map(|url| Bson::String(url.clone())).collect();
        fields.insert("images", images);
    }
    if let Some(volume) = request.volume_ml {
        fields.insert("volume_ml", volume);
    }
    if let Some(concentration) = clean_optional_string(request.concentration.clone()) {
        fields.insert("concentration", concentration);
    }
    if let Some(gender) = request.gender {
        fields.insert("gender", gender.as_str());
    }
    if let Some(sample_available) = request.sample_available {
        fields.insert("sample_available", sample_available);
    }
    if let Some(is_active) = request.is_active {
        fields.insert("is_active", is_active);
    }
    fields
}

impl ProductService {
    async fn resolve_brand(&self, brand: Option<&str>) -> AppResult<Option<ObjectId>> {
        let Some(raw) = brand.map(str::trim).filter(|b| !b.is_empty()) else {
            return Ok(None);
        };
        let id = parse_object_id(raw, "brand")?;
        if self.brand_repo.find_by_id(&id).await?.is_none() {
            return Err(AppError::NotFound("brand not found".to_string()));
        }
        Ok(Some(id))
    }

    async fn page(&self, query: &ProductFilterQuery, include_inactive: bool) -> AppResult<Paginated<ProductResponse>> {
        let filter = build_filter(query, include_inactive)?;
        let sort = ProductSort::parse(query.sort_by.as_deref());
        let window = PageQuery {
            page: query.page,
            limit: query.limit,
        }
        .window();

        let page = self.product_repo.list(&filter, sort, window).await?;
        Ok(page.map(ProductResponse::from))
    }

    /// Storefront catalog page.
    pub async fn list_filtered(&self, query: &ProductFilterQuery) -> AppResult<Paginated<ProductResponse>> {
        self.page(query, false).await
    }

    /// Back-office listing, including disabled products.
    pub async fn list_all(&self, query: &ProductFilterQuery) -> AppResult<Paginated<ProductResponse>> {
        self.page(query, true).await
    }

    pub async fn get_details(&self, id: &str) -> AppResult<ProductResponse> {
        let id = parse_object_id(id, "product")?;
        self.product_repo
            .find_by_id(&id)
            .await?
            .filter(|product| product.is_active)
            .map(ProductResponse::from)
            .ok_or_else(|| AppError::NotFound("product not found".to_string()))
    }

    pub async fn search(&self, keyword: &str) -> AppResult<Vec<ProductResponse>> {
        let keyword = keyword.trim();
        if keyword.is_empty() {
            return Err(AppError::ValidationError(
                "keyword is required and must be a string".to_string(),
            ));
        }

        let products = self.product_repo.search(keyword).await?;
        Ok(products.into_iter().map(ProductResponse::from).collect())
    }

    pub async fn create(&self, request: CreateProductRequest) -> AppResult<ProductResponse> {
        let brand_id = self.resolve_brand(request.brand.as_deref()).await?;
        let now = DateTime::now();

        let product = Product {
            id: None,
            title: request.title.trim().to_string(),
            description: request.description.trim().to_string(),
            category: request.category.trim().to_lowercase(),
            brand_id,
            price: request.price,
            sale_price: request.sale_price,
            total_stock: request.total_stock,
            images: request.images,
            volume_ml: request.volume_ml,
            concentration: clean_optional_string(request.concentration),
            gender: request.gender,
            sample_available: request.sample_available,
            is_active: request.is_active.unwrap_or(true),
            average_review: 0.0,
            created_at: now,
            updated_at: now,
        };

        let created = self.product_repo.create(product).await?;
        log::info!("Product added: {} ({:?})", created.title, created.id);
        Ok(ProductResponse::from(created))
    }

    pub async fn update(&self, id: &str, request: UpdateProductRequest) -> AppResult<ProductResponse> {
        let id = parse_object_id(id, "product")?;
        let existing = self
            .product_repo
            .find_by_id(&id)
            .await?
            .ok_or_else(|| AppError::NotFound("product not found".to_string()))?;

        let price = request.price.unwrap_or(existing.price);
        let sale_price = request.sale_price.unwrap_or(existing.sale_price);
        if sale_price > 0.0 && sale_price >= price {
            return Err(AppError::ValidationError(
                "sale price must be lower than the price".to_string(),
            ));
        }

        let brand_id = self.resolve_brand(request.brand.as_deref()).await?;
        let fields = update_document(&request, brand_id);
        if fields.is_empty() {
            return Ok(ProductResponse::from(existing));
        }

        let updated = self
            .product_repo
            .update_fields(&id, fields)
            .await?
            .ok_or_else(|| AppError::NotFound("product not found".to_string()))?;

        log::info!("Product updated: {}", id);
        Ok(ProductResponse::from(updated))
    }

    pub async fn delete(&self, id: &str) -> AppResult<()> {
        let id = parse_object_id(id, "product")?;
        if !self.product_repo.delete(&id).await? {
            return Err(AppError::NotFound("product not found".to_string()));
        }
        log::info!("Product deleted: {}", id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mongodb::bson::doc;

    #[test]
    fn test_build_filter_parses_lists() {
        let brand = ObjectId::new();
        let query = ProductFilterQuery {
            category: Some("floral, woody".into()),
            brand: Some(brand.to_hex()),
            gender: Some("Women".into()),
            in_stock: Some(true),
            ..Default::default()
        };

        let filter = build_filter(&query, false).unwrap();
        assert_eq!(filter.categories, vec!["floral", "woody"]);
        assert_eq!(filter.brands, vec![brand]);
        assert_eq!(filter.gender, Some(Gender::Women));
        assert!(filter.in_stock);
        assert!(!filter.include_inactive);
    }

    #[test]
    fn test_build_filter_rejects_bad_input() {
        let bad_brand = ProductFilterQuery { brand: Some("nope".into()), ..Default::default() };
        assert!(matches!(build_filter(&bad_brand, false), Err(AppError::ValidationError(_))));

        let bad_gender = ProductFilterQuery { gender: Some("kids".into()), ..Default::default() };
        assert!(build_filter(&bad_gender, false).is_err());

        let inverted = ProductFilterQuery {
            min_price: Some(300.0),
            max_price: Some(100.0),
            ..Default::default()
        };
        assert!(build_filter(&inverted, false).is_err());
    }

    #[test]
    fn test_update_document_only_touches_given_fields() {
        let request = UpdateProductRequest {
            category: Some(" Oriental ".into()),
            total_stock: Some(7),
            gender: Some(Gender::Men),
            ..Default::default()
        };

        assert_eq!(
            update_document(&request, None),
            doc! { "category": "oriental", "total_stock": 7_i64, "gender": "men" }
        );
        assert!(update_document(&UpdateProductRequest::default(), None).is_empty());
    }
}
