use serde::Serialize;

use crate::domain::entities::products::{Brand, Gender, Product};
use crate::utils::format_utils::to_rfc3339;

#[derive(Debug, Clone, Serialize)]
pub struct ProductResponse {
    pub id: String,
    pub title: String,
    pub description: String,
    pub category: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub brand: Option<String>,
    pub price: f64,
    pub sale_price: f64,
    /// Price actually charged at checkout.
    pub effective_price: f64,
    pub total_stock: i64,
    pub in_stock: bool,
    pub images: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub volume_ml: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub concentration: Option<String>,
    pub gender: Gender,
    pub sample_available: bool,
    pub is_active: bool,
    pub average_review: f64,
    pub created_at: String,
    pub updated_at: String,
}

impl From<Product> for ProductResponse {
    fn from(product: Product) -> Self {
        let effective_price = product.effective_price();
        Self {
            id: product.id_string().unwrap_or_default(),
            brand: product.brand_id.map(|id| id.to_hex()),
            in_stock: product.total_stock > 0,
            effective_price,
            title: product.title,
            description: product.description,
            category: product.category,
            price: product.price,
            sale_price: product.sale_price,
            total_stock: product.total_stock,
            images: product.images,
            volume_ml: product.volume_ml,
            concentration: product.concentration,
            gender: product.gender,
            sample_available: product.sample_available,
            is_active: product.is_active,
            average_review: product.average_review,
            created_at: to_rfc3339(product.created_at),
            updated_at: to_rfc3339(product.updated_at),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct BrandResponse {
    pub id: String,
    pub name: String,
    pub slug: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub logo: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub is_active: bool,
}

impl From<Brand> for BrandResponse {
    fn from(brand: Brand) -> Self {
        Self {
            id: brand.id.map(|id| id.to_hex()).unwrap_or_default(),
            name: brand.name,
            slug: brand.slug,
            logo: brand.logo,
            description: brand.description,
            is_active: brand.is_active,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::products::product::fixtures;

    #[test]
    fn test_response_exposes_effective_price() {
        let mut product = fixtures::product("Amber Nights", 200.0, 0);
        product.sale_price = 150.0;

        let response = ProductResponse::from(product);
        assert_eq!(response.effective_price, 150.0);
        assert!(!response.in_stock);
    }
}
