use serde::Deserialize;
use validator::{Validate, ValidationError};

use crate::domain::entities::products::Gender;

/// Body of `POST /api/admin/products/add`.
#[derive(Debug, Clone, Deserialize, Validate)]
#[validate(schema(function = "validate_sale_price"))]
pub struct CreateProductRequest {
    #[validate(length(min = 1, max = 200, message = "title is required"))]
    pub title: String,

    #[serde(default)]
    #[validate(length(max = 5000, message = "description is too long"))]
    pub description: String,

    #[validate(length(min = 1, max = 100, message = "category is required"))]
    pub category: String,

    /// Brand id (hex ObjectId).
    pub brand: Option<String>,

    #[validate(range(min = 0.0, message = "price cannot be negative"))]
    pub price: f64,

    #[serde(default)]
    #[validate(range(min = 0.0, message = "sale price cannot be negative"))]
    pub sale_price: f64,

    #[validate(range(min = 0, message = "stock cannot be negative"))]
    pub total_stock: i64,

    /// URLs returned by the upload endpoint.
    #[serde(default)]
    pub images: Vec<String>,

    #[validate(range(min = 1, max = 10000, message = "volume must be between 1 and 10000 ml"))]
    pub volume_ml: Option<i32>,

    pub concentration: Option<String>,

    #[serde(default)]
    pub gender: Gender,

    #[serde(default)]
    pub sample_available: bool,

    pub is_active: Option<bool>,
}

fn validate_sale_price(request: &CreateProductRequest) -> Result<(), ValidationError> {
    check_sale_price(Some(request.price), Some(request.sale_price))
}

/// Body of `PUT /api/admin/products/edit/{id}`; absent fields are left untouched.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[validate(schema(function = "validate_partial_sale_price"))]
pub struct UpdateProductRequest {
    #[validate(length(min = 1, max = 200, message = "title cannot be empty"))]
    pub title: Option<String>,
    #[validate(length(max = 5000, message = "description is too long"))]
    pub description: Option<String>,
    #[validate(length(min = 1, max = 100, message = "category cannot be empty"))]
    pub category: Option<String>,
    pub brand: Option<String>,
    #[validate(range(min = 0.0, message = "price cannot be negative"))]
    pub price: Option<f64>,
    #[validate(range(min = 0.0, message = "sale price cannot be negative"))]
    pub sale_price: Option<f64>,
    #[validate(range(min = 0, message = "stock cannot be negative"))]
    pub total_stock: Option<i64>,
    pub images: Option<Vec<String>>,
    #[validate(range(min = 1, max = 10000, message = "volume must be between 1 and 10000 ml"))]
    pub volume_ml: Option<i32>,
    pub concentration: Option<String>,
    pub gender: Option<Gender>,
    pub sample_available: Option<bool>,
    pub is_active: Option<bool>,
}

fn validate_partial_sale_price(request: &UpdateProductRequest) -> Result<(), ValidationError> {
    check_sale_price(request.price, request.sale_price)
}

fn check_sale_price(price: Option<f64>, sale_price: Option<f64>) -> Result<(), ValidationError> {
    match (price, sale_price) {
        (Some(price), Some(sale)) if sale > 0.0 && sale >= price => Err(ValidationError::new(
            "sale_price_too_high",
        )
        .with_message("sale price must be lower than the price".into())),
        _ => Ok(()),
    }
}

/// Catalog filters: `?category=a,b&brand=id1,id2&gender=women&min_price=&max_price=&in_stock=true&sort_by=price-lowtohigh&page=&limit=`.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct ProductFilterQuery {
    pub category: Option<String>,
    pub brand: Option<String>,
    pub gender: Option<String>,
    #[validate(range(min = 0.0, message = "min_price cannot be negative"))]
    pub min_price: Option<f64>,
    #[validate(range(min = 0.0, message = "max_price cannot be negative"))]
    pub max_price: Option<f64>,
    pub in_stock: Option<bool>,
    #[serde(alias = "sortBy")]
    pub sort_by: Option<String>,
    pub page: Option<u64>,
    pub limit: Option<u64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_request() -> CreateProductRequest {
        serde_json::from_value(serde_json::json!({
            "title": "Oud Royal",
            "category": "oriental",
            "price": 250.0,
            "total_stock": 10
        }))
        .unwrap()
    }

    #[test]
    fn test_create_defaults() {
        let request = create_request();
        assert!(request.validate().is_ok());
        assert_eq!(request.gender, Gender::Unisex);
        assert_eq!(request.sale_price, 0.0);
        assert!(request.images.is_empty());
    }

    #[test]
    fn test_sale_price_must_be_below_price() {
        let request = CreateProductRequest { sale_price: 300.0, ..create_request() };
        assert!(request.validate().is_err());

        let request = CreateProductRequest { sale_price: 199.0, ..create_request() };
        assert!(request.validate().is_ok());
    }

    #[test]
    fn test_negative_stock_rejected() {
        let request = CreateProductRequest { total_stock: -1, ..create_request() };
        let errors = request.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("total_stock"));
    }

    #[test]
    fn test_partial_update_only_checks_present_pair() {
        let request = UpdateProductRequest { sale_price: Some(500.0), ..Default::default() };
        assert!(request.validate().is_ok());

        let request = UpdateProductRequest {
            price: Some(100.0),
            sale_price: Some(120.0),
            ..Default::default()
        };
        assert!(request.validate().is_err());
    }
}
