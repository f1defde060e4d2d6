//! Cart bodies and the populated cart view.
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::domain::entities::products::Product;
use crate::utils::format_utils::round_money;

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct AddToCartRequest {
    #[serde(alias = "productId")]
    #[validate(length(equal = 24, message = "invalid product id"))]
    pub product_id: String,

    #[validate(range(min = 1, max = 100, message = "quantity must be between 1 and 100"))]
    pub quantity: i64,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateCartQuantityRequest {
    #[serde(alias = "productId")]
    #[validate(length(equal = 24, message = "invalid product id"))]
    pub product_id: String,

    #[validate(range(min = 1, max = 100, message = "quantity must be between 1 and 100"))]
    pub quantity: i64,
}

/// One cart line joined with the current product data.
#[derive(Debug, Clone, Serialize)]
pub struct CartLineResponse {
    pub product_id: String,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    pub price: f64,
    pub sale_price: f64,
    pub effective_price: f64,
    pub total_stock: i64,
    pub quantity: i64,
    pub line_total: f64,
}

impl CartLineResponse {
    pub fn new(product: &Product, quantity: i64) -> Self {
        let effective_price = product.effective_price();
        Self {
            product_id: product.id_string().unwrap_or_default(),
            title: product.title.clone(),
            image: product.primary_image(),
            price: product.price,
            sale_price: product.sale_price,
            effective_price,
            total_stock: product.total_stock,
            quantity,
            line_total: round_money(effective_price * quantity as f64),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct CartResponse {
    pub items: Vec<CartLineResponse>,
    pub item_count: i64,
    pub subtotal: f64,
}

impl CartResponse {
    pub fn from_lines(items: Vec<CartLineResponse>) -> Self {
        let item_count = items.iter().map(|line| line.quantity).sum();
        let subtotal = round_money(items.iter().map(|line| line.line_total).sum());
        Self {
            items,
            item_count,
            subtotal,
        }
    }

    pub fn empty() -> Self {
        Self::from_lines(Vec::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::products::product::fixtures::product;

    #[test]
    fn test_cart_totals_use_sale_price() {
        let mut musk = product("Musk", 100.0, 10);
        musk.sale_price = 80.0;
        let amber = product("Amber", 45.5, 3);

        let cart = CartResponse::from_lines(vec![
            CartLineResponse::new(&musk, 2),
            CartLineResponse::new(&amber, 1),
        ]);

        assert_eq!(cart.item_count, 3);
        assert_eq!(cart.subtotal, 205.5);
    }

    #[test]
    fn test_quantity_bounds() {
        let request = AddToCartRequest {
            product_id: "65f1a2b3c4d5e6f708192a3b".into(),
            quantity: 0,
        };
        assert!(request.validate().is_err());
    }
}
