//! Catalog entities (`products` collection).

use mongodb::bson::{oid::ObjectId, DateTime};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Gender {
    Men,
    Women,
    #[default]
    Unisex,
}

impl Gender {
    pub fn as_str(&self) -> &'static str {
        match self {
            Gender::Men => "men",
            Gender::Women => "women",
            Gender::Unisex => "unisex",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_lowercase().as_str() {
            "men" | "male" => Some(Gender::Men),
            "women" | "female" => Some(Gender::Women),
            "unisex" => Some(Gender::Unisex),
            _ => None,
        }
    }
}

/// A perfume offered in the shop.
///
/// `sale_price` of `0` means the product is not discounted; see
/// [`Product::effective_price`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub title: String,
    pub description: String,
    pub category: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub brand_id: Option<ObjectId>,
    pub price: f64,
    #[serde(default)]
    pub sale_price: f64,
    pub total_stock: i64,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub volume_ml: Option<i32>,
    /// EDP, EDT, Parfum, ...
    #[serde(skip_serializing_if = "Option::is_none")]
    pub concentration: Option<String>,
    #[serde(default)]
    pub gender: Gender,
    #[serde(default)]
    pub sample_available: bool,
    #[serde(default = "default_true")]
    pub is_active: bool,
    #[serde(default)]
    pub average_review: f64,
    pub created_at: DateTime,
    pub updated_at: DateTime,
}

fn default_true() -> bool {
    true
}

impl Product {
    pub fn id_string(&self) -> Option<String> {
        self.id.as_ref().map(|id| id.to_hex())
    }

    /// Unit price charged at checkout.
    pub fn effective_price(&self) -> f64 {
        if self.sale_price > 0.0 && self.sale_price < self.price {
            self.sale_price
        } else {
            self.price
        }
    }

    pub fn has_stock_for(&self, quantity: i64) -> bool {
        quantity > 0 && self.total_stock >= quantity
    }

    pub fn primary_image(&self) -> Option<String> {
        self.images.first().cloned()
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;

    pub fn product(title: &str, price: f64, stock: i64) -> Product {
        let now = DateTime::now();
        Product {
            id: Some(ObjectId::new()),
            title: title.to_string(),
            description: format!("{} eau de parfum", title),
            category: "oriental".to_string(),
            brand_id: None,
            price,
            sale_price: 0.0,
            total_stock: stock,
            images: vec![format!("/uploads/products/{}.jpg", title.to_lowercase())],
            volume_ml: Some(100),
            concentration: Some("EDP".to_string()),
            gender: Gender::Unisex,
            sample_available: false,
            is_active: true,
            average_review: 0.0,
            created_at: now,
            updated_at: now,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::fixtures::product;
    use super::*;

    #[test]
    fn test_effective_price_prefers_lower_sale_price() {
        let mut oud = product("Oud", 250.0, 5);
        assert_eq!(oud.effective_price(), 250.0);

        oud.sale_price = 199.0;
        assert_eq!(oud.effective_price(), 199.0);

        // a "sale" above list price is ignored
        oud.sale_price = 300.0;
        assert_eq!(oud.effective_price(), 250.0);
    }

    #[test]
    fn test_has_stock_for() {
        let musk = product("Musk", 90.0, 2);
        assert!(musk.has_stock_for(2));
        assert!(!musk.has_stock_for(3));
        assert!(!musk.has_stock_for(0));
    }

    #[test]
    fn test_gender_from_name() {
        assert_eq!(Gender::from_name("Women"), Some(Gender::Women));
        assert_eq!(Gender::from_name("male"), Some(Gender::Men));
        assert_eq!(Gender::from_name("kids"), None);
    }
}
