//! Shopping cart (`carts` collection, one document per user).

use mongodb::bson::{oid::ObjectId, DateTime};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartItem {
    pub product_id: ObjectId,
    pub quantity: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Cart {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub user_id: ObjectId,
    #[serde(default)]
    pub items: Vec<CartItem>,
    pub created_at: DateTime,
    pub updated_at: DateTime,
}

impl Cart {
    pub fn new(user_id: ObjectId) -> Self {
        let now = DateTime::now();
        Self {
            id: None,
            user_id,
            items: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn quantity_of(&self, product_id: &ObjectId) -> i64 {
        self.items
            .iter()
            .find(|item| &item.product_id == product_id)
            .map(|item| item.quantity)
            .unwrap_or(0)
    }

    /// Adds `quantity` units, merging with an existing line. Returns the new line quantity.
    pub fn add(&mut self, product_id: ObjectId, quantity: i64) -> i64 {
        let merged = match self.items.iter_mut().find(|item| item.product_id == product_id) {
            Some(existing) => {
                existing.quantity += quantity;
                existing.quantity
            }
            None => {
                self.items.push(CartItem { product_id, quantity });
                quantity
            }
        };
        self.touch();
        merged
    }

    /// Replaces the quantity of an existing line; `false` if the product is not in the cart.
    pub fn set_quantity(&mut self, product_id: &ObjectId, quantity: i64) -> bool {
        match self.items.iter_mut().find(|item| &item.product_id == product_id) {
            Some(existing) => {
                existing.quantity = quantity;
                self.touch();
                true
            }
            None => false,
        }
    }

    pub fn remove(&mut self, product_id: &ObjectId) -> bool {
        let before = self.items.len();
        self.items.retain(|item| &item.product_id != product_id);
        let removed = self.items.len() != before;
        if removed {
            self.touch();
        }
        removed
    }

    pub fn clear(&mut self) {
        self.items.clear();
        self.touch();
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    fn touch(&mut self) {
        self.updated_at = DateTime::now();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_merges_same_product() {
        let mut cart = Cart::new(ObjectId::new());
        let amber = ObjectId::new();

        assert_eq!(cart.add(amber, 2), 2);
        assert_eq!(cart.add(amber, 1), 3);
        assert_eq!(cart.items.len(), 1);
        assert_eq!(cart.quantity_of(&amber), 3);
    }

    #[test]
    fn test_set_quantity_and_remove() {
        let mut cart = Cart::new(ObjectId::new());
        let rose = ObjectId::new();
        let vetiver = ObjectId::new();
        cart.add(rose, 1);

        assert!(cart.set_quantity(&rose, 4));
        assert!(!cart.set_quantity(&vetiver, 4));
        assert_eq!(cart.quantity_of(&rose), 4);

        assert!(cart.remove(&rose));
        assert!(!cart.remove(&rose));
        assert!(cart.is_empty());
    }
}
