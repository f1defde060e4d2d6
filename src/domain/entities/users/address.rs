use mongodb::bson::{oid::ObjectId, DateTime};
use serde::{Deserialize, Serialize};

use crate::domain::entities::orders::order::OrderAddress;

/// Saved delivery address of a customer (`addresses` collection).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Address {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub user_id: ObjectId,
    pub full_name: String,
    pub address: String,
    pub city: String,
    pub postal_code: String,
    pub phone: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    pub created_at: DateTime,
    pub updated_at: DateTime,
}

impl Address {
    pub fn new(
        user_id: ObjectId,
        full_name: String,
        address: String,
        city: String,
        postal_code: String,
        phone: String,
        notes: Option<String>,
    ) -> Self {
        let now = DateTime::now();
        Self {
            id: None,
            user_id,
            full_name,
            address,
            city,
            postal_code,
            phone,
            notes,
            created_at: now,
            updated_at: now,
        }
    }

    /// Copy embedded into an order so later edits do not rewrite history.
    pub fn snapshot(&self) -> OrderAddress {
        OrderAddress {
            full_name: self.full_name.clone(),
            address: self.address.clone(),
            city: self.city.clone(),
            postal_code: self.postal_code.clone(),
            phone: self.phone.clone(),
            notes: self.notes.clone(),
        }
    }
}
