use mongodb::bson::{oid::ObjectId, DateTime};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SampleStatus {
    #[default]
    Pending,
    Approved,
    Shipped,
    Rejected,
}

impl SampleStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SampleStatus::Pending => "pending",
            SampleStatus::Approved => "approved",
            SampleStatus::Shipped => "shipped",
            SampleStatus::Rejected => "rejected",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_lowercase().as_str() {
            "pending" => Some(SampleStatus::Pending),
            "approved" => Some(SampleStatus::Approved),
            "shipped" => Some(SampleStatus::Shipped),
            "rejected" => Some(SampleStatus::Rejected),
            _ => None,
        }
    }
}

/// A customer's free trial unit of one product (`sample_requests` collection).
///
/// The `(user_id, product_id)` pair is unique: every customer gets at most one
/// sample of each perfume.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SampleRequest {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub user_id: ObjectId,
    pub product_id: ObjectId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order_id: Option<ObjectId>,
    pub status: SampleStatus,
    pub created_at: DateTime,
    pub updated_at: DateTime,
}

impl SampleRequest {
    pub fn new(user_id: ObjectId, product_id: ObjectId, order_id: Option<ObjectId>) -> Self {
        let now = DateTime::now();
        Self {
            id: None,
            user_id,
            product_id,
            order_id,
            status: SampleStatus::Pending,
            created_at: now,
            updated_at: now,
        }
    }
}
