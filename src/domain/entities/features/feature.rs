use mongodb::bson::{oid::ObjectId, DateTime};
use serde::{Deserialize, Serialize};

/// Homepage banner image (`features` collection).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Feature {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub image: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
    #[serde(default)]
    pub sort_order: i32,
    pub is_active: bool,
    pub created_at: DateTime,
}

impl Feature {
    pub fn new(image: String, title: Option<String>, link: Option<String>, sort_order: i32) -> Self {
        Self {
            id: None,
            image,
            title,
            link,
            sort_order,
            is_active: true,
            created_at: DateTime::now(),
        }
    }
}
