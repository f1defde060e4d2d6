use mongodb::bson::{oid::ObjectId, DateTime};
use serde::{Deserialize, Serialize};

use crate::utils::string_utils::slugify;

/// Perfume house (`brands` collection). `name` and `slug` are unique.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Brand {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub name: String,
    pub slug: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub logo: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime,
    pub updated_at: DateTime,
}

impl Brand {
    pub fn new(name: String, logo: Option<String>, description: Option<String>) -> Self {
        let now = DateTime::now();
        Self {
            id: None,
            slug: slugify(&name),
            name,
            logo,
            description,
            is_active: true,
            created_at: now,
            updated_at: now,
        }
    }
}
