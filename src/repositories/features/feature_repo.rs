//! Homepage banners (`features` collection).

use std::sync::Arc;

use futures_util::TryStreamExt;
use mongodb::bson::{doc, oid::ObjectId};
use mongodb::options::IndexOptions;
use mongodb::{Collection, IndexModel};

use crate::core::errors::{AppError, AppResult};
use crate::core::registry::{Repository, ServiceLocator};
use crate::db::Database;
use crate::domain::entities::features::Feature;

const COLLECTION: &str = "features";

pub struct FeatureRepository {
    db: Arc<Database>,
}

impl FeatureRepository {
    fn new() -> Self {
        Self {
            db: ServiceLocator::get::<Database>(),
        }
    }

    fn collection(&self) -> Collection<Feature> {
        self.db.get_database().collection(COLLECTION)
    }

    pub async fn list_active(&self) -> AppResult<Vec<Feature>> {
        self.collection()
            .find(doc! { "is_active": true })
            .sort(doc! { "sort_order": 1, "created_at": -1 })
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))?
            .try_collect()
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))
    }

    pub async fn find_by_id(&self, id: &ObjectId) -> AppResult<Option<Feature>> {
        self.collection()
            .find_one(doc! { "_id": id })
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))
    }

    pub async fn create(&self, mut feature: Feature) -> AppResult<Feature> {
        let result = self
            .collection()
            .insert_one(&feature)
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))?;

        feature.id = result.inserted_id.as_object_id();
        Ok(feature)
    }

    pub async fn delete(&self, id: &ObjectId) -> AppResult<bool> {
        let result = self
            .collection()
            .delete_one(doc! { "_id": id })
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))?;
        Ok(result.deleted_count > 0)
    }
}

crate::register_repository!(FeatureRepository, "feature_repository");

#[async_trait::async_trait]
impl Repository for FeatureRepository {
    fn name(&self) -> &str {
        "feature_repository"
    }

    fn collection_name(&self) -> &str {
        COLLECTION
    }

    async fn init(&self) -> AppResult<()> {
        let order_index = IndexModel::builder()
            .keys(doc! { "is_active": 1, "sort_order": 1 })
            .options(IndexOptions::builder().name("active_sorted".to_string()).build())
            .build();

        self.collection()
            .create_index(order_index)
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))?;
        Ok(())
    }
}
