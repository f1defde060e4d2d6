//! Free sample requests (`sample_requests` collection).
//!
//! The unique `(user_id, product_id)` index is the final arbiter of the
//! one-sample-per-perfume rule.

use std::sync::Arc;

use futures_util::TryStreamExt;
use mongodb::bson::{doc, oid::ObjectId, DateTime};
use mongodb::options::{FindOneAndUpdateOptions, IndexOptions, ReturnDocument};
use mongodb::{Collection, IndexModel};

use crate::core::errors::{AppError, AppResult};
use crate::core::registry::{Repository, ServiceLocator};
use crate::db::Database;
use crate::domain::entities::samples::{SampleRequest, SampleStatus};

const COLLECTION: &str = "sample_requests";

pub struct SampleRepository {
    db: Arc<Database>,
}

impl SampleRepository {
    fn new() -> Self {
        Self {
            db: ServiceLocator::get::<Database>(),
        }
    }

    fn collection(&self) -> Collection<SampleRequest> {
        self.db.get_database().collection(COLLECTION)
    }

    pub async fn exists(&self, user_id: &ObjectId, product_id: &ObjectId) -> AppResult<bool> {
        let count = self
            .collection()
            .count_documents(doc! { "user_id": user_id, "product_id": product_id })
            .limit(1)
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))?;
        Ok(count > 0)
    }

    /// Stores the sample lines of one order in a single `insert_many`.
    ///
    /// # Errors
    ///
    /// `ConflictError` when the unique `(user_id, product_id)` index rejects a
    /// line, i.e. a concurrent order requested the same sample first.
    pub async fn create_many(&self, requests: &[SampleRequest]) -> AppResult<()> {
        if requests.is_empty() {
            return Ok(());
        }
        self.collection()
            .insert_many(requests)
            .await
            .map_err(|e| AppError::from_mongo(e, "a sample of this product was already requested"))?;
        Ok(())
    }

    pub async fn list_for_user(&self, user_id: &ObjectId) -> AppResult<Vec<SampleRequest>> {
        self.collection()
            .find(doc! { "user_id": user_id })
            .sort(doc! { "created_at": -1 })
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))?
            .try_collect()
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))
    }

    pub async fn list(&self, status: Option<SampleStatus>) -> AppResult<Vec<SampleRequest>> {
        let filter = match status {
            Some(status) => doc! { "status": status.as_str() },
            None => doc! {},
        };

        self.collection()
            .find(filter)
            .sort(doc! { "created_at": -1 })
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))?
            .try_collect()
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))
    }

    pub async fn update_status(
        &self,
        id: &ObjectId,
        status: SampleStatus,
    ) -> AppResult<Option<SampleRequest>> {
        let options = FindOneAndUpdateOptions::builder()
            .return_document(ReturnDocument::After)
            .build();

        self.collection()
            .find_one_and_update(
                doc! { "_id": id },
                doc! { "$set": { "status": status.as_str(), "updated_at": DateTime::now() } },
            )
            .with_options(options)
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))
    }

    /// Sets the status of every sample shipped with `order_id`.
    pub async fn update_status_for_order(
        &self,
        order_id: &ObjectId,
        status: SampleStatus,
    ) -> AppResult<u64> {
        let result = self
            .collection()
            .update_many(
                doc! { "order_id": order_id },
                doc! { "$set": { "status": status.as_str(), "updated_at": DateTime::now() } },
            )
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))?;
        Ok(result.modified_count)
    }

    pub async fn delete_for_order(&self, order_id: &ObjectId) -> AppResult<u64> {
        let result = self
            .collection()
            .delete_many(doc! { "order_id": order_id })
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))?;
        Ok(result.deleted_count)
    }
}

crate::register_repository!(SampleRepository, "sample_repository");

#[async_trait::async_trait]
impl Repository for SampleRepository {
    fn name(&self) -> &str {
        "sample_repository"
    }

    fn collection_name(&self) -> &str {
        COLLECTION
    }

    async fn init(&self) -> AppResult<()> {
        let pair_index = IndexModel::builder()
            .keys(doc! { "user_id": 1, "product_id": 1 })
            .options(
                IndexOptions::builder()
                    .unique(true)
                    .name("user_product_unique".to_string())
                    .build(),
            )
            .build();

        let status_index = IndexModel::builder()
            .keys(doc! { "status": 1, "created_at": -1 })
            .options(IndexOptions::builder().name("status_newest".to_string()).build())
            .build();

        self.collection()
            .create_indexes([pair_index, status_index])
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))?;
        Ok(())
    }
}
