//! Saved delivery addresses (`addresses` collection). Every query is scoped
//! to the owning user, so another customer's address reads as missing.

use std::sync::Arc;

use futures_util::TryStreamExt;
use mongodb::bson::{doc, oid::ObjectId, DateTime, Document};
use mongodb::options::{FindOneAndUpdateOptions, IndexOptions, ReturnDocument};
use mongodb::{Collection, IndexModel};

use crate::core::errors::{AppError, AppResult};
use crate::core::registry::{Repository, ServiceLocator};
use crate::db::Database;
use crate::domain::entities::users::Address;

const COLLECTION: &str = "addresses";

pub struct AddressRepository {
    db: Arc<Database>,
}

impl AddressRepository {
    fn new() -> Self {
        Self {
            db: ServiceLocator::get::<Database>(),
        }
    }

    fn collection(&self) -> Collection<Address> {
        self.db.get_database().collection(COLLECTION)
    }

    pub async fn count_for_user(&self, user_id: &ObjectId) -> AppResult<u64> {
        self.collection()
            .count_documents(doc! { "user_id": user_id })
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))
    }

    pub async fn list_for_user(&self, user_id: &ObjectId) -> AppResult<Vec<Address>> {
        self.collection()
            .find(doc! { "user_id": user_id })
            .sort(doc! { "created_at": 1 })
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))?
            .try_collect()
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))
    }

    pub async fn find_owned(&self, id: &ObjectId, user_id: &ObjectId) -> AppResult<Option<Address>> {
        self.collection()
            .find_one(doc! { "_id": id, "user_id": user_id })
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))
    }

    pub async fn create(&self, mut address: Address) -> AppResult<Address> {
        let result = self
            .collection()
            .insert_one(&address)
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))?;

        address.id = result.inserted_id.as_object_id();
        Ok(address)
    }

    pub async fn update_owned(
        &self,
        id: &ObjectId,
        user_id: &ObjectId,
        mut fields: Document,
    ) -> AppResult<Option<Address>> {
        fields.insert("updated_at", DateTime::now());
        let options = FindOneAndUpdateOptions::builder()
            .return_document(ReturnDocument::After)
            .build();

        self.collection()
            .find_one_and_update(doc! { "_id": id, "user_id": user_id }, doc! { "$set": fields })
            .with_options(options)
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))
    }

    pub async fn delete_owned(&self, id: &ObjectId, user_id: &ObjectId) -> AppResult<bool> {
        let result = self
            .collection()
            .delete_one(doc! { "_id": id, "user_id": user_id })
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))?;
        Ok(result.deleted_count > 0)
    }

    pub async fn delete_all_for_user(&self, user_id: &ObjectId) -> AppResult<u64> {
        let result = self
            .collection()
            .delete_many(doc! { "user_id": user_id })
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))?;
        Ok(result.deleted_count)
    }
}

crate::register_repository!(AddressRepository, "address_repository");

#[async_trait::async_trait]
impl Repository for AddressRepository {
    fn name(&self) -> &str {
        "address_repository"
    }

    fn collection_name(&self) -> &str {
        COLLECTION
    }

    async fn init(&self) -> AppResult<()> {
        let user_index = IndexModel::builder()
            .keys(doc! { "user_id": 1, "created_at": 1 })
            .options(IndexOptions::builder().name("user_created".to_string()).build())
            .build();

        self.collection()
            .create_index(user_index)
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))?;
        Ok(())
    }
}
