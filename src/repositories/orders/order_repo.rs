//! # Order repository
//!
//! Orders (`orders` collection) are immutable snapshots apart from their
//! fulfilment and payment state. Status changes are conditional on the
//! status the caller last saw, so two admins acting at once cannot both
//! release (or re-reserve) the same stock.

use std::sync::Arc;

use futures_util::TryStreamExt;
use mongodb::bson::{doc, oid::ObjectId, DateTime, Document};
use mongodb::options::{FindOneAndUpdateOptions, IndexOptions, ReturnDocument};
use mongodb::{Collection, IndexModel};

use crate::core::errors::{AppError, AppResult};
use crate::core::registry::{Repository, ServiceLocator};
use crate::db::Database;
use crate::domain::dto::common::pagination::{PageWindow, Paginated};
use crate::domain::entities::orders::{Order, OrderStatus};

const COLLECTION: &str = "orders";

pub struct OrderRepository {
    db: Arc<Database>,
}

impl OrderRepository {
    fn new() -> Self {
        Self {
            db: ServiceLocator::get::<Database>(),
        }
    }

    fn collection(&self) -> Collection<Order> {
        self.db.get_database().collection(COLLECTION)
    }

    pub async fn create(&self, mut order: Order) -> AppResult<Order> {
        let result = self
            .collection()
            .insert_one(&order)
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))?;

        order.id = result.inserted_id.as_object_id();
        Ok(order)
    }

    pub async fn find_by_id(&self, id: &ObjectId) -> AppResult<Option<Order>> {
        self.collection()
            .find_one(doc! { "_id": id })
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))
    }

    pub async fn list_for_user(&self, user_id: &ObjectId) -> AppResult<Vec<Order>> {
        self.collection()
            .find(doc! { "user_id": user_id })
            .sort(doc! { "created_at": -1 })
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))?
            .try_collect()
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))
    }

    pub async fn list(
        &self,
        status: Option<OrderStatus>,
        window: PageWindow,
    ) -> AppResult<Paginated<Order>> {
        let filter = match status {
            Some(status) => doc! { "order_status": status.as_str() },
            None => doc! {},
        };

        let collection = self.collection();
        let total = collection
            .count_documents(filter.clone())
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))?;

        let orders: Vec<Order> = collection
            .find(filter)
            .sort(doc! { "created_at": -1 })
            .skip(window.skip())
            .limit(window.limit as i64)
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))?
            .try_collect()
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))?;

        Ok(Paginated::new(orders, total, window))
    }

    /// Moves the order from `from` to `to`, applying `extra` in the same update.
    ///
    /// Returns `None` when the order no longer is in `from`.
    pub async fn transition_status(
        &self,
        id: &ObjectId,
        from: OrderStatus,
        to: OrderStatus,
        mut extra: Document,
    ) -> AppResult<Option<Order>> {
        extra.insert("order_status", to.as_str());
        extra.insert("updated_at", DateTime::now());
        let options = FindOneAndUpdateOptions::builder()
            .return_document(ReturnDocument::After)
            .build();

        self.collection()
            .find_one_and_update(
                doc! { "_id": id, "order_status": from.as_str() },
                doc! { "$set": extra },
            )
            .with_options(options)
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))
    }

    pub async fn update_fields(&self, id: &ObjectId, mut fields: Document) -> AppResult<Option<Order>> {
        fields.insert("updated_at", DateTime::now());
        let options = FindOneAndUpdateOptions::builder()
            .return_document(ReturnDocument::After)
            .build();

        self.collection()
            .find_one_and_update(doc! { "_id": id }, doc! { "$set": fields })
            .with_options(options)
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))
    }

    /// Only used to roll back an order whose side effects failed.
    pub async fn delete(&self, id: &ObjectId) -> AppResult<bool> {
        let result = self
            .collection()
            .delete_one(doc! { "_id": id })
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))?;
        Ok(result.deleted_count > 0)
    }
}

crate::register_repository!(OrderRepository, "order_repository");

#[async_trait::async_trait]
impl Repository for OrderRepository {
    fn name(&self) -> &str {
        "order_repository"
    }

    fn collection_name(&self) -> &str {
        COLLECTION
    }

    async fn init(&self) -> AppResult<()> {
        let indexes = [
            IndexModel::builder()
                .keys(doc! { "user_id": 1, "created_at": -1 })
                .options(IndexOptions::builder().name("user_newest".to_string()).build())
                .build(),
            IndexModel::builder()
                .keys(doc! { "order_status": 1, "created_at": -1 })
                .options(IndexOptions::builder().name("status_newest".to_string()).build())
                .build(),
        ];

        self.collection()
            .create_indexes(indexes)
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))?;
        Ok(())
    }
}
