//! One cart document per user (`carts` collection).

use std::sync::Arc;

use mongodb::bson::{doc, oid::ObjectId, DateTime};
use mongodb::options::IndexOptions;
use mongodb::{Collection, IndexModel};

use crate::core::errors::{AppError, AppResult};
use crate::core::registry::{Repository, ServiceLocator};
use crate::db::Database;
use crate::domain::entities::carts::Cart;

const COLLECTION: &str = "carts";

pub struct CartRepository {
    db: Arc<Database>,
}

impl CartRepository {
    fn new() -> Self {
        Self {
            db: ServiceLocator::get::<Database>(),
        }
    }

    fn collection(&self) -> Collection<Cart> {
        self.db.get_database().collection(COLLECTION)
    }

    pub async fn find_by_user(&self, user_id: &ObjectId) -> AppResult<Option<Cart>> {
        self.collection()
            .find_one(doc! { "user_id": user_id })
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))
    }

    /// Loads the user's cart or a fresh, unsaved one.
    pub async fn find_or_new(&self, user_id: &ObjectId) -> AppResult<Cart> {
        Ok(self
            .find_by_user(user_id)
            .await?
            .unwrap_or_else(|| Cart::new(*user_id)))
    }

    /// Writes the whole cart, creating it on first save.
    pub async fn save(&self, cart: &mut Cart) -> AppResult<()> {
        cart.updated_at = DateTime::now();
        let result = self
            .collection()
            .replace_one(doc! { "user_id": cart.user_id }, &*cart)
            .upsert(true)
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))?;

        if let Some(id) = result.upserted_id.and_then(|id| id.as_object_id()) {
            cart.id = Some(id);
        }
        Ok(())
    }

    pub async fn clear(&self, user_id: &ObjectId) -> AppResult<()> {
        self.collection()
            .update_one(
                doc! { "user_id": user_id },
                doc! { "$set": { "items": [], "updated_at": DateTime::now() } },
            )
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))?;
        Ok(())
    }

    pub async fn delete_for_user(&self, user_id: &ObjectId) -> AppResult<()> {
        self.collection()
            .delete_one(doc! { "user_id": user_id })
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))?;
        Ok(())
    }
}

crate::register_repository!(CartRepository, "cart_repository");

#[async_trait::async_trait]
impl Repository for CartRepository {
    fn name(&self) -> &str {
        "cart_repository"
    }

    fn collection_name(&self) -> &str {
        COLLECTION
    }

    async fn init(&self) -> AppResult<()> {
        let user_index = IndexModel::builder()
            .keys(doc! { "user_id": 1 })
            .options(
                IndexOptions::builder()
                    .unique(true)
                    .name("user_unique".to_string())
                    .build(),
            )
            .build();

        self.collection()
            .create_index(user_index)
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))?;
        Ok(())
    }
}
