//! # User repository
//!
//! Accounts live in the `users` collection; single users are cached in Redis
//! under `user:{id}` for ten minutes and evicted on every write.

use std::sync::Arc;

use futures_util::TryStreamExt;
use mongodb::bson::{doc, oid::ObjectId, DateTime, Document, Regex};
use mongodb::options::{FindOneAndUpdateOptions, IndexOptions, ReturnDocument};
use mongodb::{Collection, IndexModel};

use crate::caching::redis::RedisClient;
use crate::core::errors::{AppError, AppResult};
use crate::core::registry::{Repository, ServiceLocator};
use crate::db::Database;
use crate::domain::dto::common::pagination::{PageWindow, Paginated};
use crate::domain::entities::users::User;
use crate::utils::string_utils::escape_regex;

const COLLECTION: &str = "users";
const CACHE_TTL_SECONDS: u64 = 600;

pub struct UserRepository {
    db: Arc<Database>,
    redis: Arc<RedisClient>,
}

impl UserRepository {
    fn new() -> Self {
        Self {
            db: ServiceLocator::get::<Database>(),
            redis: ServiceLocator::get::<RedisClient>(),
        }
    }

    fn collection(&self) -> Collection<User> {
        self.db.get_database().collection(COLLECTION)
    }

    fn cache_key(id: &ObjectId) -> String {
        format!("user:{}", id.to_hex())
    }

    async fn invalidate_cache(&self, id: &ObjectId) {
        if let Err(e) = self.redis.del(&Self::cache_key(id)).await {
            log::warn!("failed to evict user cache {}: {}", id, e);
        }
    }

    /// Looks up an account by its (lower-cased) email. Not cached: login must
    /// always see the current password hash and status.
    pub async fn find_by_email(&self, email: &str) -> AppResult<Option<User>> {
        self.collection()
            .find_one(doc! { "email": email.trim().to_lowercase() })
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))
    }

    pub async fn find_by_id(&self, id: &ObjectId) -> AppResult<Option<User>> {
        let cache_key = Self::cache_key(id);
        if let Some(cached) = self.redis.cached::<User>(&cache_key).await {
            return Ok(Some(cached));
        }

        let user = self
            .collection()
            .find_one(doc! { "_id": id })
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))?;

        if let Some(ref user) = user {
            self.redis.store(&cache_key, user, CACHE_TTL_SECONDS).await;
        }

        Ok(user)
    }

    /// Inserts a new account. The unique email index turns a concurrent
    /// duplicate into a conflict as well.
    pub async fn create(&self, mut user: User) -> AppResult<User> {
        if self.find_by_email(&user.email).await?.is_some() {
            return Err(AppError::ConflictError(
                "a user with this email already exists".to_string(),
            ));
        }

        let result = self
            .collection()
            .insert_one(&user)
            .await
            .map_err(|e| AppError::from_mongo(e, "a user with this email already exists"))?;

        user.id = result.inserted_id.as_object_id();
        Ok(user)
    }

    /// `$set`s the given fields (plus `updated_at`) and returns the new document.
    pub async fn update_fields(&self, id: &ObjectId, mut fields: Document) -> AppResult<Option<User>> {
        fields.insert("updated_at", DateTime::now());
        let options = FindOneAndUpdateOptions::builder()
            .return_document(ReturnDocument::After)
            .build();

        let updated = self
            .collection()
            .find_one_and_update(doc! { "_id": id }, doc! { "$set": fields })
            .with_options(options)
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))?;

        self.invalidate_cache(id).await;
        Ok(updated)
    }

    pub async fn touch_last_login(&self, id: &ObjectId) -> AppResult<()> {
        self.collection()
            .update_one(doc! { "_id": id }, doc! { "$set": { "last_login_at": DateTime::now() } })
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))?;
        self.invalidate_cache(id).await;
        Ok(())
    }

    /// Newest accounts first, optionally filtered by a name/email substring.
    pub async fn list(&self, search: Option<&str>, window: PageWindow) -> AppResult<Paginated<User>> {
        let filter = match search.map(str::trim).filter(|s| !s.is_empty()) {
            Some(term) => {
                let pattern = Regex {
                    pattern: escape_regex(term),
                    options: "i".to_string(),
                };
                doc! { "$or": [
                    { "user_name": { "$regex": pattern.clone() } },
                    { "email": { "$regex": pattern } },
                ] }
            }
            None => doc! {},
        };

        let collection = self.collection();
        let total = collection
            .count_documents(filter.clone())
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))?;

        let users: Vec<User> = collection
            .find(filter)
            .sort(doc! { "created_at": -1 })
            .skip(window.skip())
            .limit(window.limit as i64)
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))?
            .try_collect()
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))?;

        Ok(Paginated::new(users, total, window))
    }

    pub async fn delete(&self, id: &ObjectId) -> AppResult<bool> {
        let result = self
            .collection()
            .delete_one(doc! { "_id": id })
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))?;

        self.invalidate_cache(id).await;
        Ok(result.deleted_count > 0)
    }
}

crate::register_repository!(UserRepository, "user_repository");

#[async_trait::async_trait]
impl Repository for UserRepository {
    fn name(&self) -> &str {
        "user_repository"
    }

    fn collection_name(&self) -> &str {
        COLLECTION
    }

    async fn init(&self) -> AppResult<()> {
        let email_index = IndexModel::builder()
            .keys(doc! { "email": 1 })
            .options(
                IndexOptions::builder()
                    .unique(true)
                    .name("email_unique".to_string())
                    .build(),
            )
            .build();

        let created_at_index = IndexModel::builder()
            .keys(doc! { "created_at": -1 })
            .options(
                IndexOptions::builder()
                    .name("created_at_desc".to_string())
                    .build(),
            )
            .build();

        self.collection()
            .create_indexes([email_index, created_at_index])
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))?;

        Ok(())
    }
}
