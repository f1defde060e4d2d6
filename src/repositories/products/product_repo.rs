//! # Product repository
//!
//! Catalog documents in `products`. Reads go through Redis:
//!
//! - `product:{id}`: single product
//! - `products:list:{filter}|{sort}|{page}|{limit}`: catalog pages
//!
//! Any write evicts the product key and every cached page. Stock is only
//! changed through guarded `$inc` updates so two checkouts can never sell
//! the same unit.

use std::sync::Arc;

use futures_util::TryStreamExt;
use mongodb::bson::{doc, oid::ObjectId, Bson, DateTime, Document, Regex};
use mongodb::options::{FindOneAndUpdateOptions, IndexOptions, ReturnDocument};
use mongodb::{Collection, IndexModel};

use crate::caching::redis::RedisClient;
use crate::core::errors::{AppError, AppResult};
use crate::core::registry::{Repository, ServiceLocator};
use crate::db::Database;
use crate::domain::dto::common::pagination::{PageWindow, Paginated};
use crate::domain::entities::products::Product;
use crate::repositories::products::product_query::{ProductFilter, ProductSort};
use crate::utils::string_utils::escape_regex;

const COLLECTION: &str = "products";
const CACHE_TTL_SECONDS: u64 = 600;
const SEARCH_LIMIT: i64 = 50;
const LIST_CACHE_PATTERN: &str = "products:list:*";

pub struct ProductRepository {
    db: Arc<Database>,
    redis: Arc<RedisClient>,
}

impl ProductRepository {
    fn new() -> Self {
        Self {
            db: ServiceLocator::get::<Database>(),
            redis: ServiceLocator::get::<RedisClient>(),
        }
    }

    fn collection(&self) -> Collection<Product> {
        self.db.get_database().collection(COLLECTION)
    }

    fn cache_key(id: &ObjectId) -> String {
        format!("product:{}", id.to_hex())
    }

    fn list_cache_key(filter: &Document, sort: ProductSort, window: PageWindow) -> String {
        format!(
            "products:list:{}|{}|{}|{}",
            filter,
            sort.as_str(),
            window.page,
            window.limit
        )
    }

    /// Evicts the cached product (if any) and all cached catalog pages.
    pub async fn invalidate_cache(&self, id: Option<&ObjectId>) {
        if let Some(id) = id {
            if let Err(e) = self.redis.del(&Self::cache_key(id)).await {
                log::warn!("failed to evict product cache {}: {}", id, e);
            }
        }
        match self.redis.del_pattern(LIST_CACHE_PATTERN).await {
            Ok(removed) if removed > 0 => log::debug!("evicted {} cached catalog pages", removed),
            Ok(_) => {}
            Err(e) => log::warn!("failed to evict catalog pages: {}", e),
        }
    }

    pub async fn find_by_id(&self, id: &ObjectId) -> AppResult<Option<Product>> {
        let cache_key = Self::cache_key(id);
        if let Some(cached) = self.redis.cached::<Product>(&cache_key).await {
            return Ok(Some(cached));
        }

        let product = self
            .collection()
            .find_one(doc! { "_id": id })
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))?;

        if let Some(ref product) = product {
            self.redis.store(&cache_key, product, CACHE_TTL_SECONDS).await;
        }
        Ok(product)
    }

    /// Loads several products at once; missing ids are simply absent from the result.
    pub async fn find_by_ids(&self, ids: &[ObjectId]) -> AppResult<Vec<Product>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let ids: Vec<Bson> = ids.iter().map(|id| Bson::ObjectId(*id)).collect();

        self.collection()
            .find(doc! { "_id": { "$in": ids } })
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))?
            .try_collect()
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))
    }

    pub async fn list(
        &self,
        filter: &ProductFilter,
        sort: ProductSort,
        window: PageWindow,
    ) -> AppResult<Paginated<Product>> {
        let filter_doc = filter.to_document();
        // back-office listings must always be fresh
        let cache_key = (!filter.include_inactive)
            .then(|| Self::list_cache_key(&filter_doc, sort, window));

        if let Some(ref key) = cache_key {
            if let Some(cached) = self.redis.cached::<Paginated<Product>>(key).await {
                return Ok(cached);
            }
        }

        let collection = self.collection();
        let total = collection
            .count_documents(filter_doc.clone())
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))?;

        let products: Vec<Product> = collection
            .find(filter_doc)
            .sort(sort.to_document())
            .skip(window.skip())
            .limit(window.limit as i64)
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))?
            .try_collect()
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))?;

        let page = Paginated::new(products, total, window);
        if let Some(ref key) = cache_key {
            self.redis.store(key, &page, CACHE_TTL_SECONDS).await;
        }
        Ok(page)
    }

    /// Case-insensitive match on title, description and category of active products.
    pub async fn search(&self, keyword: &str) -> AppResult<Vec<Product>> {
        let pattern = Regex {
            pattern: escape_regex(keyword.trim()),
            options: "i".to_string(),
        };
        let filter = doc! {
            "is_active": true,
            "$or": [
                { "title": { "$regex": pattern.clone() } },
                { "description": { "$regex": pattern.clone() } },
                { "category": { "$regex": pattern } },
            ],
        };

        self.collection()
            .find(filter)
            .sort(doc! { "created_at": -1 })
            .limit(SEARCH_LIMIT)
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))?
            .try_collect()
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))
    }

    pub async fn count_by_brand(&self, brand_id: &ObjectId) -> AppResult<u64> {
        self.collection()
            .count_documents(doc! { "brand_id": brand_id })
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))
    }

    pub async fn create(&self, mut product: Product) -> AppResult<Product> {
        let result = self
            .collection()
            .insert_one(&product)
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))?;

        product.id = result.inserted_id.as_object_id();
        self.invalidate_cache(None).await;
        Ok(product)
    }

    pub async fn update_fields(&self, id: &ObjectId, mut fields: Document) -> AppResult<Option<Product>> {
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

        if updated.is_some() {
            self.invalidate_cache(Some(id)).await;
        }
        Ok(updated)
    }

    pub async fn delete(&self, id: &ObjectId) -> AppResult<bool> {
        let result = self
            .collection()
            .delete_one(doc! { "_id": id })
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))?;

        if result.deleted_count == 0 {
            return Ok(false);
        }
        self.invalidate_cache(Some(id)).await;
        Ok(true)
    }

    /// Takes `quantity` units off the shelf if, and only if, that many are left.
    pub async fn reserve_stock(&self, id: &ObjectId, quantity: i64) -> AppResult<bool> {
        let result = self
            .collection()
            .update_one(
                doc! { "_id": id, "total_stock": { "$gte": quantity } },
                doc! {
                    "$inc": { "total_stock": -quantity },
                    "$set": { "updated_at": DateTime::now() },
                },
            )
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))?;

        let reserved = result.modified_count == 1;
        if reserved {
            self.invalidate_cache(Some(id)).await;
        }
        Ok(reserved)
    }

    pub async fn release_stock(&self, id: &ObjectId, quantity: i64) -> AppResult<()> {
        self.collection()
            .update_one(
                doc! { "_id": id },
                doc! {
                    "$inc": { "total_stock": quantity },
                    "$set": { "updated_at": DateTime::now() },
                },
            )
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))?;

        self.invalidate_cache(Some(id)).await;
        Ok(())
    }

    /// Reserves every `(product, quantity)` line or none of them.
    ///
    /// On a shortfall the lines already taken are put back and the id of the
    /// first product that ran out is returned.
    pub async fn reserve_all(&self, lines: &[(ObjectId, i64)]) -> AppResult<Result<(), ObjectId>> {
        let mut reserved: Vec<(ObjectId, i64)> = Vec::with_capacity(lines.len());

        for (product_id, quantity) in lines {
            match self.reserve_stock(product_id, *quantity).await {
                Ok(true) => reserved.push((*product_id, *quantity)),
                Ok(false) => {
                    self.release_all(&reserved).await;
                    return Ok(Err(*product_id));
                }
                Err(e) => {
                    self.release_all(&reserved).await;
                    return Err(e);
                }
            }
        }
        Ok(Ok(()))
    }

    /// Best-effort counterpart of [`reserve_all`](Self::reserve_all).
    pub async fn release_all(&self, lines: &[(ObjectId, i64)]) {
        for (product_id, quantity) in lines {
            if let Err(e) = self.release_stock(product_id, *quantity).await {
                log::error!("failed to release {} units of {}: {}", quantity, product_id, e);
            }
        }
    }
}

crate::register_repository!(ProductRepository, "product_repository");

#[async_trait::async_trait]
impl Repository for ProductRepository {
    fn name(&self) -> &str {
        "product_repository"
    }

    fn collection_name(&self) -> &str {
        COLLECTION
    }

    async fn init(&self) -> AppResult<()> {
        let indexes = [
            IndexModel::builder()
                .keys(doc! { "is_active": 1, "created_at": -1 })
                .options(IndexOptions::builder().name("active_newest".to_string()).build())
                .build(),
            IndexModel::builder()
                .keys(doc! { "category": 1, "price": 1 })
                .options(IndexOptions::builder().name("category_price".to_string()).build())
                .build(),
            IndexModel::builder()
                .keys(doc! { "brand_id": 1 })
                .options(IndexOptions::builder().name("brand".to_string()).build())
                .build(),
        ];

        self.collection()
            .create_indexes(indexes)
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))?;
        Ok(())
    }
}
