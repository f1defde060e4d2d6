//! # Coupon repository
//!
//! Codes are stored upper-cased with a unique index. Redemption is a single
//! guarded `find_one_and_update`: the filter re-checks the global and the
//! per-user limit, so concurrent checkouts cannot overshoot either of them.

use std::sync::Arc;

use futures_util::TryStreamExt;
use mongodb::bson::{doc, oid::ObjectId, DateTime, Document};
use mongodb::options::{FindOneAndUpdateOptions, IndexOptions, ReturnDocument};
use mongodb::{Collection, IndexModel};

use crate::core::errors::{AppError, AppResult};
use crate::core::registry::{Repository, ServiceLocator};
use crate::db::Database;
use crate::domain::dto::common::pagination::{PageWindow, Paginated};
use crate::domain::entities::coupons::Coupon;

const COLLECTION: &str = "coupons";
const DUPLICATE_MESSAGE: &str = "a coupon with this code already exists";

pub struct CouponRepository {
    db: Arc<Database>,
}

/// Filter matching a coupon that can still be redeemed by `user_id`.
pub(crate) fn redeemable_filter(coupon_id: &ObjectId, user_id: &ObjectId) -> Document {
    doc! {
        "_id": coupon_id,
        "is_active": true,
        "$and": [
            { "$or": [
                { "usage_limit": null },
                { "$expr": { "$lt": ["$used_count", "$usage_limit"] } },
            ] },
            { "$expr": { "$lt": [
                { "$size": { "$filter": {
                    "input": { "$ifNull": ["$used_by", []] },
                    "as": "usage",
                    "cond": { "$eq": ["$$usage.user_id", user_id] },
                } } },
                { "$ifNull": ["$per_user_limit", 1] },
            ] } },
        ],
    }
}

impl CouponRepository {
    fn new() -> Self {
        Self {
            db: ServiceLocator::get::<Database>(),
        }
    }

    fn collection(&self) -> Collection<Coupon> {
        self.db.get_database().collection(COLLECTION)
    }

    fn after_update() -> FindOneAndUpdateOptions {
        FindOneAndUpdateOptions::builder()
            .return_document(ReturnDocument::After)
            .build()
    }

    pub async fn find_by_code(&self, code: &str) -> AppResult<Option<Coupon>> {
        self.collection()
            .find_one(doc! { "code": Coupon::normalize_code(code) })
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))
    }

    pub async fn find_by_id(&self, id: &ObjectId) -> AppResult<Option<Coupon>> {
        self.collection()
            .find_one(doc! { "_id": id })
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))
    }

    pub async fn list(&self, window: PageWindow) -> AppResult<Paginated<Coupon>> {
        let collection = self.collection();
        let total = collection
            .count_documents(doc! {})
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))?;

        let coupons: Vec<Coupon> = collection
            .find(doc! {})
            .sort(doc! { "created_at": -1 })
            .skip(window.skip())
            .limit(window.limit as i64)
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))?
            .try_collect()
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))?;

        Ok(Paginated::new(coupons, total, window))
    }

    pub async fn create(&self, mut coupon: Coupon) -> AppResult<Coupon> {
        let result = self
            .collection()
            .insert_one(&coupon)
            .await
            .map_err(|e| AppError::from_mongo(e, DUPLICATE_MESSAGE))?;

        coupon.id = result.inserted_id.as_object_id();
        Ok(coupon)
    }

    /// `$set`s `fields` and `$unset`s `clear` (used for removing optional limits).
    pub async fn update_fields(
        &self,
        id: &ObjectId,
        mut fields: Document,
        clear: Vec<&str>,
    ) -> AppResult<Option<Coupon>> {
        fields.insert("updated_at", DateTime::now());
        let mut update = doc! { "$set": fields };
        if !clear.is_empty() {
            let mut unset = Document::new();
            for field in clear {
                unset.insert(field, "");
            }
            update.insert("$unset", unset);
        }

        self.collection()
            .find_one_and_update(doc! { "_id": id }, update)
            .with_options(Self::after_update())
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))
    }

    /// Flips `is_active` in one round trip.
    pub async fn toggle_active(&self, id: &ObjectId) -> AppResult<Option<Coupon>> {
        let pipeline = vec![doc! { "$set": {
            "is_active": { "$not": ["$is_active"] },
            "updated_at": "$$NOW",
        } }];

        self.collection()
            .find_one_and_update(doc! { "_id": id }, pipeline)
            .with_options(Self::after_update())
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))
    }

    pub async fn delete(&self, id: &ObjectId) -> AppResult<bool> {
        let result = self
            .collection()
            .delete_one(doc! { "_id": id })
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))?;
        Ok(result.deleted_count > 0)
    }

    /// Counts one redemption by `user_id`; `None` when a limit was reached
    /// (or the coupon was disabled) in the meantime.
    pub async fn record_usage(
        &self,
        coupon_id: &ObjectId,
        user_id: &ObjectId,
        order_id: &ObjectId,
    ) -> AppResult<Option<Coupon>> {
        let now = DateTime::now();
        let update = doc! {
            "$inc": { "used_count": 1 },
            "$push": { "used_by": { "user_id": user_id, "order_id": order_id, "used_at": now } },
            "$set": { "updated_at": now },
        };

        self.collection()
            .find_one_and_update(redeemable_filter(coupon_id, user_id), update)
            .with_options(Self::after_update())
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))
    }

    /// Undoes [`record_usage`](Self::record_usage) for an order that could not be placed.
    pub async fn revert_usage(&self, coupon_id: &ObjectId, order_id: &ObjectId) -> AppResult<()> {
        self.collection()
            .update_one(
                doc! { "_id": coupon_id, "used_by.order_id": order_id },
                doc! {
                    "$inc": { "used_count": -1 },
                    "$pull": { "used_by": { "order_id": order_id } },
                },
            )
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))?;
        Ok(())
    }
}

crate::register_repository!(CouponRepository, "coupon_repository");

#[async_trait::async_trait]
impl Repository for CouponRepository {
    fn name(&self) -> &str {
        "coupon_repository"
    }

    fn collection_name(&self) -> &str {
        COLLECTION
    }

    async fn init(&self) -> AppResult<()> {
        let code_index = IndexModel::builder()
            .keys(doc! { "code": 1 })
            .options(
                IndexOptions::builder()
                    .unique(true)
                    .name("code_unique".to_string())
                    .build(),
            )
            .build();

        self.collection()
            .create_index(code_index)
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_redeemable_filter_guards_both_limits() {
        let coupon_id = ObjectId::new();
        let user_id = ObjectId::new();
        let filter = redeemable_filter(&coupon_id, &user_id);

        assert_eq!(filter.get_object_id("_id").unwrap(), coupon_id);
        assert_eq!(filter.get_bool("is_active").unwrap(), true);

        let guards = filter.get_array("$and").unwrap();
        assert_eq!(guards.len(), 2);
        let rendered = filter.to_string();
        assert!(rendered.contains("$used_count"));
        assert!(rendered.contains("$per_user_limit"));
        assert!(rendered.contains(&user_id.to_hex()));
    }
}
