//! Perfume houses (`brands` collection), unique by name and slug.

use std::sync::Arc;

use futures_util::TryStreamExt;
use mongodb::bson::{doc, oid::ObjectId, DateTime, Document};
use mongodb::options::{Collation, CollationStrength, FindOneAndUpdateOptions, IndexOptions, ReturnDocument};
use mongodb::{Collection, IndexModel};

use crate::core::errors::{AppError, AppResult};
use crate::core::registry::{Repository, ServiceLocator};
use crate::db::Database;
use crate::domain::entities::products::Brand;

const COLLECTION: &str = "brands";
const DUPLICATE_MESSAGE: &str = "a brand with this name already exists";

pub struct BrandRepository {
    db: Arc<Database>,
}

impl BrandRepository {
    fn new() -> Self {
        Self {
            db: ServiceLocator::get::<Database>(),
        }
    }

    fn collection(&self) -> Collection<Brand> {
        self.db.get_database().collection(COLLECTION)
    }

    pub async fn list(&self, include_inactive: bool) -> AppResult<Vec<Brand>> {
        let filter = if include_inactive {
            doc! {}
        } else {
            doc! { "is_active": true }
        };

        self.collection()
            .find(filter)
            .sort(doc! { "name": 1 })
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))?
            .try_collect()
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))
    }

    pub async fn find_by_id(&self, id: &ObjectId) -> AppResult<Option<Brand>> {
        self.collection()
            .find_one(doc! { "_id": id })
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))
    }

    pub async fn create(&self, mut brand: Brand) -> AppResult<Brand> {
        let result = self
            .collection()
            .insert_one(&brand)
            .await
            .map_err(|e| AppError::from_mongo(e, DUPLICATE_MESSAGE))?;

        brand.id = result.inserted_id.as_object_id();
        Ok(brand)
    }

    pub async fn update_fields(&self, id: &ObjectId, mut fields: Document) -> AppResult<Option<Brand>> {
        fields.insert("updated_at", DateTime::now());
        let options = FindOneAndUpdateOptions::builder()
            .return_document(ReturnDocument::After)
            .build();

        self.collection()
            .find_one_and_update(doc! { "_id": id }, doc! { "$set": fields })
            .with_options(options)
            .await
            .map_err(|e| AppError::from_mongo(e, DUPLICATE_MESSAGE))
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

crate::register_repository!(BrandRepository, "brand_repository");

#[async_trait::async_trait]
impl Repository for BrandRepository {
    fn name(&self) -> &str {
        "brand_repository"
    }

    fn collection_name(&self) -> &str {
        COLLECTION
    }

    async fn init(&self) -> AppResult<()> {
        // "Dior" and "dior" are the same house
        let case_insensitive = Collation::builder()
            .locale("en".to_string())
            .strength(CollationStrength::Secondary)
            .build();

        let name_index = IndexModel::builder()
            .keys(doc! { "name": 1 })
            .options(
                IndexOptions::builder()
                    .unique(true)
                    .name("name_unique".to_string())
                    .collation(case_insensitive)
                    .build(),
            )
            .build();

        let slug_index = IndexModel::builder()
            .keys(doc! { "slug": 1 })
            .options(
                IndexOptions::builder()
                    .unique(true)
                    .name("slug_unique".to_string())
                    .build(),
            )
            .build();

        self.collection()
            .create_indexes([name_index, slug_index])
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))?;
        Ok(())
    }
}
