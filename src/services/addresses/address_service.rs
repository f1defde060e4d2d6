//! Saved delivery addresses, capped per customer.

use std::sync::Arc;

use mongodb::bson::{oid::ObjectId, Document};

use singleton_macro::service;

use crate::config::ShopConfig;
use crate::core::errors::{AppError, AppResult};
use crate::domain::dto::addresses::{AddressRequest, AddressResponse, UpdateAddressRequest};
use crate::domain::entities::orders::OrderAddress;
use crate::domain::entities::users::Address;
use crate::repositories::users::AddressRepository;
use crate::utils::string_utils::{clean_optional_string, parse_object_id};

#[service(name = "address")]
pub struct AddressService {
    address_repo: Arc<AddressRepository>,
}

fn update_document(request: UpdateAddressRequest) -> Document {
    let mut fields = Document::new();
    let text_fields = [
        ("full_name", request.full_name),
        ("address", request.address),
        ("city", request.city),
        ("postal_code", request.postal_code),
        ("phone", request.phone),
        ("notes", request.notes),
    ];
    for (name, value) in text_fields {
        if let Some(value) = clean_optional_string(value) {
            fields.insert(name, value);
        }
    }
    fields
}

impl AddressService {
    pub async fn add(&self, user_id: &ObjectId, request: AddressRequest) -> AppResult<AddressResponse> {
        let limit = ShopConfig::max_addresses_per_user();
        if self.address_repo.count_for_user(user_id).await? >= limit {
            return Err(AppError::ValidationError(format!(
                "you can save at most {} addresses",
                limit
            )));
        }

        let snapshot = request.into_snapshot();
        let address = Address::new(
            *user_id,
            snapshot.full_name,
            snapshot.address,
            snapshot.city,
            snapshot.postal_code,
            snapshot.phone,
            snapshot.notes,
        );
        let created = self.address_repo.create(address).await?;
        Ok(AddressResponse::from(created))
    }

    pub async fn list(&self, user_id: &ObjectId) -> AppResult<Vec<AddressResponse>> {
        let addresses = self.address_repo.list_for_user(user_id).await?;
        Ok(addresses.into_iter().map(AddressResponse::from).collect())
    }

    pub async fn update(
        &self,
        user_id: &ObjectId,
        id: &str,
        request: UpdateAddressRequest,
    ) -> AppResult<AddressResponse> {
        let id = parse_object_id(id, "address")?;
        let fields = update_document(request);
        if fields.is_empty() {
            return Err(AppError::ValidationError("nothing to update".to_string()));
        }

        self.address_repo
            .update_owned(&id, user_id, fields)
            .await?
            .map(AddressResponse::from)
            .ok_or_else(|| AppError::NotFound("address not found".to_string()))
    }

    pub async fn delete(&self, user_id: &ObjectId, id: &str) -> AppResult<()> {
        let id = parse_object_id(id, "address")?;
        if !self.address_repo.delete_owned(&id, user_id).await? {
            return Err(AppError::NotFound("address not found".to_string()));
        }
        Ok(())
    }

    /// Order snapshot of a saved address owned by `user_id`.
    pub async fn snapshot_owned(&self, user_id: &ObjectId, id: &str) -> AppResult<OrderAddress> {
        let id = parse_object_id(id, "address")?;
        self.address_repo
            .find_owned(&id, user_id)
            .await?
            .map(|address| address.snapshot())
            .ok_or_else(|| AppError::NotFound("address not found".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mongodb::bson::doc;

    #[test]
    fn test_update_document_skips_blank_fields() {
        let request = UpdateAddressRequest {
            city: Some(" Jeddah ".into()),
            notes: Some("   ".into()),
            ..Default::default()
        };
        assert_eq!(update_document(request), doc! { "city": "Jeddah" });
    }
}
