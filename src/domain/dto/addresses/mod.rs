//! Delivery address bodies.
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use crate::domain::entities::orders::OrderAddress;
use crate::domain::entities::users::Address;

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct AddressRequest {
    #[serde(alias = "fullName")]
    #[validate(length(min = 2, max = 100, message = "full name is required"))]
    pub full_name: String,

    #[validate(length(min = 3, max = 300, message = "address is required"))]
    pub address: String,

    #[validate(length(min = 2, max = 100, message = "city is required"))]
    pub city: String,

    #[serde(alias = "pincode", alias = "postalCode")]
    #[validate(length(min = 3, max = 12, message = "postal code is invalid"))]
    pub postal_code: String,

    #[validate(custom(function = "validate_phone"))]
    pub phone: String,

    #[validate(length(max = 500, message = "notes are too long"))]
    pub notes: Option<String>,
}

impl AddressRequest {
    pub fn into_snapshot(self) -> OrderAddress {
        OrderAddress {
            full_name: self.full_name.trim().to_string(),
            address: self.address.trim().to_string(),
            city: self.city.trim().to_string(),
            postal_code: self.postal_code.trim().to_string(),
            phone: self.phone.trim().to_string(),
            notes: self.notes.filter(|notes| !notes.trim().is_empty()),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateAddressRequest {
    #[serde(alias = "fullName")]
    #[validate(length(min = 2, max = 100, message = "full name cannot be empty"))]
    pub full_name: Option<String>,
    #[validate(length(min = 3, max = 300, message = "address cannot be empty"))]
    pub address: Option<String>,
    #[validate(length(min = 2, max = 100, message = "city cannot be empty"))]
    pub city: Option<String>,
    #[serde(alias = "pincode", alias = "postalCode")]
    #[validate(length(min = 3, max = 12, message = "postal code is invalid"))]
    pub postal_code: Option<String>,
    #[validate(custom(function = "validate_phone"))]
    pub phone: Option<String>,
    #[validate(length(max = 500, message = "notes are too long"))]
    pub notes: Option<String>,
}

/// Digits with an optional leading `+`, spaces and dashes allowed.
fn validate_phone(phone: &str) -> Result<(), ValidationError> {
    let trimmed = phone.trim();
    let body = trimmed.strip_prefix('+').unwrap_or(trimmed);
    let digits = body.chars().filter(|c| c.is_ascii_digit()).count();
    let well_formed = body
        .chars()
        .all(|c| c.is_ascii_digit() || c == ' ' || c == '-');

    if !well_formed || !(7..=15).contains(&digits) {
        return Err(ValidationError::new("invalid_phone")
            .with_message("please enter a valid phone number".into()));
    }
    Ok(())
}

#[derive(Debug, Clone, Serialize)]
pub struct AddressResponse {
    pub id: String,
    pub full_name: String,
    pub address: String,
    pub city: String,
    pub postal_code: String,
    pub phone: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl From<Address> for AddressResponse {
    fn from(address: Address) -> Self {
        Self {
            id: address.id.map(|id| id.to_hex()).unwrap_or_default(),
            full_name: address.full_name,
            address: address.address,
            city: address.city,
            postal_code: address.postal_code,
            phone: address.phone,
            notes: address.notes,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(phone: &str) -> AddressRequest {
        AddressRequest {
            full_name: "Sara Ahmed".into(),
            address: "12 King Fahd Rd".into(),
            city: "Riyadh".into(),
            postal_code: "12345".into(),
            phone: phone.into(),
            notes: Some("  ".into()),
        }
    }

    #[test]
    fn test_phone_formats() {
        assert!(request("+966 50 123 4567").validate().is_ok());
        assert!(request("050-123-4567").validate().is_ok());
        assert!(request("12ab").validate().is_err());
        assert!(request("123").validate().is_err());
    }

    #[test]
    fn test_snapshot_drops_blank_notes() {
        let snapshot = request("0501234567").into_snapshot();
        assert_eq!(snapshot.city, "Riyadh");
        assert!(snapshot.notes.is_none());
    }
}
