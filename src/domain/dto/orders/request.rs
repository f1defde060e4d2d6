use serde::Deserialize;
use validator::{Validate, ValidationError};

use crate::domain::dto::addresses::AddressRequest;
use crate::domain::entities::orders::{PaymentMethod, PaymentStatus};

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct OrderItemRequest {
    #[serde(alias = "productId")]
    #[validate(length(equal = 24, message = "invalid product id"))]
    pub product_id: String,

    #[validate(range(min = 1, max = 100, message = "quantity must be between 1 and 100"))]
    pub quantity: i64,
}

/// Body of `POST /api/orders`.
///
/// `items` falls back to the caller's cart when omitted. Exactly one of
/// `address_id` and `address` must be given.
#[derive(Debug, Clone, Deserialize, Validate)]
#[validate(schema(function = "validate_order_shape"))]
pub struct CreateOrderRequest {
    #[validate(nested)]
    pub items: Option<Vec<OrderItemRequest>>,

    #[serde(alias = "addressId")]
    pub address_id: Option<String>,

    #[validate(nested)]
    pub address: Option<AddressRequest>,

    #[serde(alias = "paymentMethod")]
    pub payment_method: PaymentMethod,

    #[serde(alias = "couponCode")]
    #[validate(length(min = 1, max = 30, message = "invalid coupon code"))]
    pub coupon_code: Option<String>,

    /// File name returned by `POST /api/orders/payment-proof`.
    #[serde(alias = "paymentProof")]
    pub payment_proof: Option<String>,

    #[serde(alias = "transferReference")]
    #[validate(length(max = 100, message = "transfer reference is too long"))]
    pub transfer_reference: Option<String>,
}

fn validate_order_shape(request: &CreateOrderRequest) -> Result<(), ValidationError> {
    match (&request.address_id, &request.address) {
        (Some(_), Some(_)) => {
            return Err(ValidationError::new("ambiguous_address")
                .with_message("provide either address_id or address, not both".into()));
        }
        (None, None) => {
            return Err(ValidationError::new("missing_address")
                .with_message("a delivery address is required".into()));
        }
        _ => {}
    }
    if matches!(&request.items, Some(items) if items.is_empty()) {
        return Err(ValidationError::new("empty_items")
            .with_message("order must contain at least one item".into()));
    }
    Ok(())
}

impl CreateOrderRequest {
    pub fn coupon_code(&self) -> Option<&str> {
        self.coupon_code
            .as_deref()
            .map(str::trim)
            .filter(|code| !code.is_empty())
    }
}

/// Body of `PUT /api/admin/orders/{id}/status`.
///
/// The status stays a string so older camelCase names (`inProcess`) are accepted.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateOrderStatusRequest {
    #[serde(alias = "orderStatus")]
    #[validate(length(min = 1, message = "status is required"))]
    pub status: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UpdatePaymentStatusRequest {
    pub status: PaymentStatus,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct OrderListQuery {
    pub status: Option<String>,
    pub page: Option<u64>,
    pub limit: Option<u64>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_cart_checkout_with_saved_address() {
        let request: CreateOrderRequest = serde_json::from_value(json!({
            "addressId": "65f1a2b3c4d5e6f708192a3b",
            "paymentMethod": "cod"
        }))
        .unwrap();

        assert!(request.validate().is_ok());
        assert!(request.items.is_none());
        assert_eq!(request.payment_method, PaymentMethod::Cod);
    }

    #[test]
    fn test_address_is_required_once() {
        let neither: CreateOrderRequest =
            serde_json::from_value(json!({"payment_method": "cod"})).unwrap();
        assert!(neither.validate().is_err());

        let both: CreateOrderRequest = serde_json::from_value(json!({
            "payment_method": "cod",
            "address_id": "65f1a2b3c4d5e6f708192a3b",
            "address": {
                "full_name": "Sara Ahmed",
                "address": "12 King Fahd Rd",
                "city": "Riyadh",
                "postal_code": "12345",
                "phone": "0501234567"
            }
        }))
        .unwrap();
        assert!(both.validate().is_err());
    }

    #[test]
    fn test_nested_item_quantity_checked() {
        let request: CreateOrderRequest = serde_json::from_value(json!({
            "payment_method": "bank_transfer",
            "address_id": "65f1a2b3c4d5e6f708192a3b",
            "items": [{"product_id": "65f1a2b3c4d5e6f708192a3c", "quantity": 0}]
        }))
        .unwrap();
        assert!(request.validate().is_err());
    }

    #[test]
    fn test_blank_coupon_code_is_ignored() {
        let request: CreateOrderRequest = serde_json::from_value(json!({
            "payment_method": "cod",
            "address_id": "65f1a2b3c4d5e6f708192a3b",
            "coupon_code": "   "
        }))
        .unwrap();
        assert_eq!(request.coupon_code(), None);
    }
}
