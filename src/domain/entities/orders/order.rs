//! Orders (`orders` collection).
//!
//! An order is a self-contained snapshot: item titles, prices, the delivery
//! address and the coupon are copied at checkout so that later catalog or
//! address edits never change what the customer bought.

use mongodb::bson::{oid::ObjectId, DateTime};
use serde::{Deserialize, Serialize};

use crate::domain::entities::coupons::DiscountType;
use crate::domain::models::uploads::UploadedFile;

/// Fulfilment state, changed by the back office.
///
/// Any status may follow any other. Only `Cancelled` and `Rejected` stop
/// holding stock, see [`OrderStatus::stock_effect`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    #[default]
    Pending,
    Confirmed,
    InProcess,
    InShipping,
    Delivered,
    Rejected,
    Cancelled,
}

/// Stock movement implied by a status change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StockEffect {
    Unchanged,
    /// Units go back to the shelf.
    Release,
    /// Units are taken from the shelf again.
    Reserve,
}

impl OrderStatus {
    pub const ALL: [OrderStatus; 7] = [
        OrderStatus::Pending,
        OrderStatus::Confirmed,
        OrderStatus::InProcess,
        OrderStatus::InShipping,
        OrderStatus::Delivered,
        OrderStatus::Rejected,
        OrderStatus::Cancelled,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Confirmed => "confirmed",
            OrderStatus::InProcess => "in_process",
            OrderStatus::InShipping => "in_shipping",
            OrderStatus::Delivered => "delivered",
            OrderStatus::Rejected => "rejected",
            OrderStatus::Cancelled => "cancelled",
        }
    }

    /// Accepts snake_case as well as the camelCase names used by older clients.
    pub fn from_name(name: &str) -> Option<Self> {
        let normalized = name.trim().to_lowercase().replace(['-', ' '], "_");
        match normalized.as_str() {
            "pending" => Some(OrderStatus::Pending),
            "confirmed" => Some(OrderStatus::Confirmed),
            "in_process" | "inprocess" | "processing" => Some(OrderStatus::InProcess),
            "in_shipping" | "inshipping" | "shipped" => Some(OrderStatus::InShipping),
            "delivered" => Some(OrderStatus::Delivered),
            "rejected" => Some(OrderStatus::Rejected),
            "cancelled" | "canceled" => Some(OrderStatus::Cancelled),
            _ => None,
        }
    }

    pub fn holds_stock(&self) -> bool {
        !matches!(self, OrderStatus::Rejected | OrderStatus::Cancelled)
    }

    pub fn stock_effect(from: OrderStatus, to: OrderStatus) -> StockEffect {
        match (from.holds_stock(), to.holds_stock()) {
            (true, false) => StockEffect::Release,
            (false, true) => StockEffect::Reserve,
            _ => StockEffect::Unchanged,
        }
    }

    /// Customers may withdraw an order until it is being prepared.
    pub fn cancellable_by_customer(&self) -> bool {
        matches!(self, OrderStatus::Pending | OrderStatus::Confirmed)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    Cod,
    BankTransfer,
    FreeSample,
}

impl PaymentMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentMethod::Cod => "cod",
            PaymentMethod::BankTransfer => "bank_transfer",
            PaymentMethod::FreeSample => "free_sample",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    #[default]
    Pending,
    AwaitingVerification,
    Paid,
    Rejected,
}

impl PaymentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentStatus::Pending => "pending",
            PaymentStatus::AwaitingVerification => "awaiting_verification",
            PaymentStatus::Paid => "paid",
            PaymentStatus::Rejected => "rejected",
        }
    }

    /// Initial status for a payment method.
    pub fn initial_for(method: PaymentMethod) -> Self {
        match method {
            PaymentMethod::BankTransfer => PaymentStatus::AwaitingVerification,
            PaymentMethod::Cod | PaymentMethod::FreeSample => PaymentStatus::Pending,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Payment {
    pub method: PaymentMethod,
    pub status: PaymentStatus,
    /// Bank-transfer receipt image.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub proof: Option<UploadedFile>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transfer_reference: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub paid_at: Option<DateTime>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderItem {
    pub product_id: ObjectId,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    /// Unit price at checkout (0 for samples).
    pub price: f64,
    pub quantity: i64,
    #[serde(default)]
    pub is_sample: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderAddress {
    pub full_name: String,
    pub address: String,
    pub city: String,
    pub postal_code: String,
    pub phone: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppliedCoupon {
    pub coupon_id: ObjectId,
    pub code: String,
    pub discount_type: DiscountType,
    pub discount_value: f64,
    pub discount_amount: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub user_id: ObjectId,
    pub items: Vec<OrderItem>,
    pub address: OrderAddress,
    pub subtotal: f64,
    pub shipping_fee: f64,
    pub discount: f64,
    pub total: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub coupon: Option<AppliedCoupon>,
    pub payment: Payment,
    pub order_status: OrderStatus,
    pub created_at: DateTime,
    pub updated_at: DateTime,
}

impl Order {
    pub fn id_string(&self) -> Option<String> {
        self.id.as_ref().map(|id| id.to_hex())
    }

    pub fn item_count(&self) -> i64 {
        self.items.iter().map(|item| item.quantity).sum()
    }

    pub fn is_owned_by(&self, user_id: &ObjectId) -> bool {
        &self.user_id == user_id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_names_roundtrip() {
        for status in OrderStatus::ALL {
            assert_eq!(OrderStatus::from_name(status.as_str()), Some(status));
        }
        assert_eq!(OrderStatus::from_name("inShipping"), Some(OrderStatus::InShipping));
        assert_eq!(OrderStatus::from_name("canceled"), Some(OrderStatus::Cancelled));
        assert_eq!(OrderStatus::from_name("lost"), None);
    }

    #[test]
    fn test_stock_effect() {
        use OrderStatus::*;
        assert_eq!(OrderStatus::stock_effect(Pending, Cancelled), StockEffect::Release);
        assert_eq!(OrderStatus::stock_effect(InShipping, Rejected), StockEffect::Release);
        assert_eq!(OrderStatus::stock_effect(Rejected, Confirmed), StockEffect::Reserve);
        assert_eq!(OrderStatus::stock_effect(Cancelled, Rejected), StockEffect::Unchanged);
        assert_eq!(OrderStatus::stock_effect(Pending, Delivered), StockEffect::Unchanged);
    }

    #[test]
    fn test_customer_cancellation_window() {
        assert!(OrderStatus::Pending.cancellable_by_customer());
        assert!(OrderStatus::Confirmed.cancellable_by_customer());
        assert!(!OrderStatus::InShipping.cancellable_by_customer());
        assert!(!OrderStatus::Cancelled.cancellable_by_customer());
    }

    #[test]
    fn test_initial_payment_status() {
        assert_eq!(
            PaymentStatus::initial_for(PaymentMethod::BankTransfer),
            PaymentStatus::AwaitingVerification
        );
        assert_eq!(PaymentStatus::initial_for(PaymentMethod::Cod), PaymentStatus::Pending);
        assert_eq!(serde_json::to_string(&PaymentMethod::BankTransfer).unwrap(), "\"bank_transfer\"");
    }
}
