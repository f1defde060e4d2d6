use serde::Serialize;

use crate::domain::entities::coupons::DiscountType;
use crate::domain::entities::orders::{
    AppliedCoupon, Order, OrderAddress, OrderItem, OrderStatus, Payment, PaymentMethod,
    PaymentStatus,
};
use crate::domain::models::uploads::UploadedFile;
use crate::utils::format_utils::{round_money, to_rfc3339, to_rfc3339_opt};

#[derive(Debug, Clone, Serialize)]
pub struct OrderItemResponse {
    pub product_id: String,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    pub price: f64,
    pub quantity: i64,
    pub line_total: f64,
    pub is_sample: bool,
}

impl From<OrderItem> for OrderItemResponse {
    fn from(item: OrderItem) -> Self {
        Self {
            product_id: item.product_id.to_hex(),
            line_total: round_money(item.price * item.quantity as f64),
            title: item.title,
            image: item.image,
            price: item.price,
            quantity: item.quantity,
            is_sample: item.is_sample,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct PaymentResponse {
    pub method: PaymentMethod,
    pub status: PaymentStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub proof: Option<UploadedFile>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transfer_reference: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub paid_at: Option<String>,
}

impl From<Payment> for PaymentResponse {
    fn from(payment: Payment) -> Self {
        Self {
            method: payment.method,
            status: payment.status,
            proof: payment.proof,
            transfer_reference: payment.transfer_reference,
            paid_at: to_rfc3339_opt(payment.paid_at),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct AppliedCouponResponse {
    pub code: String,
    pub discount_type: DiscountType,
    pub discount_value: f64,
    pub discount_amount: f64,
}

impl From<AppliedCoupon> for AppliedCouponResponse {
    fn from(coupon: AppliedCoupon) -> Self {
        Self {
            code: coupon.code,
            discount_type: coupon.discount_type,
            discount_value: coupon.discount_value,
            discount_amount: coupon.discount_amount,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct OrderResponse {
    pub id: String,
    pub user_id: String,
    pub items: Vec<OrderItemResponse>,
    pub address: OrderAddress,
    pub subtotal: f64,
    pub shipping_fee: f64,
    pub discount: f64,
    pub total: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub coupon: Option<AppliedCouponResponse>,
    pub payment: PaymentResponse,
    pub order_status: OrderStatus,
    pub created_at: String,
    pub updated_at: String,
}

impl From<Order> for OrderResponse {
    fn from(order: Order) -> Self {
        Self {
            id: order.id_string().unwrap_or_default(),
            user_id: order.user_id.to_hex(),
            items: order.items.into_iter().map(OrderItemResponse::from).collect(),
            address: order.address,
            subtotal: order.subtotal,
            shipping_fee: order.shipping_fee,
            discount: order.discount,
            total: order.total,
            coupon: order.coupon.map(AppliedCouponResponse::from),
            payment: PaymentResponse::from(order.payment),
            order_status: order.order_status,
            created_at: to_rfc3339(order.created_at),
            updated_at: to_rfc3339(order.updated_at),
        }
    }
}
