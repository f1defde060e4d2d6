pub mod request;
pub mod response;

pub use request::{
    CreateOrderRequest, OrderItemRequest, OrderListQuery, UpdateOrderStatusRequest,
    UpdatePaymentStatusRequest,
};
pub use response::{AppliedCouponResponse, OrderItemResponse, OrderResponse, PaymentResponse};
