pub mod order;

pub use order::{
    AppliedCoupon, Order, OrderAddress, OrderItem, OrderStatus, Payment, PaymentMethod,
    PaymentStatus, StockEffect,
};
