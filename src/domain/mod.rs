//! # Domain layer
//!
//! Data types of the perfume shop, free of HTTP and database plumbing.
//!
//! ```text
//! domain/
//! ├── entities/   MongoDB documents (User, Product, Order, Coupon, ...)
//! ├── dto/        request bodies (validated with `validator`) and response shapes
//! └── models/     request identity, JWT claims, upload metadata, notifications
//! ```
//!
//! Entities carry the business rules that need no I/O, for example
//! [`Coupon::check_applicable`](entities::coupons::Coupon::check_applicable) or
//! [`OrderStatus::stock_effect`](entities::orders::OrderStatus::stock_effect),
//! so they can be unit tested without MongoDB.

pub mod dto;
pub mod entities;
pub mod models;

pub use models::*;
