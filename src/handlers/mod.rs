//! HTTP handlers, one module per resource.
//!
//! Handlers validate the payload, call a singleton service and wrap the
//! result in [`ApiResponse`](crate::domain::dto::common::ApiResponse). Errors
//! propagate as [`AppError`](crate::core::errors::AppError) with `?`.
//! Scopes and their guards are assembled in [`crate::routes`].

pub mod addresses;
pub mod admin_orders;
pub mod admin_products;
pub mod auth;
pub mod brands;
pub mod carts;
pub mod coupons;
pub mod features;
pub mod health;
pub mod notifications;
pub mod orders;
pub mod products;
pub mod samples;
pub mod users;
