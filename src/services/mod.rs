//! Business logic of the shop.
//!
//! Every service is a process-wide singleton declared with
//! `#[singleton_macro::service]` and reached through
//! `instance()`. Services talk to MongoDB only through the repositories and
//! return [`AppResult`](crate::core::errors::AppResult), so handlers stay thin.
//!
//! ```rust,ignore
//! use crate::services::orders::OrderService;
//!
//! let order = OrderService::instance().create(&user_id, request).await?;
//! ```

pub mod addresses;
pub mod auth;
pub mod carts;
pub mod coupons;
pub mod features;
pub mod notifications;
pub mod orders;
pub mod products;
pub mod samples;
pub mod uploads;
pub mod users;
