//! Perfume shop backend.
//!
//! REST API of a perfume storefront and its back office: catalog and brands,
//! cart and saved addresses, checkout with coupons and three payment methods
//! (cash on delivery, bank transfer with a proof image, free samples), order
//! lifecycle and a live feed of new orders for administrators.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────┐
//! │     Routes      │ ← scopes + auth guards
//! └─────────────────┘
//!          │
//!          ▼
//! ┌─────────────────┐
//! │    Handlers     │ ← validation, response envelope
//! └─────────────────┘
//!          │
//!          ▼
//! ┌─────────────────┐
//! │    Services     │ ← checkout, pricing, stock, coupons
//! └─────────────────┘
//!          │
//!          ▼
//! ┌─────────────────┐
//! │  Repositories   │ ← guarded MongoDB updates, Redis cache
//! └─────────────────┘
//!          │
//!          ▼
//! ┌─────────────────┐
//! │ MongoDB + Redis │
//! └─────────────────┘
//! ```
//!
//! Services and repositories are process-wide singletons declared with
//! `#[singleton_macro::service]` / [`register_repository!`] and built by
//! [`core::registry::ServiceLocator::initialize_all`].
//!
//! ```rust,ignore
//! use perfume_shop_backend::services::orders::OrderService;
//!
//! let order = OrderService::instance().create(&user_id, request).await?;
//! ```

pub mod caching;
pub mod config;
pub mod core;
pub mod db;
pub mod domain;
pub mod handlers;
pub mod middlewares;
pub mod repositories;
pub mod routes;
pub mod services;
pub mod utils;
