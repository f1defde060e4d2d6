//! # Core
//!
//! Building blocks shared by every layer of the shop backend.
//!
//! - [`errors`]: the [`AppError`] taxonomy and its HTTP mapping.
//! - [`registry`]: singleton wiring ([`ServiceLocator`], [`register_repository!`](crate::register_repository))
//!   and the [`Service`] / [`Repository`] traits.
//!
//! ## Startup sequence
//!
//! ```rust,ignore
//! ServiceLocator::set(Arc::new(Database::new().await?));
//! ServiceLocator::set(Arc::new(RedisClient::new().await?));
//! ServiceLocator::initialize_all().await?;
//! ```

pub mod errors;
pub mod registry;

pub use errors::*;
pub use registry::*;
