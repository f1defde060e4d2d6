//! Data-access layer: one repository per MongoDB collection.
//!
//! Every repository is a process-wide singleton declared with
//! [`register_repository!`](crate::register_repository) and creates its
//! indexes in [`Repository::init`](crate::core::registry::Repository::init)
//! during startup. Product reads are cached in Redis.
//!
//! ```rust,ignore
//! use crate::repositories::products::ProductRepository;
//!
//! let product = ProductRepository::instance().find_by_id(&id).await?;
//! ```

pub mod carts;
pub mod coupons;
pub mod features;
pub mod orders;
pub mod products;
pub mod samples;
pub mod users;
