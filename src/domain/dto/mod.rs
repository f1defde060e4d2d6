//! # Data transfer objects
//!
//! Request bodies deserialised by the handlers and the response shapes
//! returned to the storefront. Requests derive [`validator::Validate`];
//! handlers call `validate()` and turn failures into
//! [`AppError::ValidationError`](crate::core::errors::AppError::ValidationError).
//!
//! Responses never expose raw bson: ids become hex strings and dates
//! RFC 3339 strings.
//!
//! ```text
//! dto/
//! ├── common/      ApiResponse envelope, pagination
//! ├── users/       register/login, admin user management
//! ├── products/    catalog CRUD, filters, brands
//! ├── carts/
//! ├── addresses/
//! ├── coupons/
//! ├── orders/      checkout request, order views
//! ├── samples/
//! └── features/    homepage banners
//! ```

pub mod addresses;
pub mod carts;
pub mod common;
pub mod coupons;
pub mod features;
pub mod orders;
pub mod products;
pub mod samples;
pub mod users;

pub use common::{ApiResponse, PageQuery, Paginated};
