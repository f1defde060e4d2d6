//! Request middlewares.
//!
//! [`AuthMiddleware`] guards scopes in three flavours: `required()` for
//! customer routes, `admin()` for the back office and `optional()` for routes
//! that only personalise their answer.

mod auth_inner;
pub mod auth_middleware;

pub use auth_middleware::AuthMiddleware;
