//! Request bodies for the auth and admin user endpoints.

pub mod admin_user_request;
pub mod auth_request;

pub use admin_user_request::{UpdateRoleRequest, UpdateStatusRequest, UserListQuery};
pub use auth_request::{LoginRequest, RegisterRequest};
