//! Authentication: password accounts and HS256 session tokens.

pub mod auth_service;
pub mod token_service;

pub use auth_service::AuthService;
pub use token_service::TokenService;
