//! Environment-driven configuration.
//!
//! Each settings group is a zero-sized type with associated functions that read
//! the environment on demand, so tests and tools can override a value by
//! setting a variable before the first call.

pub mod auth_config;
pub mod data_config;
pub mod shop_config;

pub use auth_config::*;
pub use data_config::*;
pub use shop_config::*;
