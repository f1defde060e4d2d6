pub mod address;
pub mod user;

pub use address::Address;
pub use user::{User, UserRole, UserStatus};
