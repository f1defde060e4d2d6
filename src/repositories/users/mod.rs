pub mod address_repo;
pub mod user_repo;

pub use address_repo::AddressRepository;
pub use user_repo::UserRepository;
