pub mod brand_repo;
pub mod product_query;
pub mod product_repo;

pub use brand_repo::BrandRepository;
pub use product_query::{ProductFilter, ProductSort};
pub use product_repo::ProductRepository;
