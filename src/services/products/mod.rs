pub mod brand_service;
pub mod product_service;

pub use brand_service::BrandService;
pub use product_service::ProductService;
