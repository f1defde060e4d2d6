pub mod brand_request;
pub mod request;
pub mod response;

pub use brand_request::{CreateBrandRequest, UpdateBrandRequest};
pub use request::{CreateProductRequest, ProductFilterQuery, UpdateProductRequest};
pub use response::{BrandResponse, ProductResponse};
