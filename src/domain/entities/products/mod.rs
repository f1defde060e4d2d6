pub mod brand;
pub mod product;

pub use brand::Brand;
pub use product::{Gender, Product};
