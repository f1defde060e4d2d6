pub mod api_response;
pub mod pagination;

pub use api_response::ApiResponse;
pub use pagination::{PageQuery, PageWindow, Paginated};
