use serde::Deserialize;
use validator::Validate;

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateBrandRequest {
    #[validate(length(min = 1, max = 100, message = "brand name is required"))]
    pub name: String,
    pub logo: Option<String>,
    #[validate(length(max = 2000, message = "description is too long"))]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateBrandRequest {
    #[validate(length(min = 1, max = 100, message = "brand name cannot be empty"))]
    pub name: Option<String>,
    pub logo: Option<String>,
    #[validate(length(max = 2000, message = "description is too long"))]
    pub description: Option<String>,
    pub is_active: Option<bool>,
}
