//! Back-office user management bodies.
use serde::Deserialize;
use validator::Validate;

use crate::domain::entities::users::{UserRole, UserStatus};

#[derive(Debug, Deserialize)]
pub struct UpdateRoleRequest {
    pub role: UserRole,
}

#[derive(Debug, Deserialize)]
pub struct UpdateStatusRequest {
    pub status: UserStatus,
}

/// `GET /api/admin/users?search=&page=&limit=`
#[derive(Debug, Default, Deserialize, Validate)]
pub struct UserListQuery {
    #[validate(length(max = 100, message = "search term is too long"))]
    pub search: Option<String>,
    pub page: Option<u64>,
    pub limit: Option<u64>,
}
