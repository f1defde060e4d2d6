//! Back-office account management.

use std::sync::Arc;

use mongodb::bson::{doc, oid::ObjectId};

use singleton_macro::service;

use crate::core::errors::{AppError, AppResult};
use crate::domain::auth::AuthenticatedUser;
use crate::domain::dto::common::{PageQuery, Paginated};
use crate::domain::dto::users::{UserListQuery, UserResponse};
use crate::domain::entities::users::{UserRole, UserStatus};
use crate::repositories::carts::CartRepository;
use crate::repositories::users::{AddressRepository, UserRepository};
use crate::utils::string_utils::parse_object_id;

#[service(name = "user")]
pub struct UserService {
    user_repo: Arc<UserRepository>,
    address_repo: Arc<AddressRepository>,
    cart_repo: Arc<CartRepository>,
}

/// Admins may not lock themselves out of the back office.
fn ensure_not_self(actor: &ObjectId, target: &ObjectId, action: &str) -> AppResult<()> {
    if actor == target {
        return Err(AppError::ValidationError(format!(
            "you cannot {} your own account",
            action
        )));
    }
    Ok(())
}

impl UserService {
    pub async fn list(&self, query: UserListQuery) -> AppResult<Paginated<UserResponse>> {
        let window = PageQuery {
            page: query.page,
            limit: query.limit,
        }
        .window();

        let page = self.user_repo.list(query.search.as_deref(), window).await?;
        Ok(page.map(UserResponse::from))
    }

    pub async fn get(&self, id: &str) -> AppResult<UserResponse> {
        let id = parse_object_id(id, "user")?;
        self.user_repo
            .find_by_id(&id)
            .await?
            .map(UserResponse::from)
            .ok_or_else(|| AppError::NotFound("user not found".to_string()))
    }

    pub async fn update_role(
        &self,
        actor: &AuthenticatedUser,
        id: &str,
        role: UserRole,
    ) -> AppResult<UserResponse> {
        let target = parse_object_id(id, "user")?;
        if role != UserRole::Admin {
            ensure_not_self(&actor.object_id()?, &target, "demote")?;
        }

        let user = self
            .user_repo
            .update_fields(&target, doc! { "role": role.as_str() })
            .await?
            .ok_or_else(|| AppError::NotFound("user not found".to_string()))?;

        log::info!("{} set role of {} to {}", actor.email, user.email, role.as_str());
        Ok(UserResponse::from(user))
    }

    pub async fn update_status(
        &self,
        actor: &AuthenticatedUser,
        id: &str,
        status: UserStatus,
    ) -> AppResult<UserResponse> {
        let target = parse_object_id(id, "user")?;
        if status == UserStatus::Suspended {
            ensure_not_self(&actor.object_id()?, &target, "suspend")?;
        }

        let user = self
            .user_repo
            .update_fields(&target, doc! { "status": status.as_str() })
            .await?
            .ok_or_else(|| AppError::NotFound("user not found".to_string()))?;

        log::info!("{} set status of {} to {}", actor.email, user.email, status.as_str());
        Ok(UserResponse::from(user))
    }

    /// Removes the account with its addresses and cart. Orders are kept for bookkeeping.
    pub async fn delete(&self, actor: &AuthenticatedUser, id: &str) -> AppResult<()> {
        let target = parse_object_id(id, "user")?;
        ensure_not_self(&actor.object_id()?, &target, "delete")?;

        if !self.user_repo.delete(&target).await? {
            return Err(AppError::NotFound("user not found".to_string()));
        }
        self.address_repo.delete_all_for_user(&target).await?;
        self.cart_repo.delete_for_user(&target).await?;

        log::info!("{} deleted user {}", actor.email, target);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_self_protection() {
        let admin = ObjectId::new();
        let other = ObjectId::new();

        assert!(ensure_not_self(&admin, &other, "suspend").is_ok());
        match ensure_not_self(&admin, &admin, "suspend") {
            Err(AppError::ValidationError(msg)) => assert!(msg.contains("suspend")),
            other => panic!("expected validation error, got {:?}", other),
        }
    }
}
