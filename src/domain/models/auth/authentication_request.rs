use crate::domain::entities::users::UserRole;

/// Whether a scope rejects anonymous requests.
#[derive(Debug, Clone, PartialEq)]
pub enum AuthMode {
    Required,
    Optional,
}

/// Role requirement attached to a protected scope.
#[derive(Debug, Clone)]
pub enum RequiredRole {
    Single(UserRole),
    Any(Vec<UserRole>),
}

impl RequiredRole {
    pub fn is_satisfied(&self, role: UserRole) -> bool {
        match self {
            RequiredRole::Single(required) => *required == role,
            RequiredRole::Any(allowed) => allowed.contains(&role),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_role() {
        let admin_only = RequiredRole::Single(UserRole::Admin);
        assert!(admin_only.is_satisfied(UserRole::Admin));
        assert!(!admin_only.is_satisfied(UserRole::User));
    }

    #[test]
    fn test_any_role() {
        let anyone = RequiredRole::Any(vec![UserRole::User, UserRole::Admin]);
        assert!(anyone.is_satisfied(UserRole::User));
        assert!(anyone.is_satisfied(UserRole::Admin));
        assert!(!RequiredRole::Any(vec![]).is_satisfied(UserRole::Admin));
    }
}
