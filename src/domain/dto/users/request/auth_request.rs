//! Register / login bodies.
use serde::Deserialize;
use validator::{Validate, ValidationError};

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(length(min = 2, max = 50, message = "user name must be 2-50 characters"))]
    pub user_name: String,

    #[validate(email(message = "please enter a valid email address"))]
    pub email: String,

    #[validate(length(min = 6, max = 128, message = "password must be at least 6 characters"))]
    #[validate(custom(function = "validate_password"))]
    pub password: String,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(email(message = "please enter a valid email address"))]
    pub email: String,

    #[validate(length(min = 1, message = "password is required"))]
    pub password: String,
}

fn validate_password(password: &str) -> Result<(), ValidationError> {
    if password.trim().is_empty() {
        return Err(ValidationError::new("blank_password")
            .with_message("password cannot be blank".into()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_validation() {
        let ok = RegisterRequest {
            user_name: "layla".into(),
            email: "layla@example.com".into(),
            password: "secret1".into(),
        };
        assert!(ok.validate().is_ok());

        let bad_email = RegisterRequest { email: "not-an-email".into(), ..ok.clone() };
        assert!(bad_email.validate().is_err());

        let blank = RegisterRequest { password: "       ".into(), ..ok };
        assert!(blank.validate().is_err());
    }

    #[test]
    fn test_login_requires_password() {
        let request = LoginRequest { email: "a@b.co".into(), password: String::new() };
        let errors = request.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("password"));
    }
}
