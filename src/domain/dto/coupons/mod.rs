//! Coupon administration and checkout validation bodies.
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use crate::domain::entities::coupons::{Coupon, DiscountType};
use crate::utils::format_utils::to_rfc3339;
use crate::utils::string_utils::deserialize_nullable;

#[derive(Debug, Clone, Deserialize, Validate)]
#[validate(schema(function = "validate_new_coupon"))]
pub struct CreateCouponRequest {
    #[validate(length(min = 3, max = 30, message = "code must be 3-30 characters"))]
    #[validate(custom(function = "validate_code"))]
    pub code: String,

    #[serde(default)]
    #[validate(length(max = 500, message = "description is too long"))]
    pub description: String,

    pub discount_type: DiscountType,

    #[validate(range(exclusive_min = 0.0, message = "discount value must be positive"))]
    pub discount_value: f64,

    #[serde(default)]
    #[validate(range(min = 0.0, message = "minimum order amount cannot be negative"))]
    pub min_order_amount: f64,

    #[validate(range(exclusive_min = 0.0, message = "maximum discount must be positive"))]
    pub max_discount_amount: Option<f64>,

    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,

    #[validate(range(min = 1, message = "usage limit must be at least 1"))]
    pub usage_limit: Option<i64>,

    #[validate(range(min = 1, message = "per-user limit must be at least 1"))]
    pub per_user_limit: Option<i64>,

    pub is_active: Option<bool>,
}

fn validate_new_coupon(request: &CreateCouponRequest) -> Result<(), ValidationError> {
    check_window(Some(request.start_date), Some(request.end_date))?;
    check_percentage(Some(request.discount_type), Some(request.discount_value))
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[validate(schema(function = "validate_coupon_update"))]
pub struct UpdateCouponRequest {
    #[validate(length(max = 500, message = "description is too long"))]
    pub description: Option<String>,
    pub discount_type: Option<DiscountType>,
    #[validate(range(exclusive_min = 0.0, message = "discount value must be positive"))]
    pub discount_value: Option<f64>,
    #[validate(range(min = 0.0, message = "minimum order amount cannot be negative"))]
    pub min_order_amount: Option<f64>,
    /// `null` removes the cap.
    #[serde(default, deserialize_with = "deserialize_nullable")]
    #[validate(range(exclusive_min = 0.0, message = "maximum discount must be positive"))]
    pub max_discount_amount: Option<Option<f64>>,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
    /// `null` makes the coupon unlimited again.
    #[serde(default, deserialize_with = "deserialize_nullable")]
    #[validate(range(min = 1, message = "usage limit must be at least 1"))]
    pub usage_limit: Option<Option<i64>>,
    #[validate(range(min = 1, message = "per-user limit must be at least 1"))]
    pub per_user_limit: Option<i64>,
    pub is_active: Option<bool>,
}

fn validate_coupon_update(request: &UpdateCouponRequest) -> Result<(), ValidationError> {
    check_window(request.start_date, request.end_date)?;
    check_percentage(request.discount_type, request.discount_value)
}

fn validate_code(code: &str) -> Result<(), ValidationError> {
    if !code.trim().chars().all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_') {
        return Err(ValidationError::new("invalid_code")
            .with_message("code may only contain letters, digits, '-' and '_'".into()));
    }
    Ok(())
}

fn check_window(
    start: Option<DateTime<Utc>>,
    end: Option<DateTime<Utc>>,
) -> Result<(), ValidationError> {
    match (start, end) {
        (Some(start), Some(end)) if end <= start => Err(ValidationError::new("invalid_window")
            .with_message("end date must be after start date".into())),
        _ => Ok(()),
    }
}

fn check_percentage(
    discount_type: Option<DiscountType>,
    value: Option<f64>,
) -> Result<(), ValidationError> {
    match (discount_type, value) {
        (Some(DiscountType::Percentage), Some(value)) if value > 100.0 => {
            Err(ValidationError::new("invalid_percentage")
                .with_message("percentage discount cannot exceed 100".into()))
        }
        _ => Ok(()),
    }
}

/// Body of `POST /api/shop/coupons/validate`.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ValidateCouponRequest {
    #[validate(length(min = 1, max = 30, message = "coupon code is required"))]
    pub code: String,

    #[serde(alias = "orderAmount", alias = "order_amount")]
    #[validate(range(min = 0.0, message = "subtotal cannot be negative"))]
    pub subtotal: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct CouponResponse {
    pub id: String,
    pub code: String,
    pub description: String,
    pub discount_type: DiscountType,
    pub discount_value: f64,
    pub min_order_amount: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_discount_amount: Option<f64>,
    pub start_date: String,
    pub end_date: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub usage_limit: Option<i64>,
    pub used_count: i64,
    pub per_user_limit: i64,
    pub is_active: bool,
    pub created_at: String,
}

impl From<Coupon> for CouponResponse {
    fn from(coupon: Coupon) -> Self {
        Self {
            id: coupon.id.map(|id| id.to_hex()).unwrap_or_default(),
            code: coupon.code,
            description: coupon.description,
            discount_type: coupon.discount_type,
            discount_value: coupon.discount_value,
            min_order_amount: coupon.min_order_amount,
            max_discount_amount: coupon.max_discount_amount,
            start_date: to_rfc3339(coupon.start_date),
            end_date: to_rfc3339(coupon.end_date),
            usage_limit: coupon.usage_limit,
            used_count: coupon.used_count,
            per_user_limit: coupon.per_user_limit,
            is_active: coupon.is_active,
            created_at: to_rfc3339(coupon.created_at),
        }
    }
}

/// Outcome of a successful coupon check.
#[derive(Debug, Clone, Serialize)]
pub struct CouponValidationResponse {
    pub valid: bool,
    pub code: String,
    pub discount_type: DiscountType,
    pub discount_value: f64,
    pub discount: f64,
    pub subtotal_after_discount: f64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn create_request() -> CreateCouponRequest {
        let now = Utc::now();
        CreateCouponRequest {
            code: "SUMMER-10".into(),
            description: String::new(),
            discount_type: DiscountType::Percentage,
            discount_value: 10.0,
            min_order_amount: 100.0,
            max_discount_amount: Some(50.0),
            start_date: now,
            end_date: now + Duration::days(30),
            usage_limit: Some(100),
            per_user_limit: None,
            is_active: None,
        }
    }

    #[test]
    fn test_valid_coupon_request() {
        assert!(create_request().validate().is_ok());
    }

    #[test]
    fn test_end_before_start_rejected() {
        let mut request = create_request();
        request.end_date = request.start_date - Duration::days(1);
        assert!(request.validate().is_err());
    }

    #[test]
    fn test_percentage_over_hundred_rejected() {
        let request = CreateCouponRequest { discount_value: 150.0, ..create_request() };
        assert!(request.validate().is_err());

        let fixed = CreateCouponRequest {
            discount_type: DiscountType::Fixed,
            discount_value: 150.0,
            ..create_request()
        };
        assert!(fixed.validate().is_ok());
    }

    #[test]
    fn test_code_charset() {
        let request = CreateCouponRequest { code: "BAD CODE!".into(), ..create_request() };
        let errors = request.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("code"));
    }

    #[test]
    fn test_update_null_limit_is_kept_apart_from_absent() {
        let request: UpdateCouponRequest = serde_json::from_value(serde_json::json!({
            "usage_limit": null,
            "max_discount_amount": 25.0
        }))
        .unwrap();

        assert_eq!(request.usage_limit, Some(None));
        assert_eq!(request.max_discount_amount, Some(Some(25.0)));
        assert_eq!(request.per_user_limit, None);
        assert!(request.validate().is_ok());
    }

    #[test]
    fn test_update_limit_still_range_checked() {
        let request: UpdateCouponRequest =
            serde_json::from_value(serde_json::json!({ "usage_limit": 0 })).unwrap();

        let errors = request.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("usage_limit"));
    }

    #[test]
    fn test_validate_request_accepts_legacy_field_name() {
        let request: ValidateCouponRequest =
            serde_json::from_value(serde_json::json!({"code": "save10", "orderAmount": 120.0}))
                .unwrap();
        assert_eq!(request.subtotal, 120.0);
    }
}
