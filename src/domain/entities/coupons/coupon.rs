//! Discount coupons (`coupons` collection).
//!
//! A coupon applies to an order when it is active, inside its date window,
//! the order subtotal reaches `min_order_amount`, and neither the global
//! `usage_limit` nor the customer's `per_user_limit` is exhausted.

use mongodb::bson::{oid::ObjectId, DateTime};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::utils::format_utils::round_money;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiscountType {
    Percentage,
    Fixed,
}

impl DiscountType {
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_lowercase().as_str() {
            "percentage" | "percent" => Some(DiscountType::Percentage),
            "fixed" => Some(DiscountType::Fixed),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CouponUsage {
    pub user_id: ObjectId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order_id: Option<ObjectId>,
    pub used_at: DateTime,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Coupon {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    /// Upper-cased, unique.
    pub code: String,
    #[serde(default)]
    pub description: String,
    pub discount_type: DiscountType,
    pub discount_value: f64,
    #[serde(default)]
    pub min_order_amount: f64,
    /// Cap for percentage coupons.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_discount_amount: Option<f64>,
    pub start_date: DateTime,
    pub end_date: DateTime,
    /// `None` means unlimited.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub usage_limit: Option<i64>,
    #[serde(default)]
    pub used_count: i64,
    #[serde(default = "default_per_user_limit")]
    pub per_user_limit: i64,
    #[serde(default)]
    pub used_by: Vec<CouponUsage>,
    pub is_active: bool,
    pub created_at: DateTime,
    pub updated_at: DateTime,
}

fn default_per_user_limit() -> i64 {
    1
}

/// Why a coupon cannot be applied to an order.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CouponRejection {
    #[error("coupon is not active")]
    Inactive,
    #[error("coupon is not valid yet")]
    NotStarted,
    #[error("coupon has expired")]
    Expired,
    #[error("order subtotal must be at least {minimum:.2} to use this coupon")]
    BelowMinimum { minimum: f64 },
    #[error("coupon usage limit has been reached")]
    UsageLimitReached,
    #[error("you have already used this coupon")]
    UserLimitReached,
}

impl CouponRejection {
    /// Stable machine-readable reason.
    pub fn code(&self) -> &'static str {
        match self {
            CouponRejection::Inactive => "inactive",
            CouponRejection::NotStarted => "not_started",
            CouponRejection::Expired => "expired",
            CouponRejection::BelowMinimum { .. } => "below_minimum",
            CouponRejection::UsageLimitReached => "usage_limit_reached",
            CouponRejection::UserLimitReached => "user_limit_reached",
        }
    }
}

impl Coupon {
    pub fn normalize_code(code: &str) -> String {
        code.trim().to_uppercase()
    }

    pub fn uses_by(&self, user_id: &ObjectId) -> i64 {
        self.used_by
            .iter()
            .filter(|usage| &usage.user_id == user_id)
            .count() as i64
    }

    /// Checks every applicability rule in a fixed order and reports the first failure.
    pub fn check_applicable(
        &self,
        subtotal: f64,
        user_id: &ObjectId,
        now: DateTime,
    ) -> Result<(), CouponRejection> {
        if !self.is_active {
            return Err(CouponRejection::Inactive);
        }
        let now_ms = now.timestamp_millis();
        if now_ms < self.start_date.timestamp_millis() {
            return Err(CouponRejection::NotStarted);
        }
        if now_ms > self.end_date.timestamp_millis() {
            return Err(CouponRejection::Expired);
        }
        if subtotal < self.min_order_amount {
            return Err(CouponRejection::BelowMinimum {
                minimum: self.min_order_amount,
            });
        }
        if let Some(limit) = self.usage_limit {
            if self.used_count >= limit {
                return Err(CouponRejection::UsageLimitReached);
            }
        }
        if self.uses_by(user_id) >= self.per_user_limit {
            return Err(CouponRejection::UserLimitReached);
        }
        Ok(())
    }

    /// Discount granted on `subtotal`, never more than the subtotal itself.
    pub fn discount_for(&self, subtotal: f64) -> f64 {
        if subtotal <= 0.0 {
            return 0.0;
        }
        let raw = match self.discount_type {
            DiscountType::Percentage => {
                let percent = self.discount_value.clamp(0.0, 100.0);
                let amount = subtotal * percent / 100.0;
                match self.max_discount_amount {
                    Some(cap) if cap > 0.0 => amount.min(cap),
                    _ => amount,
                }
            }
            DiscountType::Fixed => self.discount_value.max(0.0),
        };
        round_money(raw.min(subtotal))
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;

    const DAY_MS: i64 = 24 * 60 * 60 * 1000;

    pub fn coupon(code: &str, discount_type: DiscountType, value: f64) -> Coupon {
        let now = DateTime::now().timestamp_millis();
        Coupon {
            id: Some(ObjectId::new()),
            code: code.to_string(),
            description: String::new(),
            discount_type,
            discount_value: value,
            min_order_amount: 0.0,
            max_discount_amount: None,
            start_date: DateTime::from_millis(now - DAY_MS),
            end_date: DateTime::from_millis(now + DAY_MS),
            usage_limit: None,
            used_count: 0,
            per_user_limit: 1,
            used_by: Vec::new(),
            is_active: true,
            created_at: DateTime::from_millis(now),
            updated_at: DateTime::from_millis(now),
        }
    }

    pub fn days_from_now(days: i64) -> DateTime {
        DateTime::from_millis(DateTime::now().timestamp_millis() + days * DAY_MS)
    }
}

#[cfg(test)]
mod tests {
    use super::fixtures::{coupon, days_from_now};
    use super::*;

    #[test]
    fn test_valid_coupon_is_applicable() {
        let welcome = coupon("WELCOME10", DiscountType::Percentage, 10.0);
        assert_eq!(welcome.check_applicable(200.0, &ObjectId::new(), DateTime::now()), Ok(()));
    }

    #[test]
    fn test_inactive_and_date_window() {
        let user = ObjectId::new();
        let mut c = coupon("SUMMER", DiscountType::Fixed, 20.0);

        c.is_active = false;
        assert_eq!(c.check_applicable(100.0, &user, DateTime::now()), Err(CouponRejection::Inactive));

        c.is_active = true;
        c.start_date = days_from_now(2);
        c.end_date = days_from_now(5);
        assert_eq!(c.check_applicable(100.0, &user, DateTime::now()), Err(CouponRejection::NotStarted));

        c.start_date = days_from_now(-10);
        c.end_date = days_from_now(-1);
        let rejection = c.check_applicable(100.0, &user, DateTime::now()).unwrap_err();
        assert_eq!(rejection, CouponRejection::Expired);
        assert_eq!(rejection.code(), "expired");
    }

    #[test]
    fn test_minimum_order_amount() {
        let mut c = coupon("BIG", DiscountType::Fixed, 50.0);
        c.min_order_amount = 300.0;

        let rejection = c
            .check_applicable(299.99, &ObjectId::new(), DateTime::now())
            .unwrap_err();
        assert_eq!(rejection.code(), "below_minimum");
        assert!(rejection.to_string().contains("300.00"));
        assert!(c.check_applicable(300.0, &ObjectId::new(), DateTime::now()).is_ok());
    }

    #[test]
    fn test_usage_limits() {
        let user = ObjectId::new();
        let mut c = coupon("ONCE", DiscountType::Fixed, 5.0);

        c.usage_limit = Some(2);
        c.used_count = 2;
        assert_eq!(
            c.check_applicable(100.0, &user, DateTime::now()),
            Err(CouponRejection::UsageLimitReached)
        );

        c.used_count = 1;
        c.used_by.push(CouponUsage {
            user_id: user,
            order_id: None,
            used_at: DateTime::now(),
        });
        assert_eq!(
            c.check_applicable(100.0, &user, DateTime::now()),
            Err(CouponRejection::UserLimitReached)
        );
        // another customer may still use it
        assert!(c.check_applicable(100.0, &ObjectId::new(), DateTime::now()).is_ok());
    }

    #[test]
    fn test_percentage_discount_with_cap() {
        let mut c = coupon("PCT", DiscountType::Percentage, 15.0);
        assert_eq!(c.discount_for(200.0), 30.0);

        c.max_discount_amount = Some(25.0);
        assert_eq!(c.discount_for(200.0), 25.0);
    }

    #[test]
    fn test_fixed_discount_never_exceeds_subtotal() {
        let c = coupon("FLAT", DiscountType::Fixed, 80.0);
        assert_eq!(c.discount_for(200.0), 80.0);
        assert_eq!(c.discount_for(45.5), 45.5);
        assert_eq!(c.discount_for(0.0), 0.0);
    }

    #[test]
    fn test_normalize_code() {
        assert_eq!(Coupon::normalize_code("  welcome10 "), "WELCOME10");
    }
}
