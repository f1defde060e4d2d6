//! # Coupon service
//!
//! Shop-side validation of a code against the current cart subtotal, the
//! checkout hook used by order creation, and back-office CRUD.

use std::sync::Arc;

use mongodb::bson::{oid::ObjectId, Bson, DateTime, Document};

use singleton_macro::service;

use crate::core::errors::{AppError, AppResult, ErrorContext};
use crate::domain::dto::common::{PageQuery, Paginated};
use crate::domain::dto::coupons::{
    CouponResponse, CouponValidationResponse, CreateCouponRequest, UpdateCouponRequest,
    ValidateCouponRequest,
};
use crate::domain::entities::coupons::{Coupon, CouponRejection};
use crate::repositories::coupons::CouponRepository;
use crate::utils::format_utils::{from_chrono, round_money};
use crate::utils::string_utils::parse_object_id;

#[service(name = "coupon")]
pub struct CouponService {
    coupon_repo: Arc<CouponRepository>,
}

/// 400 carrying the rejection's stable code as `reason`.
fn rejection_error(rejection: CouponRejection) -> AppError {
    AppError::RuleViolation {
        reason: rejection.code(),
        message: rejection.to_string(),
    }
}

/// A value sets `key`, an explicit `null` queues it for `$unset`.
fn set_or_clear<T: Into<Bson>>(
    fields: &mut Document,
    clear: &mut Vec<&'static str>,
    key: &'static str,
    value: Option<Option<T>>,
) {
    match value {
        Some(Some(value)) => {
            fields.insert(key, value);
        }
        Some(None) => clear.push(key),
        None => {}
    }
}

impl CouponService {
    /// Finds `code` and checks it against `subtotal`, returning the coupon and its discount.
    ///
    /// # Arguments
    ///
    /// * `code` - code as typed by the shopper, matched case-insensitively
    /// * `subtotal` - order subtotal before shipping
    /// * `user_id` - buyer, for the per-user limit
    ///
    /// # Returns
    ///
    /// The coupon and the discount it grants on `subtotal`, already capped and
    /// rounded to cents.
    ///
    /// # Errors
    ///
    /// * `NotFound` - no coupon has this code
    /// * `RuleViolation` - the coupon exists but does not apply; `reason` is one
    ///   of `inactive`, `not_started`, `expired`, `below_minimum`,
    ///   `usage_limit_reached` or `user_limit_reached`
    pub async fn resolve(
        &self,
        code: &str,
        subtotal: f64,
        user_id: &ObjectId,
    ) -> AppResult<(Coupon, f64)> {
        let coupon = self
            .coupon_repo
            .find_by_code(code)
            .await?
            .ok_or_else(|| AppError::NotFound("invalid coupon code".to_string()))?;

        coupon
            .check_applicable(subtotal, user_id, DateTime::now())
            .map_err(rejection_error)?;

        let discount = coupon.discount_for(subtotal);
        Ok((coupon, discount))
    }

    /// Shop-side preview of a coupon against the cart subtotal. Nothing is
    /// recorded; usage is only counted when an order is placed.
    pub async fn validate(
        &self,
        user_id: &ObjectId,
        request: ValidateCouponRequest,
    ) -> AppResult<CouponValidationResponse> {
        let (coupon, discount) = self.resolve(&request.code, request.subtotal, user_id).await?;

        Ok(CouponValidationResponse {
            valid: true,
            code: coupon.code,
            discount_type: coupon.discount_type,
            discount_value: coupon.discount_value,
            discount,
            subtotal_after_discount: round_money(request.subtotal - discount),
        })
    }

    /// Atomically counts one use of `coupon_id` for `order_id`.
    ///
    /// Fails with 409 when the last allowed use was taken in the meantime.
    pub async fn record_usage(
        &self,
        coupon_id: &ObjectId,
        user_id: &ObjectId,
        order_id: &ObjectId,
    ) -> AppResult<()> {
        match self.coupon_repo.record_usage(coupon_id, user_id, order_id).await? {
            Some(coupon) => {
                log::info!(
                    "Coupon {} used for order {} ({} use(s) so far)",
                    coupon.code,
                    order_id,
                    coupon.used_count
                );
                Ok(())
            }
            None => Err(AppError::ConflictError(
                "coupon is no longer available".to_string(),
            )),
        }
    }

    pub async fn revert_usage(&self, coupon_id: &ObjectId, order_id: &ObjectId) -> AppResult<()> {
        self.coupon_repo.revert_usage(coupon_id, order_id).await
    }

    pub async fn create(&self, request: CreateCouponRequest) -> AppResult<CouponResponse> {
        let now = DateTime::now();
        let coupon = Coupon {
            id: None,
            code: Coupon::normalize_code(&request.code),
            description: request.description.trim().to_string(),
            discount_type: request.discount_type,
            discount_value: request.discount_value,
            min_order_amount: request.min_order_amount,
            max_discount_amount: request.max_discount_amount,
            start_date: from_chrono(request.start_date),
            end_date: from_chrono(request.end_date),
            usage_limit: request.usage_limit,
            used_count: 0,
            per_user_limit: request.per_user_limit.unwrap_or(1),
            used_by: Vec::new(),
            is_active: request.is_active.unwrap_or(true),
            created_at: now,
            updated_at: now,
        };

        let created = self.coupon_repo.create(coupon).await?;
        log::info!("Coupon created: {}", created.code);
        Ok(CouponResponse::from(created))
    }

    pub async fn list(&self, page: PageQuery) -> AppResult<Paginated<CouponResponse>> {
        let coupons = self.coupon_repo.list(page.window()).await?;
        Ok(coupons.map(CouponResponse::from))
    }

    pub async fn get(&self, id: &str) -> AppResult<CouponResponse> {
        let id = parse_object_id(id, "coupon")?;
        self.coupon_repo
            .find_by_id(&id)
            .await?
            .map(CouponResponse::from)
            .ok_or_else(|| AppError::NotFound("coupon not found".to_string()))
    }

    /// Partial update. `null` for `usage_limit` or `max_discount_amount`
    /// removes the limit; absent fields are left as they are.
    pub async fn update(&self, id: &str, request: UpdateCouponRequest) -> AppResult<CouponResponse> {
        let id = parse_object_id(id, "coupon")?;
        let existing = self
            .coupon_repo
            .find_by_id(&id)
            .await?
            .ok_or_else(|| AppError::NotFound("coupon not found".to_string()))?;

        let start = request.start_date.map(from_chrono).unwrap_or(existing.start_date);
        let end = request.end_date.map(from_chrono).unwrap_or(existing.end_date);
        if end.timestamp_millis() <= start.timestamp_millis() {
            return Err(AppError::ValidationError(
                "end date must be after start date".to_string(),
            ));
        }

        let mut fields = Document::new();
        let mut clear = Vec::new();
        if let Some(description) = request.description {
            fields.insert("description", description.trim());
        }
        if let Some(discount_type) = request.discount_type {
            fields.insert("discount_type", mongodb::bson::to_bson(&discount_type)
                .context("cannot encode discount type")?);
        }
        if let Some(value) = request.discount_value {
            fields.insert("discount_value", value);
        }
        if let Some(minimum) = request.min_order_amount {
            fields.insert("min_order_amount", minimum);
        }
        set_or_clear(&mut fields, &mut clear, "max_discount_amount", request.max_discount_amount);
        if request.start_date.is_some() {
            fields.insert("start_date", start);
        }
        if request.end_date.is_some() {
            fields.insert("end_date", end);
        }
        set_or_clear(&mut fields, &mut clear, "usage_limit", request.usage_limit);
        if let Some(limit) = request.per_user_limit {
            fields.insert("per_user_limit", limit);
        }
        if let Some(is_active) = request.is_active {
            fields.insert("is_active", is_active);
        }

        let updated = self
            .coupon_repo
            .update_fields(&id, fields, clear)
            .await?
            .ok_or_else(|| AppError::NotFound("coupon not found".to_string()))?;
        Ok(CouponResponse::from(updated))
    }

    pub async fn toggle(&self, id: &str) -> AppResult<CouponResponse> {
        let id = parse_object_id(id, "coupon")?;
        let coupon = self
            .coupon_repo
            .toggle_active(&id)
            .await?
            .ok_or_else(|| AppError::NotFound("coupon not found".to_string()))?;

        log::info!("Coupon {} is now {}", coupon.code, if coupon.is_active { "active" } else { "inactive" });
        Ok(CouponResponse::from(coupon))
    }

    pub async fn delete(&self, id: &str) -> AppResult<()> {
        let id = parse_object_id(id, "coupon")?;
        if !self.coupon_repo.delete(&id).await? {
            return Err(AppError::NotFound("coupon not found".to_string()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::coupons::coupon::fixtures::{coupon, days_from_now};
    use crate::domain::entities::coupons::DiscountType;

    #[test]
    fn test_rejection_maps_to_bad_request() {
        let mut expired = coupon("OLD", DiscountType::Fixed, 10.0);
        expired.end_date = days_from_now(-1);

        let error = expired
            .check_applicable(100.0, &ObjectId::new(), DateTime::now())
            .map_err(rejection_error)
            .unwrap_err();

        match error {
            AppError::RuleViolation { reason, message } => {
                assert_eq!(reason, "expired");
                assert!(message.contains("expired"));
            }
            other => panic!("expected rule violation, got {:?}", other),
        }
    }

    #[test]
    fn test_rejection_body_exposes_reason_code() {
        use actix_web::body::MessageBody;
        use actix_web::ResponseError;

        let mut small_order = coupon("BIG", DiscountType::Fixed, 10.0);
        small_order.min_order_amount = 200.0;

        let error = small_order
            .check_applicable(50.0, &ObjectId::new(), DateTime::now())
            .map_err(rejection_error)
            .unwrap_err();
        let response = error.error_response();
        assert_eq!(response.status(), actix_web::http::StatusCode::BAD_REQUEST);

        let bytes = response.into_body().try_into_bytes().unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["reason"], "below_minimum");
        assert!(body["message"].as_str().unwrap().contains("200.00"));
    }

    #[test]
    fn test_null_limits_are_unset_and_values_are_set() {
        let mut fields = Document::new();
        let mut clear = Vec::new();

        set_or_clear(&mut fields, &mut clear, "usage_limit", None::<Option<i64>>);
        set_or_clear(&mut fields, &mut clear, "max_discount_amount", Some(None::<f64>));
        assert!(fields.is_empty());
        assert_eq!(clear, vec!["max_discount_amount"]);

        set_or_clear(&mut fields, &mut clear, "usage_limit", Some(Some(50_i64)));
        assert_eq!(fields.get_i64("usage_limit").unwrap(), 50);
        assert_eq!(clear.len(), 1);
    }
}
