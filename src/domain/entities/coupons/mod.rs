pub mod coupon;

pub use coupon::{Coupon, CouponRejection, CouponUsage, DiscountType};
