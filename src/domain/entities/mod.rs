//! MongoDB document types.
//!
//! Every entity keeps its `_id` as `Option<ObjectId>` (unset before insert)
//! and stores timestamps as bson `DateTime`.

pub mod carts;
pub mod coupons;
pub mod features;
pub mod orders;
pub mod products;
pub mod samples;
pub mod users;
