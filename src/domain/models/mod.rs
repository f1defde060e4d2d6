//! Non-persisted domain types: request identity, token claims, upload
//! metadata and admin notifications.

pub mod auth;
pub mod notifications;
pub mod token;
pub mod uploads;
