pub mod notification_service;

pub use notification_service::{format_sse_frame, notification_frame, NotificationService};
