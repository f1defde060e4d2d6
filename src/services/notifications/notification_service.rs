//! In-process fan-out of back-office events.
//!
//! Every admin dashboard holds a receiver of the same broadcast channel. A
//! receiver that falls more than `NOTIFICATION_BUFFER` events behind skips
//! the missed ones instead of slowing down checkout.

use singleton_macro::service;
use tokio::sync::broadcast;

use crate::config::ShopConfig;
use crate::domain::models::notifications::AdminNotification;

/// Sending half of the admin channel, sized by `NOTIFICATION_BUFFER`.
pub struct NotificationChannel(broadcast::Sender<AdminNotification>);

impl Default for NotificationChannel {
    fn default() -> Self {
        let (sender, _) = broadcast::channel(ShopConfig::notification_buffer());
        Self(sender)
    }
}

#[service(name = "notification")]
pub struct NotificationService {
    channel: NotificationChannel,
}

impl NotificationService {
    /// Never fails; an event with no listener is dropped.
    pub fn publish(&self, event: AdminNotification) {
        let kind = event.event_name();
        match self.channel.0.send(event) {
            Ok(receivers) => log::debug!("Published {} to {} subscriber(s)", kind, receivers),
            Err(_) => log::info!("No admin connected, {} event dropped", kind),
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<AdminNotification> {
        self.channel.0.subscribe()
    }

    pub fn subscriber_count(&self) -> usize {
        self.channel.0.receiver_count()
    }
}

/// One Server-Sent Events frame.
pub fn format_sse_frame(event: &str, data: &str) -> String {
    let mut frame = format!("event: {}\n", event);
    for line in data.lines() {
        frame.push_str("data: ");
        frame.push_str(line);
        frame.push('\n');
    }
    frame.push('\n');
    frame
}

/// Frame for `notification`, or `None` if it cannot be serialized.
pub fn notification_frame(notification: &AdminNotification) -> Option<String> {
    match serde_json::to_string(notification) {
        Ok(json) => Some(format_sse_frame(notification.event_name(), &json)),
        Err(e) => {
            log::error!("Failed to serialize notification: {}", e);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_order() -> AdminNotification {
        AdminNotification::NewOrder {
            order_id: "665f1c2e9b1d8a0012345678".to_string(),
            customer_name: "Sara".to_string(),
            total: 250.0,
            payment_method: "cod".to_string(),
            item_count: 2,
            created_at: "2024-06-01T10:00:00Z".to_string(),
        }
    }

    #[test]
    fn test_sse_frame_layout() {
        assert_eq!(format_sse_frame("connected", "{}"), "event: connected\ndata: {}\n\n");
        assert_eq!(format_sse_frame("note", "a\nb"), "event: note\ndata: a\ndata: b\n\n");
    }

    #[test]
    fn test_notification_frame_carries_type_tag() {
        let frame = notification_frame(&new_order()).unwrap();
        assert!(frame.starts_with("event: new-order\ndata: {"));
        assert!(frame.contains("\"type\":\"new-order\""));
        assert!(frame.ends_with("\n\n"));
    }

    #[tokio::test]
    async fn test_publish_reaches_subscribers() {
        let service = NotificationService::new();
        // publishing without listeners must not panic
        service.publish(new_order());

        let mut receiver = service.subscribe();
        assert_eq!(service.subscriber_count(), 1);
        service.publish(new_order());

        let received = receiver.recv().await.unwrap();
        assert_eq!(received.event_name(), "new-order");
    }
}
