use serde::Serialize;

/// Event pushed to connected back-office dashboards.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum AdminNotification {
    NewOrder {
        order_id: String,
        customer_name: String,
        total: f64,
        payment_method: String,
        item_count: i64,
        created_at: String,
    },
    OrderCancelled {
        order_id: String,
        customer_name: String,
    },
}

impl AdminNotification {
    /// SSE `event:` name.
    pub fn event_name(&self) -> &'static str {
        match self {
            AdminNotification::NewOrder { .. } => "new-order",
            AdminNotification::OrderCancelled { .. } => "order-cancelled",
        }
    }
}
