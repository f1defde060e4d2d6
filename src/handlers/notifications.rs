//! Server-Sent Events feed for back-office dashboards.
//!
//! Each connection subscribes to the notification hub and receives a
//! `connected` frame followed by one frame per event (`new-order`,
//! `order-cancelled`).

use std::convert::Infallible;

use actix_web::web::Bytes;
use actix_web::{get, HttpResponse};
use futures_util::stream::{self, StreamExt};
use serde_json::json;
use tokio::sync::broadcast::error::RecvError;

use crate::domain::auth::AuthenticatedUser;
use crate::services::notifications::{format_sse_frame, notification_frame, NotificationService};

#[get("/stream")]
pub async fn notification_stream(admin: AuthenticatedUser) -> HttpResponse {
    let hub = NotificationService::instance();
    let receiver = hub.subscribe();
    log::info!(
        "Admin {} connected to notifications ({} listening)",
        admin.email,
        hub.subscriber_count()
    );

    let greeting = format_sse_frame("connected", &json!({ "user": admin.user_name }).to_string());
    let greeting = stream::once(async move { Ok::<_, Infallible>(Bytes::from(greeting)) });

    let events = stream::unfold(receiver, |mut receiver| async move {
        loop {
            match receiver.recv().await {
                Ok(notification) => {
                    if let Some(frame) = notification_frame(&notification) {
                        return Some((Ok::<_, Infallible>(Bytes::from(frame)), receiver));
                    }
                }
                Err(RecvError::Lagged(skipped)) => {
                    log::warn!("Notification subscriber lagged, {} event(s) skipped", skipped);
                }
                Err(RecvError::Closed) => return None,
            }
        }
    });

    HttpResponse::Ok()
        .content_type("text/event-stream")
        .insert_header(("Cache-Control", "no-cache"))
        .insert_header(("X-Accel-Buffering", "no"))
        .streaming(greeting.chain(events))
}
