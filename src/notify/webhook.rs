use std::time::Duration;

use serde::Deserialize;

use super::{ensure_routable, DeliveryReceipt, Notification, Notifier, NotifyError};

/// POSTs each notification as JSON to a relay endpoint.
///
/// The relay is expected to answer 2xx, optionally with `{"reference": "..."}`.
pub struct WebhookNotifier {
    url: String,
    client: reqwest::blocking::Client,
}

#[derive(Deserialize)]
struct RelayResponse {
    reference: Option<String>,
}

impl WebhookNotifier {
    pub fn new(url: &str, timeout_secs: u64) -> Result<Self, NotifyError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()?;
        Ok(Self {
            url: url.trim().to_string(),
            client,
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

impl Notifier for WebhookNotifier {
    fn send(&self, notification: &Notification) -> Result<DeliveryReceipt, NotifyError> {
        ensure_routable(notification)?;

        let response = self.client.post(&self.url).json(notification).send()?;
        let status = response.status();
        if !status.is_success() {
            tracing::warn!(
                url = %self.url,
                status = status.as_u16(),
                recipient = %notification.recipient_name,
                "Relay rejected notification"
            );
            return Err(NotifyError::Rejected { status: status.as_u16() });
        }

        // Body is optional; an empty or non-JSON 2xx still counts as delivered.
        let reference = response
            .json::<RelayResponse>()
            .ok()
            .and_then(|r| r.reference)
            .unwrap_or_else(|| format!("http-{}", status.as_u16()));

        tracing::info!(
            kind = %notification.kind,
            recipient = %notification.recipient_name,
            reference = %reference,
            "Notification relayed"
        );
        Ok(DeliveryReceipt { reference })
    }
}

#[cfg(test)]
mod tests {
    use std::net::{SocketAddr, TcpListener};

    use axum::http::StatusCode;
    use axum::routing::post;
    use axum::{Json, Router};

    use super::*;
    use crate::models::enums::NotificationKind;

    fn notification(name: &str, phone: &str) -> Notification {
        Notification {
            kind: NotificationKind::Contact,
            recipient_name: name.into(),
            recipient_phone: phone.into(),
            body: "alert".into(),
        }
    }

    async fn acknowledge(Json(n): Json<Notification>) -> Json<serde_json::Value> {
        Json(serde_json::json!({ "reference": format!("ack-{}", n.recipient_phone) }))
    }

    /// Serve a relay on an ephemeral port from a thread that owns its own
    /// runtime, so the blocking client is never driven from async code.
    fn spawn_relay() -> SocketAddr {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        listener.set_nonblocking(true).unwrap();
        let addr = listener.local_addr().unwrap();

        let app = Router::new()
            .route("/ack", post(acknowledge))
            .route("/accepted", post(|| async { StatusCode::ACCEPTED }))
            .route("/down", post(|| async { StatusCode::SERVICE_UNAVAILABLE }));

        std::thread::spawn(move || {
            let rt = tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()
                .unwrap();
            rt.block_on(async move {
                let listener = tokio::net::TcpListener::from_std(listener).unwrap();
                axum::serve(listener, app).await.unwrap();
            });
        });
        addr
    }

    /// A loopback port with nothing listening on it.
    fn closed_port() -> u16 {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap().port()
    }

    #[test]
    fn url_is_trimmed() {
        let notifier = WebhookNotifier::new("  http://relay.local/notify ", 5).unwrap();
        assert_eq!(notifier.url(), "http://relay.local/notify");
    }

    #[test]
    fn blank_phone_rejected_before_network() {
        let url = format!("http://127.0.0.1:{}/unused", closed_port());
        let notifier = WebhookNotifier::new(&url, 1).unwrap();
        let notification = Notification {
            kind: NotificationKind::HospitalAlert,
            ..notification("City General Hospital", "")
        };
        assert!(matches!(
            notifier.send(&notification),
            Err(NotifyError::MissingRecipient(name)) if name == "City General Hospital"
        ));
    }

    #[test]
    fn unreachable_relay_is_http_error() {
        let url = format!("http://127.0.0.1:{}/notify", closed_port());
        let notifier = WebhookNotifier::new(&url, 1).unwrap();
        assert!(matches!(
            notifier.send(&notification("Close Friend", "+19998887777")),
            Err(NotifyError::Http(_))
        ));
    }

    #[test]
    fn relay_reference_is_returned() {
        let addr = spawn_relay();
        let notifier = WebhookNotifier::new(&format!("http://{addr}/ack"), 5).unwrap();
        let receipt = notifier.send(&notification("Close Friend", "+19998887777")).unwrap();
        assert_eq!(receipt.reference, "ack-+19998887777");
    }

    #[test]
    fn success_without_body_uses_status_reference() {
        let addr = spawn_relay();
        let notifier = WebhookNotifier::new(&format!("http://{addr}/accepted"), 5).unwrap();
        let receipt = notifier.send(&notification("Family Member", "+19876543210")).unwrap();
        assert_eq!(receipt.reference, "http-202");
    }

    #[test]
    fn non_success_status_is_rejected() {
        let addr = spawn_relay();
        let notifier = WebhookNotifier::new(&format!("http://{addr}/down"), 5).unwrap();
        assert!(matches!(
            notifier.send(&notification("Family Member", "+19876543210")),
            Err(NotifyError::Rejected { status: 503 })
        ));
    }

    /// Verify the notifier is usable as a shared trait object.
    #[test]
    fn webhook_is_object_safe_notifier() {
        fn _accepts(_: &dyn Notifier) {}
        let _: fn(&WebhookNotifier) = |n| _accepts(n);
    }
}
