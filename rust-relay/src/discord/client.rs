//! Outbound Discord webhook delivery.
//!
//! One POST per embed. The response status is checked and nothing is
//! retried; a failed delivery is reported back to the caller.

use std::time::Duration;

use reqwest::{Client, StatusCode};
use thiserror::Error;
use tracing::{error, info, warn};
use url::Url;

use super::embed::{Embed, WebhookMessage};

/// Stand-in for a rejection body that could not be read.
pub const UNREADABLE_BODY: &str = "<unreadable body>";

/// Why a webhook delivery failed.
#[derive(Debug, Error)]
pub enum DeliveryError {
    /// Discord answered with a non-success status.
    #[error("Failed to send Discord webhook: {body}")]
    Rejected { status: StatusCode, body: String },

    /// The request never produced a response.
    #[error("Discord webhook request failed: {0}")]
    Transport(#[from] reqwest::Error),
}

/// Client for a single Discord webhook URL.
#[derive(Debug, Clone)]
pub struct WebhookClient {
    http: Client,
    url: Url,
}

impl WebhookClient {
    /// Build a client posting to `url` with the given request timeout.
    pub fn new(url: Url, timeout: Duration) -> Result<Self, reqwest::Error> {
        let http = Client::builder().timeout(timeout).build()?;
        Ok(Self::with_client(http, url))
    }

    /// Wrap an existing HTTP client.
    pub fn with_client(http: Client, url: Url) -> Self {
        Self { http, url }
    }

    /// Host of the target webhook, for logging without leaking the token.
    pub fn host(&self) -> &str {
        self.url.host_str().unwrap_or_default()
    }

    /// Post a single embed.
    pub async fn send(&self, embed: &Embed) -> Result<(), DeliveryError> {
        info!(
            host = self.host(),
            title = ?embed.title,
            field_count = embed.fields.len(),
            "discord_webhook_sending"
        );

        // .json() sets Content-Type: application/json
        let response = self
            .http
            .post(self.url.clone())
            .json(&WebhookMessage::single(embed))
            .send()
            .await
            .map_err(|e| {
                // The webhook URL embeds its token; keep it out of logs and replies.
                let e = e.without_url();
                error!(
                    host = self.host(),
                    error = %e,
                    is_timeout = e.is_timeout(),
                    "discord_webhook_transport_error"
                );
                DeliveryError::Transport(e)
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = match response.text().await {
                Ok(body) => body,
                Err(e) => {
                    warn!(
                        host = self.host(),
                        status_code = status.as_u16(),
                        error = %e.without_url(),
                        "discord_webhook_body_unreadable"
                    );
                    UNREADABLE_BODY.to_string()
                }
            };
            error!(
                host = self.host(),
                status_code = status.as_u16(),
                body = %body,
                "discord_webhook_rejected"
            );
            return Err(DeliveryError::Rejected { status, body });
        }

        info!(
            host = self.host(),
            status_code = status.as_u16(),
            "discord_webhook_sent"
        );

        Ok(())
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    use axum::{extract::State, http::HeaderMap, routing::post, Router};
    use tokio::net::TcpListener;

    /// Requests a stand-in Discord endpoint has seen.
    #[derive(Clone, Default)]
    pub(crate) struct Received {
        pub requests: Arc<Mutex<Vec<(Option<String>, serde_json::Value)>>>,
    }

    impl Received {
        pub fn count(&self) -> usize {
            self.requests.lock().unwrap().len()
        }

        pub fn last_body(&self) -> serde_json::Value {
            self.requests.lock().unwrap().last().unwrap().1.clone()
        }

        pub fn last_content_type(&self) -> Option<String> {
            self.requests.lock().unwrap().last().unwrap().0.clone()
        }
    }

    /// Spawn a local server that answers every POST with `status` and `body`.
    pub(crate) async fn spawn_discord(status: StatusCode, body: &'static str) -> (Url, Received) {
        let received = Received::default();

        let handler = move |State(received): State<Received>,
                            headers: HeaderMap,
                            raw: String| async move {
            let content_type = headers
                .get("content-type")
                .and_then(|v| v.to_str().ok())
                .map(str::to_string);
            let json = serde_json::from_str(&raw).unwrap_or(serde_json::Value::Null);
            received.requests.lock().unwrap().push((content_type, json));
            (status, body)
        };

        let app = Router::new()
            .route("/webhook", post(handler))
            .with_state(received.clone());

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        let url = Url::parse(&format!("http://{}/webhook", addr)).unwrap();
        (url, received)
    }

    fn client(url: Url) -> WebhookClient {
        WebhookClient::new(url, Duration::from_secs(5)).unwrap()
    }

    #[tokio::test]
    async fn test_send_posts_embeds_json() {
        let (url, received) = spawn_discord(StatusCode::NO_CONTENT, "").await;
        let embed = Embed::new().title("New Sponsor").color(0x00ff00);

        client(url).send(&embed).await.unwrap();

        assert_eq!(received.count(), 1);
        assert_eq!(
            received.last_content_type().as_deref(),
            Some("application/json")
        );
        assert_eq!(
            received.last_body(),
            serde_json::json!({"embeds": [{"title": "New Sponsor", "color": 65280}]})
        );
    }

    #[tokio::test]
    async fn test_send_rejected_carries_body() {
        let (url, received) = spawn_discord(StatusCode::INTERNAL_SERVER_ERROR, "bad request").await;

        let err = client(url).send(&Embed::new()).await.unwrap_err();

        assert_eq!(received.count(), 1);
        assert!(err.to_string().contains("bad request"));
        match err {
            DeliveryError::Rejected { status, body } => {
                assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
                assert_eq!(body, "bad request");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_send_transport_error() {
        // Bind then drop so nothing is listening on the port.
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let url = Url::parse(&format!("http://{}/webhook", addr)).unwrap();
        let err = client(url).send(&Embed::new()).await.unwrap_err();

        assert!(matches!(err, DeliveryError::Transport(_)));
    }

    #[tokio::test]
    async fn test_unreadable_rejection_body_uses_marker() {
        use tokio::io::{AsyncReadExt, AsyncWriteExt};

        // Promise more body than is sent, then hang up.
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut buf = [0u8; 4096];
            let _ = socket.read(&mut buf).await;
            let response: &[u8] =
                b"HTTP/1.1 500 Internal Server Error\r\ncontent-length: 100\r\n\r\nshort";
            let _ = socket.write_all(response).await;
            let _ = socket.shutdown().await;
        });

        let url = Url::parse(&format!("http://{}/webhook", addr)).unwrap();
        let err = client(url).send(&Embed::new()).await.unwrap_err();

        match err {
            DeliveryError::Rejected { status, body } => {
                assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
                assert_eq!(body, UNREADABLE_BODY);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_transport_error_hides_webhook_token() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let url = Url::parse(&format!("http://{}/api/webhooks/123/SECRETTOKEN", addr)).unwrap();
        let err = client(url).send(&Embed::new()).await.unwrap_err();

        let text = err.to_string();
        assert!(!text.contains("SECRETTOKEN"), "{}", text);
        assert!(!text.contains("/api/webhooks"), "{}", text);
        match err {
            DeliveryError::Transport(e) => assert!(e.url().is_none()),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_host_hides_path() {
        let url = Url::parse("https://discord.com/api/webhooks/123/token").unwrap();
        assert_eq!(client(url).host(), "discord.com");
    }
}
