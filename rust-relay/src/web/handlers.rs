//! Webhook endpoint handlers.
//!
//! The GitHub handler:
//! 1. Checks the delivery headers
//! 2. Verifies the HMAC signature over the raw body
//! 3. Parses the sponsorship payload
//! 4. Relays it to Discord and reports the outcome

use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::State,
    http::{header, HeaderMap, StatusCode},
    response::IntoResponse,
    Json,
};
use serde::Serialize;
use tracing::{error, info, warn};

use crate::discord::WebhookClient;
use crate::github::{
    verify_github_signature, SponsorshipEvent, DELIVERY_HEADER, EVENT_HEADER, SIGNATURE_HEADER,
    SPONSORSHIP_EVENT,
};
use crate::relay::relay_event;
use crate::Config;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub discord: WebhookClient,
}

impl AppState {
    pub fn new(config: Config, discord: WebhookClient) -> Self {
        Self {
            config: Arc::new(config),
            discord,
        }
    }
}

// =============================================================================
// Health Check
// =============================================================================

/// Health check response.
#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}

/// Health check endpoint.
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse { status: "ok" })
}

// =============================================================================
// GitHub Webhook
// =============================================================================

/// Webhook response.
#[derive(Debug, Serialize)]
pub struct WebhookResponse {
    pub status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl WebhookResponse {
    fn reply(code: StatusCode, status: &'static str) -> (StatusCode, Json<WebhookResponse>) {
        (code, Json(WebhookResponse { status, message: None }))
    }

    fn reply_with(
        code: StatusCode,
        status: &'static str,
        message: impl Into<String>,
    ) -> (StatusCode, Json<WebhookResponse>) {
        (
            code,
            Json(WebhookResponse {
                status,
                message: Some(message.into()),
            }),
        )
    }
}

fn header_str<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .filter(|v| !v.is_empty())
}

/// GitHub webhook endpoint.
pub async fn github_webhook(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> impl IntoResponse {
    let event_name = header_str(&headers, EVENT_HEADER);
    let delivery_id = header_str(&headers, DELIVERY_HEADER);
    let signature = header_str(&headers, SIGNATURE_HEADER);

    info!(
        event = ?event_name,
        delivery_id = ?delivery_id,
        has_signature = signature.is_some(),
        body_length = body.len(),
        "github_webhook_received"
    );

    let (Some(event_name), Some(delivery_id), Some(signature)) =
        (event_name, delivery_id, signature)
    else {
        warn!("github_webhook_missing_headers");
        return WebhookResponse::reply_with(
            StatusCode::BAD_REQUEST,
            "missing_headers",
            format!(
                "Required headers: {}, {}, {}",
                EVENT_HEADER, DELIVERY_HEADER, SIGNATURE_HEADER
            ),
        );
    };

    let is_json = header_str(&headers, header::CONTENT_TYPE.as_str())
        .map(|ct| ct.starts_with("application/json"))
        .unwrap_or(false);
    if !is_json {
        warn!(delivery_id = %delivery_id, "github_webhook_unsupported_media_type");
        return WebhookResponse::reply(
            StatusCode::UNSUPPORTED_MEDIA_TYPE,
            "unsupported_media_type",
        );
    }

    if !verify_github_signature(&state.config.github_webhook_secret, &body, signature) {
        warn!(delivery_id = %delivery_id, "github_signature_invalid");
        return WebhookResponse::reply(StatusCode::UNAUTHORIZED, "unauthorized");
    }

    if event_name != SPONSORSHIP_EVENT {
        info!(delivery_id = %delivery_id, event = %event_name, "github_webhook_ignored");
        return WebhookResponse::reply(StatusCode::OK, "ignored");
    }

    let event: SponsorshipEvent = match serde_json::from_slice(&body) {
        Ok(event) => event,
        Err(e) => {
            warn!(delivery_id = %delivery_id, error = %e, "github_webhook_invalid_payload");
            return WebhookResponse::reply_with(
                StatusCode::BAD_REQUEST,
                "invalid_payload",
                e.to_string(),
            );
        }
    };

    if let Err(e) = relay_event(&state.discord, &event).await {
        error!(delivery_id = %delivery_id, error = %e, "github_webhook_relay_failed");
        return WebhookResponse::reply_with(
            StatusCode::INTERNAL_SERVER_ERROR,
            "delivery_failed",
            e.to_string(),
        );
    }

    info!(
        delivery_id = %delivery_id,
        action = event.action.as_str(),
        "github_webhook_relayed"
    );

    WebhookResponse::reply(StatusCode::OK, "delivered")
}
