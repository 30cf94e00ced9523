//! Web server module for the inbound GitHub webhook.
//!
//! A single POST endpoint verifies the delivery, relays sponsorship events
//! to Discord, and only answers once the outbound call has finished.

pub mod handlers;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::trace::TraceLayer;

pub use handlers::{github_webhook, health, AppState, HealthResponse, WebhookResponse};

/// Build the application router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", post(github_webhook))
        .route("/health", get(health))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
