//! Sponsor Relay - GitHub sponsorship webhooks to Discord.
//!
//! Each verified `sponsorship` delivery becomes one Discord embed, posted
//! once to the configured webhook. Nothing is stored between requests.
//!
//! ## Architecture
//!
//! ```text
//! GitHub → POST / → verify signature → build embed → Discord webhook
//! ```

pub mod config;
pub mod discord;
pub mod github;
pub mod relay;
pub mod web;

// Re-export commonly used types
pub use config::{Config, ConfigError};
pub use discord::{DeliveryError, Embed, WebhookClient};
pub use github::SponsorshipEvent;
pub use relay::{build_embed, relay_event};
pub use web::{router, AppState};
