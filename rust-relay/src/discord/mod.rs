//! Outbound side: Discord webhook embeds.

pub mod client;
pub mod embed;
pub mod format;

pub use client::{DeliveryError, WebhookClient};
pub use embed::{Embed, EmbedAuthor, EmbedField, WebhookMessage};
