//! Inbound side: GitHub `sponsorship` webhooks.
//!
//! - `event`: payload types, one variant per sponsorship action
//! - `signature`: `X-Hub-Signature-256` verification

pub mod event;
pub mod signature;

pub use event::{
    PrivacyLevel, Sponsor, Sponsorship, SponsorshipAction, SponsorshipEvent, SponsorshipPayload,
    Tier,
};
pub use signature::{verify_github_signature, SIGNATURE_HEADER};

/// Header naming the event type of a delivery.
pub const EVENT_HEADER: &str = "X-GitHub-Event";

/// Header carrying the unique delivery id.
pub const DELIVERY_HEADER: &str = "X-GitHub-Delivery";

/// The only event type this relay forwards.
pub const SPONSORSHIP_EVENT: &str = "sponsorship";
