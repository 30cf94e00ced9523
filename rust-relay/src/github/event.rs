//! GitHub `sponsorship` webhook payload types.
//!
//! The wire payload is a flat object whose `action` decides which of
//! `changes` and `effective_date` mean anything. It is deserialized into
//! [`SponsorshipPayload`] and folded into [`SponsorshipEvent`], where each
//! action variant only carries the fields GitHub defines for it.

use chrono::{DateTime, Utc};
use serde::Deserialize;

/// A sponsorship tier.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Tier {
    pub name: String,
    pub monthly_price_in_cents: i64,
}

/// The sponsoring account.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
pub struct Sponsor {
    #[serde(default)]
    pub login: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub avatar_url: Option<String>,
    #[serde(default)]
    pub html_url: Option<String>,
}

impl Sponsor {
    /// Login, if present and non-empty.
    pub fn login(&self) -> Option<&str> {
        self.login.as_deref().filter(|s| !s.is_empty())
    }

    /// Display name, if present and non-empty.
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref().filter(|s| !s.is_empty())
    }
}

/// Whether the sponsor is publicly listed.
///
/// GitHub only sends `public` or `private`; anything else reads as private.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PrivacyLevel {
    Public,
    #[serde(other)]
    Private,
}

/// The `sponsorship` object shared by every action.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Sponsorship {
    pub tier: Tier,
    #[serde(default)]
    pub sponsor: Option<Sponsor>,
    pub privacy_level: PrivacyLevel,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
struct PreviousValue<T> {
    from: Option<T>,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct Changes {
    #[serde(default)]
    privacy_level: Option<PreviousValue<PrivacyLevel>>,
    #[serde(default)]
    tier: Option<PreviousValue<Tier>>,
}

/// Raw `sponsorship` webhook body as GitHub sends it.
#[derive(Debug, Clone, Deserialize)]
pub struct SponsorshipPayload {
    action: String,
    sponsorship: Sponsorship,
    #[serde(default)]
    changes: Option<Changes>,
    #[serde(default)]
    effective_date: Option<DateTime<Utc>>,
}

/// What happened to the sponsorship, with the fields defined for it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SponsorshipAction {
    Created,
    Edited {
        previous_privacy_level: Option<PrivacyLevel>,
    },
    PendingCancellation {
        effective_date: Option<DateTime<Utc>>,
    },
    Cancelled,
    PendingTierChange {
        effective_date: Option<DateTime<Utc>>,
        previous_tier: Option<Tier>,
    },
    TierChanged {
        previous_tier: Option<Tier>,
    },
    /// An action name this relay does not know.
    Unrecognized(String),
}

impl SponsorshipAction {
    /// The wire name of the action.
    pub fn as_str(&self) -> &str {
        match self {
            SponsorshipAction::Created => "created",
            SponsorshipAction::Edited { .. } => "edited",
            SponsorshipAction::PendingCancellation { .. } => "pending_cancellation",
            SponsorshipAction::Cancelled => "cancelled",
            SponsorshipAction::PendingTierChange { .. } => "pending_tier_change",
            SponsorshipAction::TierChanged { .. } => "tier_changed",
            SponsorshipAction::Unrecognized(name) => name,
        }
    }
}

/// A verified sponsorship lifecycle event.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(from = "SponsorshipPayload")]
pub struct SponsorshipEvent {
    pub action: SponsorshipAction,
    pub sponsorship: Sponsorship,
}

impl From<SponsorshipPayload> for SponsorshipEvent {
    fn from(payload: SponsorshipPayload) -> Self {
        let Changes { privacy_level, tier } = payload.changes.unwrap_or_default();

        let action = match payload.action.as_str() {
            "created" => SponsorshipAction::Created,
            "edited" => SponsorshipAction::Edited {
                previous_privacy_level: privacy_level.and_then(|c| c.from),
            },
            "pending_cancellation" => SponsorshipAction::PendingCancellation {
                effective_date: payload.effective_date,
            },
            "cancelled" => SponsorshipAction::Cancelled,
            "pending_tier_change" => SponsorshipAction::PendingTierChange {
                effective_date: payload.effective_date,
                previous_tier: tier.and_then(|c| c.from),
            },
            "tier_changed" => SponsorshipAction::TierChanged {
                previous_tier: tier.and_then(|c| c.from),
            },
            _ => SponsorshipAction::Unrecognized(payload.action),
        };

        SponsorshipEvent {
            action,
            sponsorship: payload.sponsorship,
        }
    }
}
