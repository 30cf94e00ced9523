//! Sponsorship event relaying.
//!
//! ## Flow
//!
//! ```text
//! SponsorshipEvent → build_embed() → Embed → WebhookClient::send()
//! ```

use tracing::{info, warn};

use crate::discord::format::{format_price, format_privacy, format_tier, format_timestamp};
use crate::discord::{DeliveryError, Embed, EmbedAuthor, WebhookClient};
use crate::github::{Sponsor, SponsorshipAction, SponsorshipEvent};

pub const COLOR_GREEN: u32 = 0x00ff00;
pub const COLOR_YELLOW: u32 = 0xffff00;
pub const COLOR_ORANGE: u32 = 0xffa500;
pub const COLOR_RED: u32 = 0xff0000;

/// Build the Discord embed announcing a sponsorship event.
pub fn build_embed(event: &SponsorshipEvent) -> Embed {
    let sponsorship = &event.sponsorship;
    let mut embed = Embed::new();

    match &event.action {
        SponsorshipAction::Created => {
            embed = embed.title("New Sponsor").color(COLOR_GREEN);
        }
        SponsorshipAction::Edited {
            previous_privacy_level,
        } => {
            embed = embed.title("Sponsor Privacy Changed").color(COLOR_YELLOW);
            if let Some(previous) = previous_privacy_level {
                embed = embed.field("Previous Privacy Level", format_privacy(*previous));
            }
        }
        SponsorshipAction::PendingCancellation { effective_date } => {
            embed = embed.title("Pending Sponsor Cancellation").color(COLOR_ORANGE);
            if let Some(at) = effective_date {
                embed = embed.field("Effective Date", format_timestamp(at));
            }
        }
        SponsorshipAction::Cancelled => {
            embed = embed.title("Cancelled Sponsor").color(COLOR_RED);
        }
        SponsorshipAction::PendingTierChange {
            effective_date,
            previous_tier,
        } => {
            embed = embed.title("Pending Sponsor Tier Change").color(COLOR_ORANGE);
            if let Some(at) = effective_date {
                embed = embed.field("Effective Date", format_timestamp(at));
            }
            if let Some(tier) = previous_tier {
                embed = embed.field("Previous Tier", format_tier(tier));
            }
        }
        SponsorshipAction::TierChanged { previous_tier } => {
            embed = embed.title("Sponsor Tier Changed").color(COLOR_YELLOW);
            if let Some(tier) = previous_tier {
                embed = embed.field("Previous Tier", format_tier(tier));
            }
        }
        SponsorshipAction::Unrecognized(action) => {
            // No title or color; the base fields still go out.
            warn!(action = %action, "sponsorship_action_unrecognized");
        }
    }

    embed = embed
        .field("Tier", format_tier(&sponsorship.tier))
        .field("Privacy Level", format_privacy(sponsorship.privacy_level));

    if event.action != SponsorshipAction::Created {
        embed = embed.field("Sponsor Since", format_timestamp(&sponsorship.created_at));
    }

    if let Some(sponsor) = &sponsorship.sponsor {
        embed = embed.author(EmbedAuthor {
            name: author_name(sponsor),
            icon_url: sponsor.avatar_url.clone(),
            url: sponsor.html_url.clone(),
        });
    }

    embed
}

/// `"{name} (@{login})"`, falling back to whichever is present, then `Unknown`.
fn author_name(sponsor: &Sponsor) -> String {
    match (sponsor.name(), sponsor.login()) {
        (Some(name), Some(login)) => format!("{} (@{})", name, login),
        (None, Some(login)) => login.to_string(),
        (Some(name), None) => name.to_string(),
        (None, None) => "Unknown".to_string(),
    }
}

/// Build the embed for an event and deliver it in one attempt.
pub async fn relay_event(
    client: &WebhookClient,
    event: &SponsorshipEvent,
) -> Result<Embed, DeliveryError> {
    info!(
        action = event.action.as_str(),
        tier = %event.sponsorship.tier.name,
        price = %format_price(event.sponsorship.tier.monthly_price_in_cents),
        has_sponsor = event.sponsorship.sponsor.is_some(),
        "sponsorship_relay_start"
    );

    let embed = build_embed(event);
    client.send(&embed).await?;

    info!(action = event.action.as_str(), "sponsorship_relay_complete");

    Ok(embed)
}
