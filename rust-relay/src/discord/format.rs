//! Text formatting for embed field values.

use chrono::{DateTime, Utc};

use crate::github::{PrivacyLevel, Tier};

/// Format integer cents as dollars with two decimals, e.g. `1234` → `$12.34`.
pub fn format_price(cents: i64) -> String {
    let sign = if cents < 0 { "-" } else { "" };
    let abs = cents.unsigned_abs();
    format!("{}${}.{:02}", sign, abs / 100, abs % 100)
}

/// Format a tier as `"{name} ({price})"`.
pub fn format_tier(tier: &Tier) -> String {
    format!("{} ({})", tier.name, format_price(tier.monthly_price_in_cents))
}

/// Discord timestamp markup in short date/time style.
///
/// Clients render it in the viewer's locale and timezone.
pub fn format_timestamp(at: &DateTime<Utc>) -> String {
    format!("<t:{}:f>", at.timestamp())
}

pub fn format_privacy(level: PrivacyLevel) -> &'static str {
    match level {
        PrivacyLevel::Public => "Public",
        PrivacyLevel::Private => "Private",
    }
}
