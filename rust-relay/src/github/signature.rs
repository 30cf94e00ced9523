//! GitHub webhook signature verification.
//!
//! GitHub signs each delivery with HMAC-SHA256 over the raw request body and
//! sends the hex digest in `X-Hub-Signature-256` as `sha256=<hex>`.
//! Reference: https://docs.github.com/en/webhooks/using-webhooks/validating-webhook-deliveries

use hmac::{Hmac, Mac};
use sha2::Sha256;
use tracing::warn;

type HmacSha256 = Hmac<Sha256>;

/// Header carrying the SHA-256 signature.
pub const SIGNATURE_HEADER: &str = "X-Hub-Signature-256";

const SIGNATURE_PREFIX: &str = "sha256=";

/// Verify a GitHub webhook signature.
///
/// # Arguments
///
/// * `secret` - The webhook secret configured on GitHub
/// * `body` - The raw request body, exactly as received
/// * `signature` - The `X-Hub-Signature-256` header value
///
/// # Returns
///
/// `true` if the signature matches, `false` otherwise.
pub fn verify_github_signature(secret: &str, body: &[u8], signature: &str) -> bool {
    if secret.is_empty() || signature.is_empty() {
        warn!(
            has_secret = !secret.is_empty(),
            has_signature = !signature.is_empty(),
            "github_signature_missing_fields"
        );
        return false;
    }

    let Some(hex_digest) = signature.strip_prefix(SIGNATURE_PREFIX) else {
        warn!("github_signature_bad_prefix");
        return false;
    };

    let provided = match hex::decode(hex_digest) {
        Ok(bytes) => bytes,
        Err(_) => {
            warn!(signature_length = signature.len(), "github_signature_not_hex");
            return false;
        }
    };

    let mut mac = match HmacSha256::new_from_slice(secret.as_bytes()) {
        Ok(m) => m,
        Err(_) => {
            warn!("github_signature_invalid_key");
            return false;
        }
    };

    mac.update(body);

    // verify_slice compares in constant time
    let valid = mac.verify_slice(&provided).is_ok();

    if !valid {
        warn!(
            body_length = body.len(),
            digest_length = provided.len(),
            "github_signature_mismatch"
        );
    }

    valid
}

/// Compute the `X-Hub-Signature-256` header value for a body.
#[cfg(test)]
pub(crate) fn sign_github_payload(secret: &str, body: &[u8]) -> String {
    let mut mac =
        HmacSha256::new_from_slice(secret.as_bytes()).expect("HMAC accepts keys of any length");
    mac.update(body);
    format!("{}{}", SIGNATURE_PREFIX, hex::encode(mac.finalize().into_bytes()))
}
