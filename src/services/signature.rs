// services/signature.rs
use hmac::{Hmac, Mac};
use sha2::Sha512;

use crate::errors::{AppError, Result};

type HmacSha512 = Hmac<Sha512>;

pub const PAYSTACK_SIGNATURE_HEADER: &str = "x-paystack-signature";

/// Hex-encoded HMAC-SHA512 of `body` keyed with `secret`.
pub fn sign(secret: &str, body: &[u8]) -> Result<String> {
    let mut mac = mac_for(secret)?;
    mac.update(body);
    Ok(hex::encode(mac.finalize().into_bytes()))
}

/// Checks `signature` against the raw request body. The digest comparison
/// runs in constant time.
pub fn verify_signature(secret: &str, body: &[u8], signature: Option<&str>) -> Result<()> {
    let signature = signature
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or(AppError::MissingSignature)?;

    let expected = hex::decode(signature).map_err(|_| AppError::InvalidSignature)?;

    let mut mac = mac_for(secret)?;
    mac.update(body);
    mac.verify_slice(&expected)
        .map_err(|_| AppError::InvalidSignature)
}

fn mac_for(secret: &str) -> Result<HmacSha512> {
    HmacSha512::new_from_slice(secret.as_bytes())
        .map_err(|e| AppError::configuration(format!("Invalid webhook secret: {}", e)))
}
