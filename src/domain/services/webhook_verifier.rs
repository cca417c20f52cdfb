use crate::error::AppError;
use hmac::{Hmac, Mac};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

pub const SIGNATURE_HEADER: &str = "stripe-signature";

/// Signed timestamps older or newer than this are rejected to limit replay.
const TOLERANCE_SECS: i64 = 300;

/// Verifies a `t=<unix>,v1=<hex>` signature header against the raw request
/// body. The MAC input is `"{t}.{body}"`. Comparison is constant-time via
/// the MAC itself. Any failure means the request must be rejected before any
/// business logic runs.
pub fn verify_signature(
    secret: &str,
    header: &str,
    payload: &[u8],
    now_unix: i64,
) -> Result<(), AppError> {
    let mut timestamp: Option<i64> = None;
    let mut signatures: Vec<&str> = Vec::new();

    for part in header.split(',') {
        let mut kv = part.trim().splitn(2, '=');
        match (kv.next(), kv.next()) {
            (Some("t"), Some(v)) => timestamp = v.parse().ok(),
            (Some("v1"), Some(v)) => signatures.push(v),
            _ => {}
        }
    }

    let timestamp = timestamp
        .ok_or_else(|| AppError::Validation("Malformed signature header".into()))?;
    if signatures.is_empty() {
        return Err(AppError::Validation("Malformed signature header".into()));
    }
    if (now_unix - timestamp).abs() > TOLERANCE_SECS {
        return Err(AppError::Validation("Signature timestamp outside tolerance".into()));
    }

    let mut mac = HmacSha256::new_from_slice(secret.as_bytes())
        .map_err(|_| AppError::Internal)?;
    mac.update(timestamp.to_string().as_bytes());
    mac.update(b".");
    mac.update(payload);

    for sig in signatures {
        if let Ok(bytes) = hex::decode(sig)
            && mac.clone().verify_slice(&bytes).is_ok()
        {
            return Ok(());
        }
    }

    Err(AppError::Validation("Signature verification failed".into()))
}

/// Produces a header the verifier accepts. Used by local tooling and tests
/// to stand in for the payment processor.
pub fn sign_payload(secret: &str, payload: &[u8], timestamp: i64) -> String {
    let mut mac = HmacSha256::new_from_slice(secret.as_bytes())
        .expect("HMAC can take key of any size");
    mac.update(timestamp.to_string().as_bytes());
    mac.update(b".");
    mac.update(payload);
    format!("t={},v1={}", timestamp, hex::encode(mac.finalize().into_bytes()))
}
