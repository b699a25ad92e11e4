//! Verification of signed webhook deliveries.
//!
//! The signature header has the form `t=<unix seconds>,v1=<hex>[,v1=<hex>...]`
//! where each `v1` value is HMAC-SHA256 over `"<t>.<raw body>"` keyed with the
//! endpoint's signing secret. Several `v1` entries appear while a secret is
//! being rotated; any one of them matching is enough.

use hmac::{Hmac, Mac};
use sha2::Sha256;
use thiserror::Error;

type HmacSha256 = Hmac<Sha256>;

pub const SIGNATURE_HEADER: &str = "stripe-signature";

#[derive(Error, Debug, PartialEq, Eq)]
pub enum SignatureError {
    #[error("signature header is missing")]
    MissingHeader,
    #[error("signature header has no timestamp")]
    MissingTimestamp,
    #[error("signature header has no v1 signature")]
    MissingSignature,
    #[error("timestamp is outside the tolerance window")]
    TimestampOutsideTolerance,
    #[error("invalid webhook secret configuration")]
    InvalidSecret,
    #[error("no signature matched the payload")]
    SignatureMismatch,
}

struct ParsedHeader {
    timestamp: i64,
    signatures: Vec<Vec<u8>>,
}

fn parse_header(header: &str) -> Result<ParsedHeader, SignatureError> {
    let mut timestamp = None;
    let mut signatures = Vec::new();

    for part in header.split(',') {
        let Some((key, value)) = part.trim().split_once('=') else {
            continue;
        };
        match key {
            "t" => timestamp = value.parse::<i64>().ok(),
            // Undecodable entries are skipped, not fatal.
            "v1" => {
                if let Ok(bytes) = hex::decode(value) {
                    signatures.push(bytes);
                }
            }
            _ => {}
        }
    }

    let timestamp = timestamp.ok_or(SignatureError::MissingTimestamp)?;
    if signatures.is_empty() {
        return Err(SignatureError::MissingSignature);
    }

    Ok(ParsedHeader {
        timestamp,
        signatures,
    })
}

fn mac_for(secret: &str, timestamp: i64, payload: &[u8]) -> Result<HmacSha256, SignatureError> {
    let mut mac =
        HmacSha256::new_from_slice(secret.as_bytes()).map_err(|_| SignatureError::InvalidSecret)?;
    mac.update(timestamp.to_string().as_bytes());
    mac.update(b".");
    mac.update(payload);
    Ok(mac)
}

/// Verifies `header` against `payload`, rejecting deliveries whose timestamp
/// differs from `now` by more than `tolerance_secs`.
pub fn verify(
    payload: &[u8],
    header: &str,
    secret: &str,
    tolerance_secs: i64,
    now: i64,
) -> Result<(), SignatureError> {
    let parsed = parse_header(header)?;

    if (now - parsed.timestamp).abs() > tolerance_secs {
        return Err(SignatureError::TimestampOutsideTolerance);
    }

    for candidate in &parsed.signatures {
        // verify_slice compares in constant time
        if mac_for(secret, parsed.timestamp, payload)?
            .verify_slice(candidate)
            .is_ok()
        {
            return Ok(());
        }
    }

    Err(SignatureError::SignatureMismatch)
}

/// Produces a header value in the format `verify` accepts.
pub fn sign(payload: &[u8], secret: &str, timestamp: i64) -> Result<String, SignatureError> {
    let mac = mac_for(secret, timestamp, payload)?;
    Ok(format!(
        "t={},v1={}",
        timestamp,
        hex::encode(mac.finalize().into_bytes())
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "whsec_test123secret456";
    const PAYLOAD: &[u8] = br#"{"type":"payment_intent.succeeded"}"#;
    const NOW: i64 = 1_700_000_000;

    #[test]
    fn test_valid_signature() {
        let header = sign(PAYLOAD, SECRET, NOW).unwrap();
        assert_eq!(verify(PAYLOAD, &header, SECRET, 300, NOW), Ok(()));
    }

    #[test]
    fn test_wrong_secret() {
        let header = sign(PAYLOAD, "wrong_secret", NOW).unwrap();
        assert_eq!(
            verify(PAYLOAD, &header, SECRET, 300, NOW),
            Err(SignatureError::SignatureMismatch)
        );
    }

    #[test]
    fn test_modified_payload() {
        let header = sign(PAYLOAD, SECRET, NOW).unwrap();
        let modified = br#"{"type":"payment_intent.succeeded","hacked":true}"#;
        assert_eq!(
            verify(modified, &header, SECRET, 300, NOW),
            Err(SignatureError::SignatureMismatch)
        );
    }

    #[test]
    fn test_stale_timestamp() {
        let header = sign(PAYLOAD, SECRET, NOW - 600).unwrap();
        assert_eq!(
            verify(PAYLOAD, &header, SECRET, 300, NOW),
            Err(SignatureError::TimestampOutsideTolerance)
        );
    }

    #[test]
    fn test_any_matching_v1_is_accepted() {
        let good = sign(PAYLOAD, SECRET, NOW).unwrap();
        let good_sig = good.split("v1=").nth(1).unwrap();
        let header = format!("t={},v1={},v1={}", NOW, "00".repeat(32), good_sig);
        assert_eq!(verify(PAYLOAD, &header, SECRET, 300, NOW), Ok(()));
    }

    #[test]
    fn test_malformed_headers() {
        assert_eq!(
            verify(PAYLOAD, "v1=abcd", SECRET, 300, NOW),
            Err(SignatureError::MissingTimestamp)
        );
        assert_eq!(
            verify(PAYLOAD, "t=1700000000", SECRET, 300, NOW),
            Err(SignatureError::MissingSignature)
        );
        assert_eq!(
            verify(PAYLOAD, "garbage", SECRET, 300, NOW),
            Err(SignatureError::MissingTimestamp)
        );
        assert_eq!(
            verify(PAYLOAD, "t=1700000000,v1=zz", SECRET, 300, NOW),
            Err(SignatureError::MissingSignature)
        );
    }
}
