//! Webhook signature verification.
//!
//! The gateway signs each delivery with a shared secret:
//!
//! ```text
//! X-Paygate-Signature: t=<unix seconds>,v1=<hex hmac-sha256 of "t.body">
//! ```

use hmac::{Hmac, Mac};
use sha2::Sha256;
use subtle::ConstantTimeEq;

pub const SIGNATURE_HEADER: &str = "x-paygate-signature";

/// Parses the `t=timestamp,v1=signature` header format.
pub fn parse_signature_header(signature: &str) -> Result<(String, String), String> {
    let mut timestamp = String::new();
    let mut v1_signature = String::new();

    for part in signature.split(',') {
        let kv: Vec<&str> = part.split('=').collect();
        if kv.len() != 2 {
            continue;
        }
        match kv[0] {
            "t" => timestamp = kv[1].to_string(),
            "v1" => v1_signature = kv[1].to_string(),
            _ => {}
        }
    }

    if timestamp.is_empty() || v1_signature.is_empty() {
        return Err("Invalid signature header format".to_string());
    }

    Ok((timestamp, v1_signature))
}

/// Verifies a webhook signature using HMAC-SHA256 with constant-time
/// comparison; the signed timestamp must be within `tolerance_secs` of now
/// to bound replays.
pub fn verify_signature(
    payload: &[u8],
    signature: &str,
    secret: &str,
    tolerance_secs: i64,
) -> Result<bool, String> {
    let (timestamp, v1_sig) = parse_signature_header(signature)?;

    let timestamp_num: i64 = timestamp.parse().map_err(|_| "Invalid timestamp")?;
    let now = chrono::Utc::now().timestamp();
    if (now - timestamp_num).abs() > tolerance_secs {
        return Err("Timestamp outside tolerance window".to_string());
    }

    let payload_str = std::str::from_utf8(payload).map_err(|_| "Invalid UTF-8 payload")?;
    let signed_payload = format!("{}.{}", timestamp, payload_str);

    let mut mac =
        Hmac::<Sha256>::new_from_slice(secret.as_bytes()).map_err(|_| "Invalid secret key")?;
    mac.update(signed_payload.as_bytes());
    let expected = hex::encode(mac.finalize().into_bytes());

    Ok(expected.as_bytes().ct_eq(v1_sig.as_bytes()).into())
}

/// Produce a valid header value for a payload; used by tests and tooling.
pub fn sign_payload(payload: &[u8], secret: &str, timestamp: i64) -> String {
    let payload_str = std::str::from_utf8(payload).expect("payload must be UTF-8");
    let signed_payload = format!("{}.{}", timestamp, payload_str);
    let mut mac = Hmac::<Sha256>::new_from_slice(secret.as_bytes()).expect("any key size works");
    mac.update(signed_payload.as_bytes());
    format!("t={},v1={}", timestamp, hex::encode(mac.finalize().into_bytes()))
}
