//! Check-in token signing and verification.
//!
//! A check-in token is an opaque value handed to an event host and rendered
//! as a QR code on the client. It embeds the event id and an issue
//! timestamp, signed with a server-side shared secret:
//!
//! ```text
//! base64url(event_id ":" issued_at_unix) "." hex(hmac_sha256(secret, payload))
//! ```
//!
//! The timestamp is carried for auditability but is not checked for expiry
//! when the token is redeemed.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use chrono::{DateTime, TimeZone, Utc};
use hmac::{Hmac, Mac};
use sha2::Sha256;
use thiserror::Error;
use uuid::Uuid;

type HmacSha256 = Hmac<Sha256>;

/// Error type for check-in token operations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CheckinTokenError {
    #[error("Malformed check-in token")]
    Malformed,

    #[error("Check-in token signature mismatch")]
    SignatureMismatch,
}

/// Decoded contents of a valid check-in token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckinToken {
    pub event_id: Uuid,
    pub issued_at: DateTime<Utc>,
}

/// Signs a check-in token for the given event.
pub fn sign_token(event_id: Uuid, issued_at: DateTime<Utc>, secret: &str) -> String {
    let payload = format!("{}:{}", event_id, issued_at.timestamp());
    let signature = compute_signature(&payload, secret);
    format!("{}.{}", URL_SAFE_NO_PAD.encode(&payload), signature)
}

/// Verifies a check-in token and returns its decoded contents.
///
/// Fails with `Malformed` when the structure cannot be parsed and with
/// `SignatureMismatch` when the signature does not match the payload under
/// the given secret (i.e. the token was tampered with or signed with a
/// different secret).
pub fn verify_token(token: &str, secret: &str) -> Result<CheckinToken, CheckinTokenError> {
    let (encoded_payload, signature) = token
        .split_once('.')
        .ok_or(CheckinTokenError::Malformed)?;

    let payload_bytes = URL_SAFE_NO_PAD
        .decode(encoded_payload)
        .map_err(|_| CheckinTokenError::Malformed)?;
    let payload = String::from_utf8(payload_bytes).map_err(|_| CheckinTokenError::Malformed)?;

    let signature_bytes = hex::decode(signature).map_err(|_| CheckinTokenError::Malformed)?;

    let mut mac = HmacSha256::new_from_slice(secret.as_bytes())
        .map_err(|_| CheckinTokenError::SignatureMismatch)?;
    mac.update(payload.as_bytes());
    mac.verify_slice(&signature_bytes)
        .map_err(|_| CheckinTokenError::SignatureMismatch)?;

    let (event_id, issued_at) = payload
        .split_once(':')
        .ok_or(CheckinTokenError::Malformed)?;

    let event_id = Uuid::parse_str(event_id).map_err(|_| CheckinTokenError::Malformed)?;
    let issued_at = issued_at
        .parse::<i64>()
        .ok()
        .and_then(|secs| Utc.timestamp_opt(secs, 0).single())
        .ok_or(CheckinTokenError::Malformed)?;

    Ok(CheckinToken {
        event_id,
        issued_at,
    })
}

fn compute_signature(payload: &str, secret: &str) -> String {
    let mut mac = HmacSha256::new_from_slice(secret.as_bytes())
        .expect("HMAC accepts keys of any length");
    mac.update(payload.as_bytes());
    hex::encode(mac.finalize().into_bytes())
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "eventhub-test-secret";

    fn issued_at() -> DateTime<Utc> {
        Utc.timestamp_opt(1_700_000_000, 0).single().unwrap()
    }

    #[test]
    fn test_sign_and_verify_round_trip() {
        let event_id = Uuid::new_v4();
        let token = sign_token(event_id, issued_at(), SECRET);

        let decoded = verify_token(&token, SECRET).unwrap();
        assert_eq!(decoded.event_id, event_id);
        assert_eq!(decoded.issued_at, issued_at());
    }

    #[test]
    fn test_token_is_opaque() {
        let event_id = Uuid::new_v4();
        let token = sign_token(event_id, issued_at(), SECRET);
        assert!(!token.contains(&event_id.to_string()));
        assert_eq!(token.matches('.').count(), 1);
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let token = sign_token(Uuid::new_v4(), issued_at(), SECRET);
        let result = verify_token(&token, "some-other-secret");
        assert_eq!(result, Err(CheckinTokenError::SignatureMismatch));
    }

    #[test]
    fn test_tampered_payload_rejected() {
        let token = sign_token(Uuid::new_v4(), issued_at(), SECRET);
        let (_, signature) = token.split_once('.').unwrap();

        let forged_payload = format!("{}:{}", Uuid::new_v4(), issued_at().timestamp());
        let forged = format!("{}.{}", URL_SAFE_NO_PAD.encode(&forged_payload), signature);

        let result = verify_token(&forged, SECRET);
        assert_eq!(result, Err(CheckinTokenError::SignatureMismatch));
    }

    #[test]
    fn test_tampered_signature_rejected() {
        let token = sign_token(Uuid::new_v4(), issued_at(), SECRET);
        let (payload, signature) = token.split_once('.').unwrap();

        // Flip the first hex character of the signature
        let flipped = if signature.starts_with('0') { "1" } else { "0" };
        let forged = format!("{}.{}{}", payload, flipped, &signature[1..]);

        let result = verify_token(&forged, SECRET);
        assert_eq!(result, Err(CheckinTokenError::SignatureMismatch));
    }

    #[test]
    fn test_malformed_tokens_rejected() {
        for token in [
            "",
            "no-dot-at-all",
            "not!base64.abcdef",
            "dG9rZW4.not-hex!",
        ] {
            assert_eq!(
                verify_token(token, SECRET),
                Err(CheckinTokenError::Malformed),
                "token {:?} should be malformed",
                token
            );
        }
    }

    #[test]
    fn test_payload_without_separator_rejected() {
        let payload = Uuid::new_v4().to_string(); // missing ":timestamp"
        let signature = compute_signature(&payload, SECRET);
        let token = format!("{}.{}", URL_SAFE_NO_PAD.encode(&payload), signature);

        assert_eq!(verify_token(&token, SECRET), Err(CheckinTokenError::Malformed));
    }

    #[test]
    fn test_distinct_events_produce_distinct_tokens() {
        let t1 = sign_token(Uuid::new_v4(), issued_at(), SECRET);
        let t2 = sign_token(Uuid::new_v4(), issued_at(), SECRET);
        assert_ne!(t1, t2);
    }
}
