//! `CB-ACCESS-SIGN` computation.
//!
//! The prehash string is `timestamp + method + request_path + body` with no
//! separators. It is MAC'd with HMAC-SHA256 keyed by the base64-decoded API
//! secret, and the MAC is base64-encoded. `request_path` includes the query
//! string and `body` must be the exact bytes sent on the wire.

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use hmac::{Hmac, Mac};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

#[derive(Debug, thiserror::Error)]
pub enum SigningError {
    #[error("API secret is not valid base64: {0}")]
    InvalidSecret(#[from] base64::DecodeError),

    #[error("invalid HMAC key: {0}")]
    InvalidKey(String),
}

pub fn sign(
    secret: &str,
    timestamp: &str,
    method: &str,
    request_path: &str,
    body: &str,
) -> Result<String, SigningError> {
    let key = STANDARD.decode(secret)?;
    let mut mac =
        HmacSha256::new_from_slice(&key).map_err(|e| SigningError::InvalidKey(e.to_string()))?;
    mac.update(timestamp.as_bytes());
    mac.update(method.as_bytes());
    mac.update(request_path.as_bytes());
    mac.update(body.as_bytes());
    Ok(STANDARD.encode(mac.finalize().into_bytes()))
}

#[cfg(test)]
mod tests {
    use super::*;

    // base64("exchange-test-secret")
    const SECRET: &str = "ZXhjaGFuZ2UtdGVzdC1zZWNyZXQ=";
    const PATH: &str = "/products/BTC-USD/candles?granularity=60";

    fn reference(secret: &str, message: &str) -> String {
        let key = STANDARD.decode(secret).unwrap();
        let mut mac = HmacSha256::new_from_slice(&key).unwrap();
        mac.update(message.as_bytes());
        STANDARD.encode(mac.finalize().into_bytes())
    }

    #[test]
    fn test_signs_concatenated_prehash() {
        let body = r#"{"side":"buy","product_id":"BTC-USD","type":"market","funds":"100.00"}"#;
        let sig = sign(SECRET, "1700000000", "POST", "/orders", body).unwrap();
        assert_eq!(
            sig,
            reference(SECRET, &format!("1700000000POST/orders{}", body))
        );
    }

    #[test]
    fn test_deterministic() {
        let a = sign(SECRET, "1700000000", "GET", PATH, "").unwrap();
        let b = sign(SECRET, "1700000000", "GET", PATH, "").unwrap();
        assert_eq!(a, b);
        // 32-byte MAC encodes to 44 base64 chars
        assert_eq!(a.len(), 44);
    }

    #[test]
    fn test_any_input_change_changes_signature() {
        let base = sign(SECRET, "1700000000", "GET", PATH, "").unwrap();
        let variants = [
            sign(SECRET, "1700000001", "GET", PATH, "").unwrap(),
            sign(SECRET, "1700000000", "get", PATH, "").unwrap(),
            sign(SECRET, "1700000000", "GET", "/products/BTC-USD/candles?granularity=61", "").unwrap(),
            sign(SECRET, "1700000000", "GET", PATH, " ").unwrap(),
            sign("ZXhjaGFuZ2UtdGVzdC1zZWNyZXU=", "1700000000", "GET", PATH, "").unwrap(),
        ];
        for v in variants {
            assert_ne!(v, base);
        }
    }

    #[test]
    fn test_rejects_malformed_secret() {
        let err = sign("not base64!!", "1700000000", "GET", PATH, "").unwrap_err();
        assert!(matches!(err, SigningError::InvalidSecret(_)));
    }

    #[test]
    fn test_matches_published_vector() {
        // RFC 4231 test case 2: key "Jefe"
        let sig = sign(
            &STANDARD.encode("Jefe"),
            "what do ya want ",
            "for ",
            "nothing",
            "?",
        )
        .unwrap();
        let expected = [
            0x5b, 0xdc, 0xc1, 0x46, 0xbf, 0x60, 0x75, 0x4e, 0x6a, 0x04, 0x24, 0x26, 0x08, 0x95,
            0x75, 0xc7, 0x5a, 0x00, 0x3f, 0x08, 0x9d, 0x27, 0x39, 0x83, 0x9d, 0xec, 0x58, 0xb9,
            0x64, 0xec, 0x38, 0x43,
        ];
        assert_eq!(sig, STANDARD.encode(expected));
    }
}
