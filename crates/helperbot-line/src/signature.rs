//! `x-line-signature` verification.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use hmac::digest::InvalidLength;
use hmac::{Hmac, Mac};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

/// Name of the header carrying the signature.
pub const SIGNATURE_HEADER: &str = "x-line-signature";

/// Verifies `signature` (base64 HMAC-SHA256 of `body` keyed by the channel
/// secret) using constant-time comparison.
#[must_use]
pub fn verify(channel_secret: &str, body: &[u8], signature: &str) -> bool {
    let Ok(expected) = STANDARD.decode(signature.trim()) else {
        return false;
    };
    let Ok(mut mac) = HmacSha256::new_from_slice(channel_secret.as_bytes()) else {
        return false;
    };
    mac.update(body);
    mac.verify_slice(&expected).is_ok()
}

/// Computes the signature LINE would send for `body`.
///
/// # Errors
///
/// Returns `InvalidLength` if the key is rejected by the MAC.
pub fn sign(channel_secret: &str, body: &[u8]) -> Result<String, InvalidLength> {
    let mut mac = HmacSha256::new_from_slice(channel_secret.as_bytes())?;
    mac.update(body);
    Ok(STANDARD.encode(mac.finalize().into_bytes()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_signature_passes() {
        let sig = sign("channel-secret", br#"{"events":[]}"#).unwrap();

        assert!(verify("channel-secret", br#"{"events":[]}"#, &sig));
    }

    #[test]
    fn test_wrong_secret_fails() {
        let sig = sign("correct-secret", b"body").unwrap();

        assert!(!verify("wrong-secret", b"body", &sig));
    }

    #[test]
    fn test_tampered_body_fails() {
        let sig = sign("secret", b"original body").unwrap();

        assert!(!verify("secret", b"tampered body", &sig));
    }

    #[test]
    fn test_invalid_base64_fails() {
        assert!(!verify("secret", b"body", "not base64!"));
        assert!(!verify("secret", b"body", ""));
    }
}
