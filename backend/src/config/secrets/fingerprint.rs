//! Truncated SHA-256 fingerprints of key material.
//!
//! Operators can confirm which key is active from the startup log without
//! the key itself ever being printed.

use actix_web::cookie::Key;
use sha2::{Digest, Sha256};

/// Length of the fingerprint in bytes before hex encoding.
const FINGERPRINT_BYTES: usize = 8;

/// Fingerprint arbitrary secret bytes as 16 lowercase hex characters.
///
/// # Examples
///
/// ```rust
/// use bastion::config::secrets::fingerprint::bytes_fingerprint;
///
/// let fp = bytes_fingerprint(b"token-secret");
/// assert_eq!(fp.len(), 16);
/// assert!(fp.chars().all(|c| c.is_ascii_hexdigit()));
/// ```
#[must_use]
pub fn bytes_fingerprint(bytes: &[u8]) -> String {
    let digest = Sha256::digest(bytes);
    hex::encode(&digest[..FINGERPRINT_BYTES])
}

/// Fingerprint the signing half of a session key.
#[must_use]
pub fn key_fingerprint(key: &Key) -> String {
    bytes_fingerprint(key.signing())
}
