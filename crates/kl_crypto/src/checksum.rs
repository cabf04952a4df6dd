//! Whole-blob SHA-256 checksum, hex-encoded.
//!
//! Computed over the exact serialized bytes of the keychain; verifying a
//! previously trusted checksum detects any tampering with the persisted
//! blob as a whole, before it is parsed.

use sha2::{Digest, Sha256};

/// Hex-encoded SHA-256 of `bytes`.
pub fn checksum_hex(bytes: &[u8]) -> String {
    hex::encode(Sha256::digest(bytes))
}

/// Whether `expected_hex` is the checksum of `bytes`. Case-insensitive on
/// the hex digits.
pub fn matches(bytes: &[u8], expected_hex: &str) -> bool {
    expected_hex.eq_ignore_ascii_case(&checksum_hex(bytes))
}
