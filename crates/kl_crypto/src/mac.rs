//! HMAC-SHA256 tags
//!
//! - Record index tags: `HMAC(index_key, domain)`. A keyed tag rather than
//!   a plain hash, so holding the serialized store is not enough to test
//!   whether a guessed domain is present.
//! - Master-password check tag: `HMAC(password, master_salt)`, stored
//!   beside the salt and recomputed at load to verify the password without
//!   persisting the password or any derived key.

use hmac::{Hmac, Mac};
use sha2::Sha256;

use crate::kdf::IndexKey;

type HmacSha256 = Hmac<Sha256>;

/// Length of every tag, in bytes.
pub const TAG_LEN: usize = 32;

/// Index tag for a domain name, keyed by the session index key.
pub fn index_tag(key: &IndexKey, domain: &str) -> [u8; TAG_LEN] {
    let mut mac =
        HmacSha256::new_from_slice(key.as_bytes()).expect("HMAC accepts any key length");
    mac.update(domain.as_bytes());
    mac.finalize().into_bytes().into()
}

/// Password check tag over the master salt, keyed by the raw password.
pub fn password_tag(password: &str, master_salt: &[u8]) -> [u8; TAG_LEN] {
    let mut mac =
        HmacSha256::new_from_slice(password.as_bytes()).expect("HMAC accepts any key length");
    mac.update(master_salt);
    mac.finalize().into_bytes().into()
}

/// Constant-time verification of a stored password check tag.
pub fn verify_password_tag(password: &str, master_salt: &[u8], expected: &[u8]) -> bool {
    let mut mac =
        HmacSha256::new_from_slice(password.as_bytes()).expect("HMAC accepts any key length");
    mac.update(master_salt);
    mac.verify_slice(expected).is_ok()
}

/// Constant-time slice comparison. A length mismatch fails fast; lengths
/// here are public.
pub fn ct_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    let mut diff = 0u8;
    for (x, y) in a.iter().zip(b.iter()) {
        diff |= x ^ y;
    }
    diff == 0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kdf::{IndexKey, KEY_LEN};

    #[test]
    fn index_tags_differ_per_domain() {
        let key = IndexKey::from_bytes([3u8; KEY_LEN]);
        assert_ne!(index_tag(&key, "a.com"), index_tag(&key, "b.com"));
    }

    #[test]
    fn index_tags_differ_per_key() {
        let k1 = IndexKey::from_bytes([1u8; KEY_LEN]);
        let k2 = IndexKey::from_bytes([2u8; KEY_LEN]);
        assert_ne!(index_tag(&k1, "a.com"), index_tag(&k2, "a.com"));
    }

    #[test]
    fn password_tag_verifies() {
        let salt = [5u8; 32];
        let tag = password_tag("pw", &salt);
        assert!(verify_password_tag("pw", &salt, &tag));
        assert!(!verify_password_tag("not-pw", &salt, &tag));
        assert!(!verify_password_tag("pw", &[6u8; 32], &tag));
    }

    #[test]
    fn ct_eq_basics() {
        assert!(ct_eq(b"same", b"same"));
        assert!(!ct_eq(b"same", b"sane"));
        assert!(!ct_eq(b"short", b"longer"));
    }
}
