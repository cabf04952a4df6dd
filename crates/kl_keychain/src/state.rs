//! Persisted keychain state and its wire encoding.
//!
//! The engine keeps typed state in memory and converts to a text-only serde
//! form on dump, back on load. Binary fields travel as base64 so the
//! serialized bytes are reproducible for checksumming; the record maps are
//! `BTreeMap`s so key order is stable across dumps.

use std::collections::BTreeMap;

use base64::{engine::general_purpose, Engine as _};
use serde::{Deserialize, Serialize};

use kl_crypto::chain::SALT_LEN;
use kl_crypto::mac::TAG_LEN;

use crate::error::KeychainError;

/// Format tag written into every dump. A loaded blob carrying any other
/// tag is rejected as malformed.
pub const FORMAT_VERSION: &str = "keyloft-keychain-v1";

/// Non-secret engine state. Mutated only while the controller is ready.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeychainState {
    pub version: String,
    /// Random, fixed at init.
    pub master_salt: [u8; SALT_LEN],
    /// HMAC(password, master_salt); the password check tag.
    pub master_salt_enc: [u8; TAG_LEN],
    /// Salt-chain head; starts at `master_salt`, advanced on every write.
    pub last_salt: [u8; SALT_LEN],
    /// Hex index tag -> sealed record blob.
    pub records: BTreeMap<String, Vec<u8>>,
    /// Hex index tag -> salt the record was sealed with.
    pub salts: BTreeMap<String, [u8; SALT_LEN]>,
}

impl KeychainState {
    /// Fresh empty state for a newly initialised keychain.
    pub fn fresh(master_salt: [u8; SALT_LEN], master_salt_enc: [u8; TAG_LEN]) -> Self {
        Self {
            version: FORMAT_VERSION.to_string(),
            master_salt,
            master_salt_enc,
            last_salt: master_salt,
            records: BTreeMap::new(),
            salts: BTreeMap::new(),
        }
    }

    pub fn to_wire(&self) -> WireState {
        WireState {
            version: self.version.clone(),
            master_salt: encode(&self.master_salt),
            master_salt_enc: encode(&self.master_salt_enc),
            last_salt: encode(&self.last_salt),
            records: self
                .records
                .iter()
                .map(|(tag, blob)| (tag.clone(), encode(blob)))
                .collect(),
            salts: self
                .salts
                .iter()
                .map(|(tag, salt)| (tag.clone(), encode(salt)))
                .collect(),
        }
    }

    pub fn from_wire(wire: WireState) -> Result<Self, KeychainError> {
        if wire.version != FORMAT_VERSION {
            return Err(KeychainError::Format(format!(
                "unsupported keychain version {:?}",
                wire.version
            )));
        }

        // Records and salts must pair up exactly; an orphan on either side
        // means the blob was not produced by dump.
        for tag in wire.records.keys() {
            if !wire.salts.contains_key(tag) {
                return Err(KeychainError::Format(format!(
                    "record entry {tag} has no matching salt"
                )));
            }
        }
        for tag in wire.salts.keys() {
            if !wire.records.contains_key(tag) {
                return Err(KeychainError::Format(format!(
                    "salt entry {tag} has no matching record"
                )));
            }
        }

        let mut records = BTreeMap::new();
        for (tag, blob) in wire.records {
            let blob = decode("records", &blob)?;
            records.insert(tag, blob);
        }
        let mut salts = BTreeMap::new();
        for (tag, salt) in wire.salts {
            let salt = decode_array::<SALT_LEN>("salts", &salt)?;
            salts.insert(tag, salt);
        }

        Ok(Self {
            version: wire.version,
            master_salt: decode_array("master_salt", &wire.master_salt)?,
            master_salt_enc: decode_array("master_salt_enc", &wire.master_salt_enc)?,
            last_salt: decode_array("last_salt", &wire.last_salt)?,
            records,
            salts,
        })
    }
}

/// Serde form of [`KeychainState`]. The field set is fixed: anything else
/// in a loaded blob is a format error, not silently accepted.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct WireState {
    pub version: String,
    pub master_salt: String,
    pub master_salt_enc: String,
    pub last_salt: String,
    pub records: BTreeMap<String, String>,
    pub salts: BTreeMap<String, String>,
}

fn encode(bytes: &[u8]) -> String {
    general_purpose::STANDARD.encode(bytes)
}

fn decode(field: &str, value: &str) -> Result<Vec<u8>, KeychainError> {
    general_purpose::STANDARD
        .decode(value)
        .map_err(|e| KeychainError::Format(format!("{field}: {e}")))
}

fn decode_array<const N: usize>(field: &str, value: &str) -> Result<[u8; N], KeychainError> {
    let bytes = decode(field, value)?;
    let len = bytes.len();
    bytes
        .try_into()
        .map_err(|_| KeychainError::Format(format!("{field}: expected {N} bytes, got {len}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_state() -> KeychainState {
        let mut state = KeychainState::fresh([1u8; SALT_LEN], [2u8; TAG_LEN]);
        state.last_salt = [3u8; SALT_LEN];
        state.records.insert("aa11".into(), vec![0xde, 0xad]);
        state.salts.insert("aa11".into(), [4u8; SALT_LEN]);
        state
    }

    #[test]
    fn wire_roundtrip() {
        let state = sample_state();
        let json = serde_json::to_string(&state.to_wire()).unwrap();
        let wire: WireState = serde_json::from_str(&json).unwrap();
        assert_eq!(KeychainState::from_wire(wire).unwrap(), state);
    }

    #[test]
    fn serialization_is_deterministic() {
        let state = sample_state();
        let a = serde_json::to_string(&state.to_wire()).unwrap();
        let b = serde_json::to_string(&state.to_wire()).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn unknown_field_rejected() {
        let mut value = serde_json::to_value(sample_state().to_wire()).unwrap();
        value["surprise"] = serde_json::json!("field");
        assert!(serde_json::from_value::<WireState>(value).is_err());
    }

    #[test]
    fn unsupported_version_rejected() {
        let mut wire = sample_state().to_wire();
        wire.version = "keyloft-keychain-v0".into();
        assert!(matches!(
            KeychainState::from_wire(wire),
            Err(KeychainError::Format(_))
        ));
    }

    #[test]
    fn bad_base64_rejected() {
        let mut wire = sample_state().to_wire();
        wire.master_salt = "not base64!!!".into();
        assert!(matches!(
            KeychainState::from_wire(wire),
            Err(KeychainError::Format(_))
        ));
    }

    #[test]
    fn wrong_length_salt_rejected() {
        let mut wire = sample_state().to_wire();
        wire.last_salt = encode(&[0u8; 16]);
        assert!(matches!(
            KeychainState::from_wire(wire),
            Err(KeychainError::Format(_))
        ));
    }

    #[test]
    fn orphan_record_rejected() {
        let mut wire = sample_state().to_wire();
        wire.records.insert("bb22".into(), encode(b"blob"));
        assert!(matches!(
            KeychainState::from_wire(wire),
            Err(KeychainError::Format(_))
        ));
    }

    #[test]
    fn orphan_salt_rejected() {
        let mut wire = sample_state().to_wire();
        wire.salts.insert("bb22".into(), encode(&[0u8; SALT_LEN]));
        assert!(matches!(
            KeychainState::from_wire(wire),
            Err(KeychainError::Format(_))
        ));
    }
}
