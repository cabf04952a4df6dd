//! Domain-indexed authenticated record storage.
//!
//! Each record is sealed as `value || domain || salt`. The embedded suffix
//! binds the ciphertext to its own index slot: a blob swapped to another
//! tag still authenticates under the AEAD, but the suffix then names the
//! wrong domain and the read fails closed. The per-record salt comes off
//! the rolling chain, so rewriting a domain never repeats a binding.

use tracing::warn;
use zeroize::Zeroizing;

use kl_crypto::aead;
use kl_crypto::chain::{SaltChain, SALT_LEN};
use kl_crypto::kdf::SecretMaterial;
use kl_crypto::mac;

use crate::error::KeychainError;
use crate::state::KeychainState;

/// Maximum plaintext secret length, in bytes. Longer values are rejected
/// before any state is touched.
pub const MAX_SECRET_LEN: usize = 64;

/// AEAD associated-data label for record blobs.
const RECORD_AAD: &[u8] = b"kl-record-v1";

/// Hex index tag for a domain under the session's index key.
pub fn tag_hex(secrets: &SecretMaterial, domain: &str) -> String {
    hex::encode(mac::index_tag(&secrets.index_key, domain))
}

/// Insert or update the record for `domain`. The chain head and both map
/// entries move together; nothing is written if sealing fails.
pub fn put(
    state: &mut KeychainState,
    secrets: &SecretMaterial,
    domain: &str,
    value: &str,
) -> Result<(), KeychainError> {
    if value.len() > MAX_SECRET_LEN {
        return Err(KeychainError::ValueTooLong {
            domain: domain.to_string(),
            len: value.len(),
            max: MAX_SECRET_LEN,
        });
    }

    let tag = tag_hex(secrets, domain);

    let mut chain = SaltChain::from_head(state.last_salt);
    let salt = chain.advance();

    let mut payload = Zeroizing::new(Vec::with_capacity(
        value.len() + domain.len() + SALT_LEN,
    ));
    payload.extend_from_slice(value.as_bytes());
    payload.extend_from_slice(domain.as_bytes());
    payload.extend_from_slice(&salt);

    let blob = aead::seal(&secrets.cipher_key, &payload, RECORD_AAD)?;

    state.last_salt = *chain.head();
    state.records.insert(tag.clone(), blob);
    state.salts.insert(tag, salt);
    Ok(())
}

/// Fetch and verify the record for `domain`. Absence is `Ok(None)`; any
/// authentication or binding failure is an integrity error, never a silent
/// fallback.
pub fn get(
    state: &KeychainState,
    secrets: &SecretMaterial,
    domain: &str,
) -> Result<Option<String>, KeychainError> {
    let tag = tag_hex(secrets, domain);
    let Some(blob) = state.records.get(&tag) else {
        return Ok(None);
    };
    let salt = state
        .salts
        .get(&tag)
        .ok_or_else(|| KeychainError::Integrity("stored record has no salt".into()))?;

    let payload = aead::open(&secrets.cipher_key, blob, RECORD_AAD)
        .map_err(|_| KeychainError::Integrity("record failed authentication".into()))?;

    let binding_len = domain.len() + SALT_LEN;
    if payload.len() < binding_len {
        warn!("record payload shorter than its binding");
        return Err(KeychainError::Integrity(
            "record payload shorter than its binding".into(),
        ));
    }

    let split = payload.len() - binding_len;
    let (value, suffix) = payload.split_at(split);

    let mut expected = Vec::with_capacity(binding_len);
    expected.extend_from_slice(domain.as_bytes());
    expected.extend_from_slice(salt);

    if !mac::ct_eq(suffix, &expected) {
        warn!("record binding mismatch, possible ciphertext swap");
        return Err(KeychainError::Integrity(
            "record is bound to a different domain or salt".into(),
        ));
    }

    let value = std::str::from_utf8(value)
        .map_err(|_| KeychainError::Integrity("record value is not valid UTF-8".into()))?;
    Ok(Some(value.to_string()))
}

/// Remove the record for `domain`. Both map entries go together; a missing
/// domain reports `false`, not an error.
pub fn remove(state: &mut KeychainState, secrets: &SecretMaterial, domain: &str) -> bool {
    let tag = tag_hex(secrets, domain);
    let removed = state.records.remove(&tag).is_some();
    state.salts.remove(&tag);
    removed
}
