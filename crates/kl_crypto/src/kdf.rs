//! Key derivation
//!
//! `derive_keys` - Argon2id stretches the master password into the 32-byte
//! index key; the cipher key is a SHA-256 copy of it. The index key also
//! keys the record-index MAC, so the AEAD must never see the same bytes.
//!
//! `generate_master_salt` - fresh random salt, created once per keychain
//! and stored beside the encrypted records (not secret).

use argon2::{Algorithm, Argon2, Params, Version};
use rand::RngCore;
use sha2::{Digest, Sha256};
use zeroize::ZeroizeOnDrop;

use crate::chain::SALT_LEN;
use crate::error::CryptoError;

/// Length of every derived key, in bytes.
pub const KEY_LEN: usize = 32;

/// Keyed-MAC key for domain index tags. Zeroized on drop.
#[derive(Clone, ZeroizeOnDrop)]
pub struct IndexKey([u8; KEY_LEN]);

impl IndexKey {
    pub fn from_bytes(bytes: [u8; KEY_LEN]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; KEY_LEN] {
        &self.0
    }
}

impl std::fmt::Debug for IndexKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("IndexKey").field(&"[REDACTED]").finish()
    }
}

/// AEAD key for record sealing. Zeroized on drop.
#[derive(Clone, ZeroizeOnDrop)]
pub struct CipherKey([u8; KEY_LEN]);

impl CipherKey {
    pub fn from_bytes(bytes: [u8; KEY_LEN]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; KEY_LEN] {
        &self.0
    }
}

impl std::fmt::Debug for CipherKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("CipherKey").field(&"[REDACTED]").finish()
    }
}

/// Secret key material for one ready session. Never serialized.
#[derive(Debug, Clone)]
pub struct SecretMaterial {
    pub index_key: IndexKey,
    pub cipher_key: CipherKey,
}

/// Argon2id cost parameters. Defaults are tuned for interactive use;
/// tests drop them to the minimum.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KdfParams {
    /// Memory cost in KiB.
    pub mem_cost_kib: u32,
    /// Time cost (iterations).
    pub time_cost: u32,
    /// Parallelism (lanes).
    pub parallelism: u32,
}

impl Default for KdfParams {
    fn default() -> Self {
        Self {
            mem_cost_kib: 64 * 1024, // 64 MiB
            time_cost: 3,
            parallelism: 1,
        }
    }
}

/// Derive the session keys from the master password and master salt.
///
/// The index key comes straight out of Argon2id. The cipher key is
/// SHA-256 of the index key: deterministic, but never the same bytes, so
/// the MAC and the AEAD operate under separated keys.
pub fn derive_keys(
    password: &str,
    master_salt: &[u8; SALT_LEN],
    params: &KdfParams,
) -> Result<SecretMaterial, CryptoError> {
    let argon_params = Params::new(
        params.mem_cost_kib,
        params.time_cost,
        params.parallelism,
        Some(KEY_LEN),
    )
    .map_err(|e| CryptoError::KeyDerivation(e.to_string()))?;
    let argon2 = Argon2::new(Algorithm::Argon2id, Version::V0x13, argon_params);

    let mut index = [0u8; KEY_LEN];
    argon2
        .hash_password_into(password.as_bytes(), master_salt, &mut index)
        .map_err(|e| CryptoError::KeyDerivation(e.to_string()))?;

    let cipher: [u8; KEY_LEN] = Sha256::digest(index).into();

    Ok(SecretMaterial {
        index_key: IndexKey::from_bytes(index),
        cipher_key: CipherKey::from_bytes(cipher),
    })
}

/// Generate a fresh random master salt (call once at keychain init).
pub fn generate_master_salt() -> [u8; SALT_LEN] {
    let mut salt = [0u8; SALT_LEN];
    rand::rngs::OsRng.fill_bytes(&mut salt);
    salt
}
