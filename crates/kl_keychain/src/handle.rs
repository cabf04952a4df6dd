//! Cloneable, lock-serialized keychain handle.
//!
//! The engine itself is synchronous and `&mut self` already makes
//! single-owner use exclusive. When one keychain must serve several
//! callers, this handle puts every operation behind one mutex, so the salt
//! chain and the paired record/salt maps can never be observed torn.

use std::sync::Arc;

use parking_lot::Mutex;

use kl_crypto::kdf::KdfParams;

use crate::error::KeychainError;
use crate::keychain::{Keychain, Snapshot};

/// Thread-safe keychain handle. Clone to share; all clones address the
/// same underlying controller.
#[derive(Clone)]
pub struct KeychainHandle {
    inner: Arc<Mutex<Keychain>>,
}

impl KeychainHandle {
    pub fn new() -> Self {
        Self::from_keychain(Keychain::new())
    }

    pub fn with_kdf_params(params: KdfParams) -> Self {
        Self::from_keychain(Keychain::with_kdf_params(params))
    }

    pub fn from_keychain(keychain: Keychain) -> Self {
        Self {
            inner: Arc::new(Mutex::new(keychain)),
        }
    }

    pub fn is_ready(&self) -> bool {
        self.inner.lock().is_ready()
    }

    pub fn clear(&self) {
        self.inner.lock().clear();
    }

    pub fn init(&self, password: &str) -> Result<(), KeychainError> {
        self.inner.lock().init(password)
    }

    pub fn load(
        &self,
        password: &str,
        serialized: &str,
        trusted_checksum: Option<&str>,
    ) -> Result<bool, KeychainError> {
        self.inner.lock().load(password, serialized, trusted_checksum)
    }

    pub fn dump(&self) -> Result<Option<Snapshot>, KeychainError> {
        self.inner.lock().dump()
    }

    pub fn get(&self, domain: &str) -> Result<Option<String>, KeychainError> {
        self.inner.lock().get(domain)
    }

    pub fn set(&self, domain: &str, value: &str) -> Result<(), KeychainError> {
        self.inner.lock().set(domain, value)
    }

    pub fn remove(&self, domain: &str) -> Result<bool, KeychainError> {
        self.inner.lock().remove(domain)
    }
}

impl Default for KeychainHandle {
    fn default() -> Self {
        Self::new()
    }
}
