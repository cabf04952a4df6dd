//! Keychain controller: the ready/not-ready state machine that gates every
//! operation, and the dump/load lifecycle around the persisted state.
//!
//! Load ordering is deliberate and must not change: the whole-blob checksum
//! is verified against the raw serialized bytes first, then the blob is
//! parsed, then the password tag is checked, and only then is the parsed
//! state adopted. A tampered blob therefore reports an integrity error even
//! when the password is also wrong.

use tracing::{debug, warn};

use kl_crypto::checksum;
use kl_crypto::kdf::{self, KdfParams, SecretMaterial};
use kl_crypto::mac;

use crate::error::KeychainError;
use crate::state::{KeychainState, WireState};
use crate::store;

/// A serialized keychain paired with the checksum of those exact bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot {
    pub data: String,
    pub checksum: String,
}

/// Two-state session: secret material exists only while ready, and is
/// dropped (zeroized) on every transition back.
enum Session {
    NotReady,
    Ready {
        secrets: SecretMaterial,
        state: KeychainState,
    },
}

/// The keychain controller. One master password, one store.
///
/// All mutation goes through `&mut self`; for a shared, lock-serialized
/// instance see [`crate::KeychainHandle`].
pub struct Keychain {
    params: KdfParams,
    session: Session,
}

impl Keychain {
    /// A controller with default (interactive-strength) KDF costs, in the
    /// not-ready state.
    pub fn new() -> Self {
        Self::with_kdf_params(KdfParams::default())
    }

    /// A controller with explicit KDF costs. The same costs must be used
    /// to load a dump they produced.
    pub fn with_kdf_params(params: KdfParams) -> Self {
        Self {
            params,
            session: Session::NotReady,
        }
    }

    pub fn is_ready(&self) -> bool {
        matches!(self.session, Session::Ready { .. })
    }

    /// Drop all state and secret material and return to not-ready.
    pub fn clear(&mut self) {
        self.session = Session::NotReady;
    }

    /// Create a fresh, empty keychain guarded by `password`, discarding any
    /// prior state. The controller is ready afterwards.
    pub fn init(&mut self, password: &str) -> Result<(), KeychainError> {
        self.clear();

        let master_salt = kdf::generate_master_salt();
        let master_salt_enc = mac::password_tag(password, &master_salt);
        let secrets = kdf::derive_keys(password, &master_salt, &self.params)?;

        self.session = Session::Ready {
            secrets,
            state: KeychainState::fresh(master_salt, master_salt_enc),
        };
        debug!("keychain initialised with a fresh master salt");
        Ok(())
    }

    /// Restore a keychain from `serialized` (a previous [`Snapshot::data`]).
    ///
    /// When `trusted_checksum` is given it is verified against the exact
    /// bytes of `serialized` before anything is parsed; a mismatch is fatal.
    /// A wrong password is the expected `Ok(false)` outcome and leaves the
    /// controller not-ready.
    pub fn load(
        &mut self,
        password: &str,
        serialized: &str,
        trusted_checksum: Option<&str>,
    ) -> Result<bool, KeychainError> {
        self.clear();

        if let Some(expected) = trusted_checksum {
            if !checksum::matches(serialized.as_bytes(), expected) {
                warn!("keychain blob failed its trusted checksum");
                return Err(KeychainError::Integrity(
                    "serialized keychain does not match its trusted checksum".into(),
                ));
            }
        }

        let wire: WireState = serde_json::from_str(serialized)
            .map_err(|e| KeychainError::Format(e.to_string()))?;
        let state = KeychainState::from_wire(wire)?;

        if !mac::verify_password_tag(password, &state.master_salt, &state.master_salt_enc) {
            debug!("keychain load rejected: wrong master password");
            return Ok(false);
        }

        let secrets = kdf::derive_keys(password, &state.master_salt, &self.params)?;
        self.session = Session::Ready { secrets, state };
        debug!("keychain loaded and ready");
        Ok(true)
    }

    /// Serialize the keychain and checksum the exact serialized bytes.
    /// Returns `Ok(None)` when not ready; that is not an error.
    pub fn dump(&self) -> Result<Option<Snapshot>, KeychainError> {
        let Session::Ready { state, .. } = &self.session else {
            return Ok(None);
        };
        let data = serde_json::to_string(&state.to_wire())
            .map_err(|e| KeychainError::Format(e.to_string()))?;
        let checksum = checksum::checksum_hex(data.as_bytes());
        Ok(Some(Snapshot { data, checksum }))
    }

    /// Fetch the secret for `domain`. Absence is `Ok(None)`.
    pub fn get(&self, domain: &str) -> Result<Option<String>, KeychainError> {
        let Session::Ready { secrets, state } = &self.session else {
            return Err(KeychainError::NotReady);
        };
        store::get(state, secrets, domain)
    }

    /// Insert or update the secret for `domain`.
    pub fn set(&mut self, domain: &str, value: &str) -> Result<(), KeychainError> {
        let Session::Ready { secrets, state } = &mut self.session else {
            return Err(KeychainError::NotReady);
        };
        store::put(state, secrets, domain, value)?;
        debug!(records = state.records.len(), "record stored");
        Ok(())
    }

    /// Remove the secret for `domain`. `Ok(false)` when absent.
    pub fn remove(&mut self, domain: &str) -> Result<bool, KeychainError> {
        let Session::Ready { secrets, state } = &mut self.session else {
            return Err(KeychainError::NotReady);
        };
        let removed = store::remove(state, secrets, domain);
        if removed {
            debug!(records = state.records.len(), "record removed");
        }
        Ok(removed)
    }
}

impl Default for Keychain {
    fn default() -> Self {
        Self::new()
    }
}
