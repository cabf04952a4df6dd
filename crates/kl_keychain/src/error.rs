use thiserror::Error;

/// Failure taxonomy of the keychain engine.
///
/// A wrong master password at load is NOT an error: it is the expected,
/// recoverable `Ok(false)` outcome of [`crate::Keychain::load`]. Integrity
/// failures by contrast mean the blob cannot be trusted at all.
#[derive(Debug, Error)]
pub enum KeychainError {
    #[error("Keychain is not ready; call init or load first")]
    NotReady,

    #[error("Invalid keychain format: {0}")]
    Format(String),

    #[error("Corruption or tampering detected: {0}")]
    Integrity(String),

    #[error("Secret for {domain:?} is {len} bytes; the limit is {max}")]
    ValueTooLong {
        domain: String,
        len: usize,
        max: usize,
    },

    #[error("Crypto error: {0}")]
    Crypto(#[from] kl_crypto::CryptoError),
}
