//! kl_crypto - Keyloft cryptographic primitives
//!
//! # Design principles
//! - NO custom crypto; all primitives come from audited Rust crates.
//! - Secret key material is zeroized on drop.
//! - The index key and the cipher key are distinct newtypes so they cannot
//!   be passed where the other is expected.
//!
//! # Module layout
//! - `kdf`      - Argon2id password derivation and cipher-key separation
//! - `mac`      - HMAC-SHA256 index tags and the master-password check tag
//! - `aead`     - XChaCha20-Poly1305 record sealing
//! - `chain`    - rolling SHA-256 salt chain for per-record salts
//! - `checksum` - whole-blob SHA-256 checksum
//! - `error`    - unified error type

pub mod aead;
pub mod chain;
pub mod checksum;
pub mod error;
pub mod kdf;
pub mod mac;

pub use error::CryptoError;
