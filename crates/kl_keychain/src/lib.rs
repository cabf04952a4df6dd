//! kl_keychain - Keyloft encrypted keychain engine
//!
//! A local, password-derived key-value store mapping domain names to short
//! secret values, persisted as an opaque, integrity-checked blob.
//!
//! # How a record is protected
//! - The master password is stretched with Argon2id into the index key; the
//!   cipher key is a hashed copy so the index MAC and the AEAD never share
//!   bytes.
//! - Domains are indexed by HMAC-SHA256 tag. Holding the serialized store
//!   is not enough to confirm which domains are present by hashing guesses.
//! - Every write advances a rolling SHA-256 salt chain and seals
//!   `value || domain || salt` with XChaCha20-Poly1305. The embedded suffix
//!   is re-checked on read, which is what defeats ciphertext swap attacks:
//!   a blob moved to another index tag still authenticates, but then names
//!   the wrong domain and the read fails closed.
//! - `dump` pairs the serialized state with a SHA-256 checksum of those
//!   exact bytes; `load` verifies the checksum before parsing and the
//!   password tag before adopting anything.
//!
//! # Module layout
//! - `keychain` - the ready/not-ready controller and dump/load lifecycle
//! - `store`    - domain-indexed authenticated record storage
//! - `state`    - persisted state and its wire encoding
//! - `handle`   - cloneable, lock-serialized handle for multi-caller use
//! - `error`    - the `KeychainError` taxonomy

pub mod error;
pub mod handle;
pub mod keychain;
pub mod state;
pub mod store;

pub use error::KeychainError;
pub use handle::KeychainHandle;
pub use keychain::{Keychain, Snapshot};
