//! Rolling SHA-256 salt chain
//!
//! Every record write advances the chain one step:
//!
//!   salt_i = SHA256(salt_{i-1})        salt_0 = master salt
//!
//! Advancing is one-way, so earlier salts cannot be recovered from the
//! persisted head, and no two writes in a keychain's lifetime ever bind the
//! same salt, even when the same domain is rewritten.

use sha2::{Digest, Sha256};

/// Length of every salt in the chain, in bytes.
pub const SALT_LEN: usize = 32;

/// State of a keychain's salt chain. The head is persisted with the
/// non-secret data and restored on load.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaltChain {
    head: [u8; SALT_LEN],
}

impl SaltChain {
    /// Resume a chain from a persisted head.
    pub fn from_head(head: [u8; SALT_LEN]) -> Self {
        Self { head }
    }

    pub fn head(&self) -> &[u8; SALT_LEN] {
        &self.head
    }

    /// Advance the chain one step and return the fresh salt.
    pub fn advance(&mut self) -> [u8; SALT_LEN] {
        let next: [u8; SALT_LEN] = Sha256::digest(self.head).into();
        self.head = next;
        next
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn advance_moves_the_head() {
        let mut chain = SaltChain::from_head([0u8; SALT_LEN]);
        let salt = chain.advance();
        assert_eq!(&salt, chain.head());
        assert_ne!(salt, [0u8; SALT_LEN]);
    }

    #[test]
    fn successive_salts_differ() {
        let mut chain = SaltChain::from_head([9u8; SALT_LEN]);
        let a = chain.advance();
        let b = chain.advance();
        let c = chain.advance();
        assert_ne!(a, b);
        assert_ne!(b, c);
        assert_ne!(a, c);
    }

    #[test]
    fn chains_are_deterministic() {
        let mut one = SaltChain::from_head([4u8; SALT_LEN]);
        let mut two = SaltChain::from_head([4u8; SALT_LEN]);
        assert_eq!(one.advance(), two.advance());
        assert_eq!(one.advance(), two.advance());
    }
}
