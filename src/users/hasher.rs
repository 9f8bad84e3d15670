//! One-way password digests.
//!
//! The default is a single unsalted SHA-256 pass rendered as lowercase hex.
//! That matches every `users.json` written so far; it is not a password
//! hashing scheme anyone should pick for new data, which is why the algorithm
//! sits behind [`PasswordHasher`].

use sha2::{Digest, Sha256};

pub trait PasswordHasher: Send + Sync {
    fn hash(&self, plaintext: &str) -> String;
}

#[derive(Clone, Copy, Debug, Default)]
pub struct Sha256Hasher;

impl PasswordHasher for Sha256Hasher {
    fn hash(&self, plaintext: &str) -> String {
        let mut hasher = Sha256::new();
        hasher.update(plaintext.as_bytes());
        hex::encode(hasher.finalize())
    }
}

/// Compare two digests without short-circuiting on the first differing byte.
#[must_use]
pub fn digest_matches(stored: &str, candidate: &str) -> bool {
    let (a, b) = (stored.as_bytes(), candidate.as_bytes());
    if a.len() != b.len() {
        return false;
    }
    a.iter().zip(b).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}
