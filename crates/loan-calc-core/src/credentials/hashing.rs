use rand::RngCore;
use sha2::{Digest, Sha256};
use subtle::ConstantTimeEq;

const SALT_LEN: usize = 16;

/// Salted SHA-256 digest of a password.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PasswordDigest {
    salt: Vec<u8>,
    hash: Vec<u8>,
}

impl PasswordDigest {
    /// Hash `password` under a fresh random salt.
    pub fn new(password: &str) -> Self {
        let mut salt = vec![0u8; SALT_LEN];
        rand::thread_rng().fill_bytes(&mut salt);
        let hash = digest(&salt, password);
        Self { salt, hash }
    }

    /// Rebuild from stored hex strings. `None` if either is malformed.
    pub fn from_hex(salt: &str, hash: &str) -> Option<Self> {
        Some(Self {
            salt: hex::decode(salt).ok()?,
            hash: hex::decode(hash).ok()?,
        })
    }

    /// Constant-time comparison against the stored digest.
    pub fn verify(&self, password: &str) -> bool {
        digest(&self.salt, password).ct_eq(&self.hash).into()
    }

    pub fn salt_hex(&self) -> String {
        hex::encode(&self.salt)
    }

    pub fn hash_hex(&self) -> String {
        hex::encode(&self.hash)
    }
}

fn digest(salt: &[u8], password: &str) -> Vec<u8> {
    let mut hasher = Sha256::new();
    hasher.update(salt);
    hasher.update(password.as_bytes());
    hasher.finalize().to_vec()
}
