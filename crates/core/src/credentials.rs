//! Password hashing and verification.

use rand::RngCore;
use sha2::{Digest, Sha256};
use subtle::ConstantTimeEq;

const SCHEME: &str = "sha256";
const SALT_LEN: usize = 16;

/// Turns a submitted secret into a storable credential and checks claims against it.
pub trait CredentialHasher: Send + Sync {
    /// Produce a storable credential for `secret`.
    fn hash(&self, secret: &str) -> String;

    /// Check `secret` against a credential previously produced by [`CredentialHasher::hash`].
    fn verify(&self, secret: &str, stored: &str) -> bool;
}

/// Salted SHA-256, stored as `sha256$<salt-hex>$<digest-hex>`.
#[derive(Debug, Clone, Copy, Default)]
pub struct SaltedSha256;

impl SaltedSha256 {
    fn digest(salt: &[u8], secret: &str) -> Vec<u8> {
        let mut hasher = Sha256::new();
        hasher.update(salt);
        hasher.update(secret.as_bytes());
        hasher.finalize().to_vec()
    }
}

impl CredentialHasher for SaltedSha256 {
    fn hash(&self, secret: &str) -> String {
        let mut salt = [0u8; SALT_LEN];
        rand::thread_rng().fill_bytes(&mut salt);
        let digest = Self::digest(&salt, secret);
        format!("{SCHEME}${}${}", hex::encode(salt), hex::encode(digest))
    }

    fn verify(&self, secret: &str, stored: &str) -> bool {
        let mut parts = stored.splitn(3, '$');
        let (Some(scheme), Some(salt_hex), Some(digest_hex)) =
            (parts.next(), parts.next(), parts.next())
        else {
            return false;
        };
        if scheme != SCHEME {
            return false;
        }
        let (Ok(salt), Ok(expected)) = (hex::decode(salt_hex), hex::decode(digest_hex)) else {
            return false;
        };

        let actual = Self::digest(&salt, secret);
        actual.ct_eq(&expected).into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verifies_matching_secret_only() {
        let hasher = SaltedSha256;
        let stored = hasher.hash("password123");

        assert!(stored.starts_with("sha256$"));
        assert!(!stored.contains("password123"));
        assert!(hasher.verify("password123", &stored));
        assert!(!hasher.verify("password124", &stored));
        assert!(!hasher.verify("", &stored));
    }

    #[test]
    fn salts_differ_between_hashes() {
        let hasher = SaltedSha256;
        let first = hasher.hash("secret");
        let second = hasher.hash("secret");
        assert_ne!(first, second);
        assert!(hasher.verify("secret", &first));
        assert!(hasher.verify("secret", &second));
    }

    #[test]
    fn rejects_malformed_credentials() {
        let hasher = SaltedSha256;
        assert!(!hasher.verify("password123", "password123"));
        assert!(!hasher.verify("password123", "md5$00$00"));
        assert!(!hasher.verify("password123", "sha256$zz$00"));
    }
}
