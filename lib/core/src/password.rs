//! Salted password hashing for user accounts

use sha2::{Digest, Sha256};
use uuid::Uuid;

const SCHEME: &str = "sha256";
const ITERATIONS: u32 = 50_000;

fn digest(password: &str, salt: &str) -> String {
    let mut data = format!("{salt}{password}").into_bytes();
    for _ in 0..ITERATIONS {
        data = Sha256::digest(&data).to_vec();
    }
    hex::encode(data)
}

/// Hash a plain password with a fresh random salt
///
/// Stored form: `sha256$<salt>$<hex digest>`.
#[must_use]
pub fn hash_password(password: &str) -> String {
    let salt = Uuid::new_v4().simple().to_string();
    let digest = digest(password, &salt);
    format!("{SCHEME}${salt}${digest}")
}

/// Check a plain password against a stored hash
#[must_use]
pub fn verify_password(password: &str, stored: &str) -> bool {
    let mut parts = stored.splitn(3, '$');
    let (Some(scheme), Some(salt), Some(expected)) = (parts.next(), parts.next(), parts.next())
    else {
        return false;
    };
    if scheme != SCHEME {
        return false;
    }

    // Byte-wise comparison without early exit
    let actual = digest(password, salt);
    if actual.len() != expected.len() {
        return false;
    }
    actual
        .bytes()
        .zip(expected.bytes())
        .fold(0u8, |acc, (a, b)| acc | (a ^ b))
        == 0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_and_verify() {
        let hash = hash_password("secret-password");
        assert!(hash.starts_with("sha256$"));
        assert!(verify_password("secret-password", &hash));
        assert!(!verify_password("wrong-password", &hash));
    }

    #[test]
    fn test_salts_are_unique() {
        let a = hash_password("same-password");
        let b = hash_password("same-password");
        assert_ne!(a, b);
        assert!(verify_password("same-password", &a));
        assert!(verify_password("same-password", &b));
    }

    #[test]
    fn test_malformed_hash_rejected() {
        assert!(!verify_password("anything", ""));
        assert!(!verify_password("anything", "plaintext"));
        assert!(!verify_password("anything", "md5$salt$digest"));
    }
}
