//! One-time verification codes
//!
//! Codes are six random digits. Only their SHA-256 digest is persisted.

use rand::Rng;
use sha2::{Digest, Sha256};

pub const OTP_LENGTH: usize = 6;

/// Generate a numeric code of [`OTP_LENGTH`] digits (leading zeros kept).
pub fn generate_code() -> String {
    let mut rng = rand::thread_rng();
    (0..OTP_LENGTH)
        .map(|_| char::from(b'0' + rng.gen_range(0..10u8)))
        .collect()
}

pub fn hash_code(code: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(code.trim().as_bytes());
    hex::encode(hasher.finalize())
}

/// Compare a submitted code against the stored digest.
pub fn verify_code(code: &str, expected_hash: &str) -> bool {
    let actual = hash_code(code);
    // equal-length hex strings; compare every byte
    actual.len() == expected_hash.len()
        && actual
            .bytes()
            .zip(expected_hash.bytes())
            .fold(0u8, |acc, (a, b)| acc | (a ^ b))
            == 0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_are_six_digits() {
        for _ in 0..50 {
            let code = generate_code();
            assert_eq!(code.len(), OTP_LENGTH);
            assert!(code.chars().all(|c| c.is_ascii_digit()));
        }
    }

    #[test]
    fn hash_matches_only_same_code() {
        let hash = hash_code("012345");
        assert_eq!(hash.len(), 64);
        assert!(verify_code("012345", &hash));
        assert!(verify_code(" 012345 ", &hash));
        assert!(!verify_code("012346", &hash));
    }
}
