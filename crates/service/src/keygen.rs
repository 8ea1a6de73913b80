//! Random user key generation.

use rand::{distributions::Alphanumeric, Rng};

/// Length of every generated user key.
pub const KEY_LENGTH: usize = 16;

/// Random string of `len` characters drawn uniformly from `[A-Za-z0-9]`.
/// Not suitable as a cryptographic secret.
pub fn generate_key(len: usize) -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(len)
        .map(char::from)
        .collect()
}

/// Keep generating until `is_taken` rejects the candidate.
pub fn generate_unique_key<F>(len: usize, is_taken: F) -> String
where
    F: Fn(&str) -> bool,
{
    loop {
        let key = generate_key(len);
        if !is_taken(&key) {
            return key;
        }
    }
}
