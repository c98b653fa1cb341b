//! Document identifiers.
//!
//! A document id is a version 4 UUID. When a seed is given the UUID bytes
//! are taken from the SHA-256 digest of the seed, so regenerating the same
//! chiller yields the same id.

use sha2::{Digest, Sha256};
use uuid::{Builder, Uuid};

/// Lowercase hex SHA-256 digest of `text`.
pub fn seed_digest(text: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(text.as_bytes());
    format!("{:x}", hasher.finalize())
}

pub fn uuid_from_seed(seed: &str) -> Uuid {
    let digest = Sha256::digest(seed.as_bytes());
    let mut bytes = [0u8; 16];
    bytes.copy_from_slice(&digest[..16]);
    Builder::from_random_bytes(bytes).into_uuid()
}

/// Seeded id if a seed is given, random otherwise.
pub fn document_id(seed: Option<&str>) -> Uuid {
    match seed {
        Some(seed) => uuid_from_seed(seed),
        None => Uuid::new_v4(),
    }
}
