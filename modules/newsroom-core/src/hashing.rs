use sha2::{Digest, Sha256};

use newsroom_common::PrimitiveWeights;

/// Hex SHA-256 of `input`, truncated to `len` characters.
pub fn short_hash(input: &str, len: usize) -> String {
    let digest = hex::encode(Sha256::digest(input.as_bytes()));
    digest[..len.min(digest.len())].to_string()
}

/// Stable fingerprint of a weight vector; changes whenever any weight changes.
///
/// Hashes the sorted-key JSON form so field order never matters.
pub fn weights_hash(weights: &PrimitiveWeights) -> String {
    // serde_json::Value maps are BTreeMap-backed, so keys serialize sorted.
    let canonical = serde_json::to_value(weights)
        .map(|v| v.to_string())
        .unwrap_or_default();
    hex::encode(Sha256::digest(canonical.as_bytes()))
}
