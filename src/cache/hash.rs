//! Content hashing for cache keys.

use serde::Serialize;
use sha2::{Digest, Sha256};

/// SHA-256 of the JSON encoding of `value`, as 64 lowercase hex digits.
///
/// Struct fields serialize in declaration order, so equal keys always hash
/// the same.
pub fn compute_hash<T: Serialize>(value: &T) -> Result<String, serde_json::Error> {
    let bytes = serde_json::to_vec(value)?;
    Ok(format!("{:x}", Sha256::digest(&bytes)))
}
