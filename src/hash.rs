//! BLAKE3 content hashing for drift detection
//!
//! The manifest stores the digest of every component as last written by
//! modepack. Comparing it with the digest of the live file is the only way
//! local edits are detected, so hashes are always taken over raw bytes.

/// Hash prefix for BLAKE3 hashes
pub const HASH_PREFIX: &str = "blake3:";

/// Calculate the BLAKE3 hash of in-memory content
pub fn hash_bytes(content: &[u8]) -> String {
    format!("{}{}", HASH_PREFIX, blake3::hash(content).to_hex())
}

/// Compare two hashes, tolerating a missing prefix on either side
pub fn verify_hash(expected: &str, actual: &str) -> bool {
    let strip = |h: &str| h.strip_prefix(HASH_PREFIX).unwrap_or(h).to_ascii_lowercase();
    strip(expected) == strip(actual)
}
