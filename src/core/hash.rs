//! Content hashing and identifier derivation for blocks.
//!
//! Every function here is pure. Structured payloads are hashed through their
//! compact JSON form (`utils::canonical_json`), so the same record always
//! yields the same bytes.

use crate::utils::{canonical_json, sha256_hex};
use serde::Serialize;

/// Hex characters kept for transaction IDs and hash details
pub const SHORT_DIGEST_LEN: usize = 12;

pub const TRANSACTION_ID_PREFIX: &str = "IND";

/// SHA-256 over index, previous hash, timestamp, both payloads and the
/// transaction ID, concatenated in that order. Returns 64 lowercase hex chars.
pub fn content_hash<C: Serialize, S: Serialize>(
    index: u64,
    previous_hash: &str,
    timestamp: i64,
    contract_record: &C,
    sensor_record: &S,
    transaction_id: &str,
) -> String {
    let index = index.to_string();
    let timestamp = timestamp.to_string();
    let contract = canonical_json(contract_record);
    let sensor = canonical_json(sensor_record);
    sha256_hex(&[
        index.as_bytes(),
        previous_hash.as_bytes(),
        timestamp.as_bytes(),
        contract.as_bytes(),
        sensor.as_bytes(),
        transaction_id.as_bytes(),
    ])
}

/// `IND-<timestamp>-<first 12 hex chars, uppercased>` of the payloads and timestamp
pub fn derive_transaction_id<C: Serialize, S: Serialize>(
    contract_record: &C,
    sensor_record: &S,
    timestamp: i64,
) -> String {
    let contract = canonical_json(contract_record);
    let sensor = canonical_json(sensor_record);
    let timestamp_text = timestamp.to_string();
    let digest = sha256_hex(&[
        contract.as_bytes(),
        sensor.as_bytes(),
        timestamp_text.as_bytes(),
    ]);
    format!(
        "{TRANSACTION_ID_PREFIX}-{timestamp}-{}",
        digest[..SHORT_DIGEST_LEN].to_uppercase()
    )
}

/// Display-only digest: first 12 lowercase hex chars of the value's SHA-256
pub fn short_digest(value: Option<&str>) -> String {
    let digest = sha256_hex(&[value.unwrap_or_default().as_bytes()]);
    digest[..SHORT_DIGEST_LEN].to_string()
}
