//! Utility functions and helpers
//!
//! This module contains the digest and clock helpers used by the hash
//! engine, and the JSON helpers for canonical payloads and chain export.

pub mod crypto;
pub mod serialization;

pub use crypto::{current_timestamp, sha256_hex};

pub use serialization::{canonical_json, read_chain, write_chain};
