// JSON helpers: canonical payload text for hashing, and chain export/import
use crate::core::Block;
use crate::error::{LedgerError, Result};
use serde::Serialize;
use std::fs;
use std::path::Path;

/// Compact JSON in struct declaration order. This is the exact text fed to
/// the hash engine, so it must stay stable.
pub fn canonical_json<T: Serialize>(value: &T) -> String {
    // Plain structs of strings cannot fail to serialize
    serde_json::to_string(value).unwrap_or_default()
}

/// Write the chain as pretty-printed JSON
pub fn write_chain(path: &Path, blocks: &[Block]) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    let json = serde_json::to_string_pretty(blocks)?;
    fs::write(path, json).map_err(|e| {
        LedgerError::UnrecoverableRuntimeFault(format!(
            "Failed to write chain to {}: {e}",
            path.display()
        ))
    })
}

/// Read a chain previously written by `write_chain`
pub fn read_chain(path: &Path) -> Result<Vec<Block>> {
    let raw = fs::read_to_string(path)?;
    let blocks: Vec<Block> = serde_json::from_str(&raw)?;
    Ok(blocks)
}
