//! Single-value identifier files.
//!
//! Each file maps one logical resource to its remote-assigned id: plain
//! text, a single line, nothing else. The value is only ever overwritten
//! wholesale after a successful remote creation; updates leave it alone.

use std::path::Path;

use crate::error::StoreError;

/// Read the cached identifier at `path`.
///
/// Returns `None` when the file does not exist or holds only whitespace --
/// both count as "no resource created yet".
pub fn load(path: &Path) -> Result<Option<String>, StoreError> {
    if !path.exists() {
        return Ok(None);
    }
    let raw = std::fs::read_to_string(path)?;
    let id = raw.trim();
    if id.is_empty() {
        Ok(None)
    } else {
        Ok(Some(id.to_string()))
    }
}

/// Overwrite `path` with `id`.
pub fn store(path: &Path, id: &str) -> Result<(), StoreError> {
    std::fs::write(path, id)?;
    Ok(())
}
