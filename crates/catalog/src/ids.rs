//! File ids are hex-encoded root-relative paths. Deterministic, no lookup
//! table, and opaque enough to survive URL plumbing.

use std::path::{Path, PathBuf};

use crate::CatalogError;

pub fn encode_id(relative: &Path) -> String {
    hex::encode(relative.to_string_lossy().as_bytes())
}

pub fn decode_id(id: &str) -> Result<PathBuf, CatalogError> {
    let bytes = hex::decode(id).map_err(|_| CatalogError::BadId)?;
    let s = String::from_utf8(bytes).map_err(|_| CatalogError::BadId)?;
    if s.is_empty() {
        return Err(CatalogError::BadId);
    }
    Ok(PathBuf::from(s))
}

/// Decode an id and resolve it under `root`. Canonicalizes and verifies
/// containment, so `..` segments and symlinks cannot escape the root.
pub fn resolve_id(root: &Path, id: &str) -> Result<PathBuf, CatalogError> {
    let relative = decode_id(id)?;
    let joined = root.join(&relative);

    let canonical = joined.canonicalize().map_err(|_| CatalogError::NotFound)?;
    let root_canonical = root.canonicalize()?;

    if !canonical.starts_with(&root_canonical) {
        return Err(CatalogError::OutsideRoot);
    }

    Ok(canonical)
}

// ─── Tests ───────────────────────────────────────────────────────────────────
