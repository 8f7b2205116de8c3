use std::path::Path;

use arkiv_core::types::{ArchiveFile, FileType};
use arkiv_scene::{ParsedName, display_name, extract_year, parse_filename};
use serde::Serialize;
use tracing::warn;

use crate::CatalogError;
use crate::ids::{encode_id, resolve_id};

/// One listing row: the raw file plus everything derived from its name.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FileEntry {
    #[serde(flatten)]
    pub file: ArchiveFile,
    pub file_type: FileType,
    pub year: Option<i32>,
    /// RFC 3339 rendering of the mtime.
    pub modified: Option<String>,
    /// Parsed release fields; folders carry none.
    pub parsed: Option<ParsedName>,
    pub display_name: String,
}

/// List one directory level. `folder_id` of `None` means the archive root;
/// otherwise it must resolve to a directory under the root. Hidden entries
/// are skipped. No recursion.
pub fn list_dir(root: &Path, folder_id: Option<&str>) -> Result<Vec<FileEntry>, CatalogError> {
    let dir = match folder_id {
        Some(id) => {
            let p = resolve_id(root, id)?;
            if !p.is_dir() {
                return Err(CatalogError::NotFound);
            }
            p
        }
        None => root.canonicalize()?,
    };
    let root_canonical = root.canonicalize()?;

    let read_dir = match std::fs::read_dir(&dir) {
        Ok(rd) => rd,
        Err(e) => {
            warn!(path = %dir.display(), error = %e, "cannot read directory");
            return Err(CatalogError::Io(e));
        }
    };

    let mut entries = Vec::new();
    for entry in read_dir.flatten() {
        let name = entry.file_name().to_string_lossy().into_owned();
        if name.starts_with('.') {
            continue;
        }

        let meta = match entry.metadata() {
            Ok(m) => m,
            Err(_) => continue,
        };
        let is_folder = meta.is_dir();

        let path = entry.path();
        let relative = path.strip_prefix(&root_canonical).unwrap_or(&path);
        let id = encode_id(relative);

        let time = meta
            .modified()
            .ok()
            .and_then(|t| t.duration_since(std::time::UNIX_EPOCH).ok())
            .map(|d| d.as_secs() as i64)
            .unwrap_or(0);

        let file = ArchiveFile {
            id,
            name: name.clone(),
            size: if is_folder { 0 } else { meta.len() },
            time,
            is_folder,
        };

        let parsed = if is_folder {
            None
        } else {
            Some(parse_filename(&name))
        };
        let display = match &parsed {
            Some(p) => display_name(p),
            None => name.clone(),
        };

        entries.push(FileEntry {
            file_type: if is_folder {
                FileType::Folder
            } else {
                FileType::from_name(&name)
            },
            year: extract_year(&name),
            modified: chrono::DateTime::from_timestamp(time, 0).map(|d| d.to_rfc3339()),
            parsed,
            display_name: display,
            file,
        });
    }

    Ok(entries)
}

/// The bare `ArchiveFile` rows of a listing, for the relation and similarity
/// functions which work over whole-folder file sets.
pub fn archive_files(entries: &[FileEntry]) -> Vec<ArchiveFile> {
    entries.iter().map(|e| e.file.clone()).collect()
}

// ─── Tests ───────────────────────────────────────────────────────────────────
