use std::cmp::Ordering;

use arkiv_core::types::ArchiveFile;
use serde::{Deserialize, Serialize};

use crate::parse::{extract_year, parse_filename};

/// Listing sort orders. Folders always sort before files regardless of key.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortKey {
    /// Most recently modified first.
    #[default]
    Date,
    /// Parsed title, then season, then episode.
    Name,
    /// Largest first.
    Size,
    /// Newest release year first.
    Year,
}

fn folders_first(a: &ArchiveFile, b: &ArchiveFile) -> Ordering {
    match (a.is_folder, b.is_folder) {
        (true, false) => Ordering::Less,
        (false, true) => Ordering::Greater,
        _ => Ordering::Equal,
    }
}

/// Compare two entries under a sort key.
///
/// Name ordering is case-insensitive lexicographic over the lowercased
/// titles, not locale collation; non-ASCII titles sort by code point.
pub fn compare(a: &ArchiveFile, b: &ArchiveFile, key: SortKey) -> Ordering {
    let ff = folders_first(a, b);
    if ff != Ordering::Equal {
        return ff;
    }

    match key {
        SortKey::Name => {
            if a.is_folder || b.is_folder {
                return a.name.to_lowercase().cmp(&b.name.to_lowercase());
            }
            let pa = parse_filename(&a.name);
            let pb = parse_filename(&b.name);
            pa.title
                .to_lowercase()
                .cmp(&pb.title.to_lowercase())
                .then(pa.season.unwrap_or(0).cmp(&pb.season.unwrap_or(0)))
                .then(pa.episode.unwrap_or(0).cmp(&pb.episode.unwrap_or(0)))
        }
        SortKey::Size => b.size.cmp(&a.size),
        SortKey::Year => extract_year(&b.name)
            .unwrap_or(0)
            .cmp(&extract_year(&a.name).unwrap_or(0)),
        SortKey::Date => b.time.cmp(&a.time),
    }
}

/// In-place stable sort under a key.
pub fn sort_files(files: &mut [ArchiveFile], key: SortKey) {
    files.sort_by(|a, b| compare(a, b, key));
}

// ─── Tests ───────────────────────────────────────────────────────────────────
