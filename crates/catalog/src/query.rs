use arkiv_core::types::FileType;
use arkiv_scene::{SortKey, order, smart_search};
use serde::{Deserialize, Serialize};

use crate::list::FileEntry;

pub const PER_PAGE: usize = 30;

/// Type filter over a listing. `Folder` keeps only folders; any concrete file
/// type hides folders entirely.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TypeFilter {
    #[default]
    All,
    Folder,
    Video,
    Audio,
    Archive,
    Other,
}

impl TypeFilter {
    fn keeps(self, entry: &FileEntry) -> bool {
        match self {
            Self::All => true,
            Self::Folder => entry.file.is_folder,
            Self::Video => !entry.file.is_folder && entry.file_type == FileType::Video,
            Self::Audio => !entry.file.is_folder && entry.file_type == FileType::Audio,
            Self::Archive => !entry.file.is_folder && entry.file_type == FileType::Archive,
            Self::Other => !entry.file.is_folder && entry.file_type == FileType::Other,
        }
    }
}

/// Listing request: filter, search, sort and pagination parameters.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ListQuery {
    /// Folder to list; the archive root when absent.
    pub folder: Option<String>,
    pub filter: TypeFilter,
    pub year: Option<i32>,
    pub search: Option<String>,
    pub sort: SortKey,
    pub page: usize,
    pub per_page: usize,
}

impl Default for ListQuery {
    fn default() -> Self {
        Self {
            folder: None,
            filter: TypeFilter::All,
            year: None,
            search: None,
            sort: SortKey::Date,
            page: 1,
            per_page: PER_PAGE,
        }
    }
}

/// One page of a filtered, sorted listing.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Page {
    pub files: Vec<FileEntry>,
    pub total: usize,
    pub page: usize,
    pub per_page: usize,
    pub total_pages: usize,
}

/// Apply a query to a raw listing: filter, search, sort (folders first),
/// then slice out the requested page.
pub fn apply(entries: Vec<FileEntry>, query: &ListQuery) -> Page {
    let mut filtered: Vec<FileEntry> = entries
        .into_iter()
        .filter(|e| query.filter.keeps(e))
        .filter(|e| query.year.is_none_or(|y| e.year == Some(y)))
        .filter(|e| {
            query
                .search
                .as_deref()
                .is_none_or(|s| smart_search(&e.file.name, s))
        })
        .collect();

    filtered.sort_by(|a, b| order::compare(&a.file, &b.file, query.sort));

    let per_page = if query.per_page == 0 {
        PER_PAGE
    } else {
        query.per_page
    };
    let total = filtered.len();
    let total_pages = total.div_ceil(per_page).max(1);
    let page = query.page.clamp(1, total_pages);

    let start = (page - 1) * per_page;
    let files: Vec<FileEntry> = filtered
        .into_iter()
        .skip(start)
        .take(per_page)
        .collect();

    Page {
        files,
        total,
        page,
        per_page,
        total_pages,
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
