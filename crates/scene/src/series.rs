use arkiv_core::types::ArchiveFile;
use serde::Serialize;

use crate::parse::{ParsedName, parse_filename};
use crate::vocab::quality_rank;

/// Grouping key for a series or movie: normalized title plus the year digits.
/// Lossy on purpose; near-identical titles are allowed to collide.
pub fn series_key(parsed: &ParsedName) -> String {
    let mut key = normalize_title(&parsed.title);
    if let Some(year) = parsed.year {
        key.push_str(&year.to_string());
    }
    key
}

/// Lowercased, ASCII-alphanumeric-only form of a title.
pub fn normalize_title(title: &str) -> String {
    title
        .to_lowercase()
        .chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .collect()
}

/// A related file together with its parsed fields.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RelatedEntry {
    #[serde(flatten)]
    pub file: ArchiveFile,
    pub parsed: ParsedName,
}

/// Files related to one filename, partitioned into alternate encodes of the
/// same content and other episodes of the same series.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RelatedFiles {
    pub other_resolutions: Vec<RelatedEntry>,
    pub other_episodes: Vec<RelatedEntry>,
    pub current: ParsedName,
}

/// Partition every *other* file in `all_files` by its relationship to
/// `filename`. Identity is the exact name; a file never relates to itself.
pub fn find_related_files(filename: &str, all_files: &[ArchiveFile]) -> RelatedFiles {
    let current = parse_filename(filename);
    let key = series_key(&current);

    let mut other_resolutions = Vec::new();
    let mut other_episodes = Vec::new();

    for file in all_files {
        if file.name == filename {
            continue;
        }

        let parsed = parse_filename(&file.name);
        let file_key = series_key(&parsed);

        if file_key == key {
            // Same episode in a different encode
            if current.season == parsed.season
                && current.episode == parsed.episode
                && current.resolution != parsed.resolution
            {
                other_resolutions.push(RelatedEntry {
                    file: file.clone(),
                    parsed,
                });
            // Any other episode of the same series
            } else if current.season != parsed.season || current.episode != parsed.episode {
                other_episodes.push(RelatedEntry {
                    file: file.clone(),
                    parsed,
                });
            }
        } else if current.season.is_none() && parsed.season.is_none() {
            // Movie fallback: the keys differ (year mismatch or missing) but
            // the normalized titles agree and the encodes differ.
            let title_match = normalize_title(&current.title) == normalize_title(&parsed.title);
            if title_match && current.resolution != parsed.resolution {
                other_resolutions.push(RelatedEntry {
                    file: file.clone(),
                    parsed,
                });
            }
        }
    }

    other_episodes.sort_by_key(|e| (e.parsed.season.unwrap_or(0), e.parsed.episode.unwrap_or(0)));
    other_resolutions.sort_by(|a, b| {
        quality_rank(b.parsed.resolution.as_deref())
            .cmp(&quality_rank(a.parsed.resolution.as_deref()))
    });

    RelatedFiles {
        other_resolutions,
        other_episodes,
        current,
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
