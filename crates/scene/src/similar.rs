use std::collections::HashSet;

use arkiv_core::types::{ArchiveFile, is_video_name};
use rand::Rng;
use rand::seq::SliceRandom;

use crate::parse::{ParsedName, parse_filename};
use crate::series::{RelatedEntry, series_key};

/// Sample up to `count` distinct titles from `all_files` for a "more like
/// this" shelf.
///
/// One candidate per series key, first occurrence wins; the current title is
/// never suggested. A non-video file still claims its key, so a later video
/// encode of the same title is not reconsidered. After shuffling with the
/// caller's random source, up to two picks share the current year and the
/// rest fill from the other years.
pub fn similar_titles<R: Rng + ?Sized>(
    current: &ParsedName,
    all_files: &[ArchiveFile],
    count: usize,
    rng: &mut R,
) -> Vec<RelatedEntry> {
    let mut seen: HashSet<String> = HashSet::new();
    seen.insert(series_key(current));

    let mut unique: Vec<RelatedEntry> = Vec::new();
    for file in all_files {
        let parsed = parse_filename(&file.name);
        if !seen.insert(series_key(&parsed)) {
            continue;
        }
        if !is_video_name(&file.name) {
            continue;
        }
        unique.push(RelatedEntry {
            file: file.clone(),
            parsed,
        });
    }

    unique.shuffle(rng);

    let (same_year, others): (Vec<_>, Vec<_>) = unique
        .into_iter()
        .partition(|e| e.parsed.year == current.year);

    let mut picks: Vec<RelatedEntry> = same_year.into_iter().take(2).collect();
    let fill = count.saturating_sub(picks.len());
    picks.extend(others.into_iter().take(fill));
    picks.truncate(count);
    picks
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn file(name: &str) -> ArchiveFile {
        ArchiveFile {
            id: String::new(),
            name: name.into(),
            size: 0,
            time: 0,
            is_folder: false,
        }
    }

    fn rng() -> StdRng {
        StdRng::seed_from_u64(7)
    }

    #[test]
    fn excludes_current_series() {
        let current = parse_filename("The.Show.S02E05.1080p.mkv");
        let files = vec![
            file("The.Show.S01E01.720p.mkv"),
            file("Other.Series.S01E01.720p.mkv"),
        ];
        let picks = similar_titles(&current, &files, 6, &mut rng());
        assert_eq!(picks.len(), 1);
        assert_eq!(picks[0].file.name, "Other.Series.S01E01.720p.mkv");
    }

    #[test]
    fn one_candidate_per_series_key() {
        let current = parse_filename("Current.2020.mkv");
        let files = vec![
            file("Other.Show.S01E01.mkv"),
            file("Other.Show.S01E02.mkv"),
            file("Other.Show.S02E01.mkv"),
        ];
        let picks = similar_titles(&current, &files, 6, &mut rng());
        assert_eq!(picks.len(), 1);
    }

    #[test]
    fn non_video_consumes_its_key() {
        let current = parse_filename("Current.2020.mkv");
        let files = vec![
            // The .txt claims the key before the video encode is seen
            file("Great.Film.2019.nfo-notes.txt"),
            file("Great.Film.2019.1080p.mkv"),
        ];
        let picks = similar_titles(&current, &files, 6, &mut rng());
        assert!(picks.is_empty());
    }

    #[test]
    fn prefers_up_to_two_same_year_picks() {
        let current = parse_filename("Current.2020.1080p.mkv");
        let files = vec![
            file("A.2020.1080p.mkv"),
            file("B.2020.1080p.mkv"),
            file("C.2020.1080p.mkv"),
            file("D.2001.1080p.mkv"),
            file("E.2002.1080p.mkv"),
            file("F.2003.1080p.mkv"),
        ];
        let picks = similar_titles(&current, &files, 4, &mut rng());
        assert_eq!(picks.len(), 4);
        let same_year = picks.iter().filter(|e| e.parsed.year == Some(2020)).count();
        assert_eq!(same_year, 2);
    }

    #[test]
    fn count_truncates_results() {
        let current = parse_filename("Current.2020.mkv");
        let files = vec![
            file("A.2001.mkv"),
            file("B.2002.mkv"),
            file("C.2003.mkv"),
        ];
        let picks = similar_titles(&current, &files, 2, &mut rng());
        assert_eq!(picks.len(), 2);
    }

    #[test]
    fn deterministic_with_seeded_rng() {
        let current = parse_filename("Current.2020.mkv");
        let files: Vec<ArchiveFile> = (0..20)
            .map(|i| file(&format!("Title{i}.200{}.mkv", i % 10)))
            .collect();
        let a = similar_titles(&current, &files, 6, &mut StdRng::seed_from_u64(42));
        let b = similar_titles(&current, &files, 6, &mut StdRng::seed_from_u64(42));
        assert_eq!(a, b);
    }
}
