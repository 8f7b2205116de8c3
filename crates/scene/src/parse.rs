use serde::{Deserialize, Serialize};
use std::ops::Range;

use crate::vocab::{
    RE_CODEC, RE_EPISODE_BOUNDARY, RE_GROUP, RE_RESOLUTION, RE_SE_COMPACT, RE_SE_CROSS,
    RE_SE_VERBOSE, RE_SOURCE, RE_YEAR,
};

/// Structured fields extracted from a scene-release filename.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParsedName {
    pub title: String,
    pub year: Option<i32>,
    pub season: Option<u32>,
    pub episode: Option<u32>,
    pub episode_title: Option<String>,
    pub resolution: Option<String>,
    pub source: Option<String>,
    pub codec: Option<String>,
    pub group: Option<String>,
    /// Uppercased extension ("MKV"); the whole name when there is no dot.
    pub ext: String,
    /// The input, verbatim.
    pub original: String,
}

struct EpisodeMatch {
    season: u32,
    episode: u32,
    span: Range<usize>,
}

/// Try the episode patterns in fixed order; the first one to match wins and
/// the others are never consulted.
fn try_match_episode(clean: &str) -> Option<EpisodeMatch> {
    for re in [&*RE_SE_COMPACT, &*RE_SE_VERBOSE, &*RE_SE_CROSS] {
        if let Some(caps) = re.captures(clean) {
            let whole = caps.get(0)?;
            let season: u32 = caps[1].parse().ok()?;
            let episode: u32 = caps[2].parse().ok()?;
            return Some(EpisodeMatch {
                season,
                episode,
                span: whole.start()..whole.end(),
            });
        }
    }
    None
}

/// Episode title: the text between the episode marker and the first quality
/// keyword, with a leading dash stripped.
fn episode_title_after(clean: &str, marker_end: usize) -> Option<String> {
    let after = &clean[marker_end..];
    let cut = RE_EPISODE_BOUNDARY
        .find(after)
        .map_or(after.len(), |m| m.start());
    let t = after[..cut].trim();
    let t = match t.strip_prefix('-') {
        Some(rest) => rest.trim(),
        None => t,
    };
    if t.is_empty() { None } else { Some(t.to_string()) }
}

/// Parse a release-style filename. Total: every input yields a `ParsedName`,
/// with `None` for fields that are not present.
pub fn parse_filename(filename: &str) -> ParsedName {
    // Extension is everything after the final dot; a dotless name is its own
    // extension and keeps its full stem.
    let ext = filename.rsplit('.').next().unwrap_or(filename);
    let stem = match filename.rfind('.') {
        Some(pos) if pos + 1 < filename.len() => &filename[..pos],
        _ => filename,
    };

    // Dots and underscores act as word separators in release names.
    let clean = stem.replace(['.', '_'], " ");

    let se = try_match_episode(&clean);
    let (season, episode, episode_title) = match &se {
        Some(m) => (
            Some(m.season),
            Some(m.episode),
            episode_title_after(&clean, m.span.end),
        ),
        None => (None, None, None),
    };

    let year_match = RE_YEAR.find(&clean);
    let year: Option<i32> = year_match.and_then(|m| m.as_str().parse().ok());

    let res_match = RE_RESOLUTION.captures(&clean);
    let resolution = res_match
        .as_ref()
        .map(|caps| caps[1].to_uppercase());

    let source = RE_SOURCE
        .captures(&clean)
        .map(|caps| caps[1].to_string());

    // Group sits after the last dash of the raw stem, before cleaning.
    let group = RE_GROUP.captures(stem).map(|caps| caps[1].to_string());

    let codec = RE_CODEC
        .captures(&clean)
        .map(|caps| caps[1].replace('.', ""));

    // Title runs up to the year, else the episode marker, else the resolution.
    let title_end = if let Some(m) = &year_match {
        m.start()
    } else if let Some(m) = &se {
        m.span.start
    } else if let Some(m) = res_match.as_ref().and_then(|caps| caps.get(0)) {
        m.start()
    } else {
        clean.len()
    };
    let title = clean[..title_end]
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ");

    ParsedName {
        title,
        year,
        season,
        episode,
        episode_title,
        resolution,
        source,
        codec,
        group,
        ext: ext.to_uppercase(),
        original: filename.to_string(),
    }
}

/// First year token in a raw (uncleaned) name.
pub fn extract_year(name: &str) -> Option<i32> {
    RE_YEAR.find(name).and_then(|m| m.as_str().parse().ok())
}

/// Human-friendly rendering of a parsed name: "Title Year SxxEyy Episode 1080P.mkv".
pub fn display_name(parsed: &ParsedName) -> String {
    let mut out = parsed.title.clone();

    if let Some(year) = parsed.year {
        out.push_str(&format!(" {year}"));
    }

    if let (Some(season), Some(episode)) = (parsed.season, parsed.episode) {
        out.push_str(&format!(" S{season:02}E{episode:02}"));
        if let Some(et) = &parsed.episode_title {
            out.push_str(&format!(" {et}"));
        }
    }

    if let Some(res) = &parsed.resolution {
        out.push_str(&format!(" {res}"));
    }

    out.push('.');
    out.push_str(&parsed.ext.to_lowercase());
    out
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn full_episode_release() {
        let p = parse_filename("The.Show.S02E05.Title.Here.1080p.WEB-DL.x264-GROUP.mkv");
        assert_eq!(
            p,
            ParsedName {
                title: "The Show".into(),
                year: None,
                season: Some(2),
                episode: Some(5),
                episode_title: Some("Title Here".into()),
                resolution: Some("1080P".into()),
                source: Some("WEB-DL".into()),
                codec: Some("x264".into()),
                group: Some("GROUP".into()),
                ext: "MKV".into(),
                original: "The.Show.S02E05.Title.Here.1080p.WEB-DL.x264-GROUP.mkv".into(),
            }
        );
    }

    #[test]
    fn movie_release_with_year() {
        let p = parse_filename("Inception.2010.1080p.BluRay.x264-SPARKS.mkv");
        assert_eq!(p.title, "Inception");
        assert_eq!(p.year, Some(2010));
        assert_eq!(p.season, None);
        assert_eq!(p.episode, None);
        assert_eq!(p.resolution.as_deref(), Some("1080P"));
        assert_eq!(p.source.as_deref(), Some("BluRay"));
        assert_eq!(p.codec.as_deref(), Some("x264"));
        assert_eq!(p.group.as_deref(), Some("SPARKS"));
    }

    #[test]
    fn verbose_season_episode() {
        let p = parse_filename("Friends Season 2 Episode 14.mkv");
        assert_eq!(p.title, "Friends");
        assert_eq!(p.season, Some(2));
        assert_eq!(p.episode, Some(14));
    }

    #[test]
    fn cross_episode_marker() {
        let p = parse_filename("Seinfeld.3x12.avi");
        assert_eq!(p.title, "Seinfeld");
        assert_eq!(p.season, Some(3));
        assert_eq!(p.episode, Some(12));
        assert_eq!(p.ext, "AVI");
    }

    #[test]
    fn uppercase_cross_marker_is_not_an_episode() {
        let p = parse_filename("Seinfeld.3X12.avi");
        assert_eq!(p.season, None);
        assert_eq!(p.episode, None);
    }

    #[test]
    fn compact_marker_wins_over_cross() {
        // Both S01E02 and 1x02 present: the compact pattern is tried first.
        let p = parse_filename("Show.S01E02.1x05.mkv");
        assert_eq!(p.season, Some(1));
        assert_eq!(p.episode, Some(2));
    }

    #[test]
    fn spaced_and_dashed_compact_markers() {
        assert_eq!(parse_filename("Show S01 E02.mkv").season, Some(1));
        assert_eq!(parse_filename("Show S01-E02.mkv").episode, Some(2));
        assert_eq!(parse_filename("show s1e3.mkv").season, Some(1));
    }

    #[test]
    fn episode_title_dash_stripped() {
        let p = parse_filename("Show.S01E01.-.Pilot.720p.mkv");
        assert_eq!(p.episode_title.as_deref(), Some("Pilot"));
    }

    #[test]
    fn episode_title_runs_to_end_without_boundary() {
        let p = parse_filename("Show.S01E01.The Long Goodbye.mkv");
        assert_eq!(p.episode_title.as_deref(), Some("The Long Goodbye"));
    }

    #[test]
    fn episode_title_absent_when_marker_is_last() {
        let p = parse_filename("Show.S01E01.mkv");
        assert_eq!(p.episode_title, None);
    }

    #[test]
    fn year_beats_episode_for_title_cut() {
        let p = parse_filename("The.Expanse.2015.S01E01.720p.mkv");
        assert_eq!(p.title, "The Expanse");
        assert_eq!(p.year, Some(2015));
        assert_eq!(p.season, Some(1));
    }

    #[test]
    fn resolution_cut_when_no_year_or_episode() {
        let p = parse_filename("Some.Documentary.2160p.WEBRip.mkv");
        assert_eq!(p.title, "Some Documentary");
        assert_eq!(p.resolution.as_deref(), Some("2160P"));
        assert_eq!(p.source.as_deref(), Some("WEBRip"));
    }

    #[test]
    fn source_case_preserved_as_written() {
        let p = parse_filename("Movie.2020.webrip.mkv");
        assert_eq!(p.source.as_deref(), Some("webrip"));
    }

    #[test]
    fn codec_dots_removed() {
        let p = parse_filename("Movie 2020 HEVC.mkv");
        assert_eq!(p.codec.as_deref(), Some("HEVC"));
        let p = parse_filename("Movie 2020 x265.mkv");
        assert_eq!(p.codec.as_deref(), Some("x265"));
    }

    #[test]
    fn group_requires_trailing_dash_on_raw_stem() {
        // "WEB-DL" ends the cleaned name but the raw stem ends in "-GROUP"
        let p = parse_filename("Movie.2020.1080p.WEB-DL-GROUP.mkv");
        assert_eq!(p.group.as_deref(), Some("GROUP"));
        let p = parse_filename("Movie.2020.1080p.mkv");
        assert_eq!(p.group, None);
    }

    #[test]
    fn underscores_treated_as_separators() {
        let p = parse_filename("The_Matrix_1999_1080p.mkv");
        assert_eq!(p.title, "The Matrix");
        assert_eq!(p.year, Some(1999));
    }

    #[test]
    fn dotless_name_is_its_own_extension() {
        let p = parse_filename("README");
        assert_eq!(p.ext, "README");
        assert_eq!(p.title, "README");
        assert_eq!(p.original, "README");
    }

    #[test]
    fn trailing_dot_keeps_stem() {
        let p = parse_filename("weird.");
        assert_eq!(p.ext, "");
        assert_eq!(p.title, "weird");
    }

    #[test]
    fn specials_parse_as_season_zero() {
        let p = parse_filename("Show.S00E01.Special.mkv");
        assert_eq!(p.season, Some(0));
        assert_eq!(p.episode, Some(1));
    }

    #[test]
    fn extract_year_from_raw_name() {
        assert_eq!(extract_year("Movie.2019.mkv"), Some(2019));
        assert_eq!(extract_year("Old.Film.1955.avi"), Some(1955));
        assert_eq!(extract_year("No.Year.Here.mkv"), None);
        // 4-digit runs outside 19xx/20xx are not years
        assert_eq!(extract_year("Cutoff.2150.mkv"), None);
    }

    #[test]
    fn display_name_round_trip() {
        let p = parse_filename("The.Show.S02E05.Title.Here.1080p.WEB-DL.x264-GROUP.mkv");
        assert_eq!(display_name(&p), "The Show S02E05 Title Here 1080P.mkv");

        let p = parse_filename("Inception.2010.1080p.BluRay.x264-SPARKS.mkv");
        assert_eq!(display_name(&p), "Inception 2010 1080P.mkv");
    }

    #[test]
    fn serde_camel_case_fields() {
        let p = parse_filename("Show.S01E02.Pilot.720p.mkv");
        let json = serde_json::to_value(&p).unwrap();
        assert_eq!(json["episodeTitle"], "Pilot");
        assert_eq!(json["resolution"], "720P");
        assert!(json["year"].is_null());
    }
}
