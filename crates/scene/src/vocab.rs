//! The fixed release-name vocabularies. Every list lives here once; the
//! parser and the ranking code share these statics.

use regex::Regex;
use std::sync::LazyLock;

// Compact episode marker: S01E02, s1 e3, S01-E02
pub static RE_SE_COMPACT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\bS(\d{1,2})\s*-?\s*E(\d{1,2})\b").unwrap());

// Verbose episode marker: "Season 1 Episode 2"
pub static RE_SE_VERBOSE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\bSeason\s*(\d{1,2})\s*Episode\s*(\d{1,2})\b").unwrap());

// Cross episode marker: 1x02. Lowercase x only.
pub static RE_SE_CROSS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b(\d{1,2})x(\d{1,2})\b").unwrap());

// Release year: 1900-2099
pub static RE_YEAR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b(19\d{2}|20\d{2})\b").unwrap());

pub static RE_RESOLUTION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\b(2160p|1080p|720p|480p|4K|UHD)\b").unwrap());

pub static RE_SOURCE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(WEB-?DL|WEBRip|BluRay|BRRip|HDRip|DVDRip|HDTV|CAM|TS|HC|Remux)\b")
        .unwrap()
});

pub static RE_CODEC: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(H\.?265|H\.?264|HEVC|x265|x264|AV1|VP9|XviD)\b").unwrap()
});

// Release group: trailing -NAME on the extension-stripped stem.
pub static RE_GROUP: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"-([A-Za-z0-9]+)$").unwrap());

// Keywords that terminate an episode title. Open-ended on the right so that
// markers glued to other tokens still cut the title.
pub static RE_EPISODE_BOUNDARY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)\b(2160p|1080p|720p|480p|4K|UHD|HD|WEB|HDTV|BluRay|BRRip|DVDRip|AMZN|NF|DSNP|ATV|HMAX|ATVP)",
    )
    .unwrap()
});

/// Rank an (already uppercased) resolution token for quality ordering.
/// Unknown or missing resolutions rank lowest.
pub fn quality_rank(resolution: Option<&str>) -> u8 {
    match resolution {
        Some("2160P" | "4K" | "UHD") => 4,
        Some("1080P") => 3,
        Some("720P") => 2,
        Some("480P") => 1,
        _ => 0,
    }
}
