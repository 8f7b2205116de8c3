//! Sidecar subtitle discovery, grouped by language for the subtitle picker.
//!
//! Naming conventions on the tail of the media stem:
//! - `Movie.en.srt`          → language "en"
//! - `Movie.en.forced.srt`   → language "en", forced
//! - `Movie.srt`             → unknown language
//! - `Movie.en.hi.srt`       → language "en", SDH

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::ids::encode_id;

/// A discovered sidecar subtitle file.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubtitleFile {
    /// Streamable id of the subtitle file itself.
    pub id: String,
    pub name: String,
    pub format: SubtitleFormat,
    pub language: Option<String>,
    pub language_name: String,
    pub forced: bool,
    pub sdh: bool,
    pub label: String,
}

/// Subtitles for one language.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubtitleGroup {
    pub language: Option<String>,
    pub language_name: String,
    pub subtitles: Vec<SubtitleFile>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SubtitleFormat {
    Srt,
    Sub,
    Ass,
    Ssa,
    Vtt,
    Sup,
    Idx,
}

impl SubtitleFormat {
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "srt" => Some(Self::Srt),
            "sub" => Some(Self::Sub),
            "ass" => Some(Self::Ass),
            "ssa" => Some(Self::Ssa),
            "vtt" => Some(Self::Vtt),
            "sup" => Some(Self::Sup),
            "idx" => Some(Self::Idx),
            _ => None,
        }
    }

    pub fn mime_type(&self) -> &'static str {
        match self {
            Self::Srt => "application/x-subrip",
            Self::Sub => "text/plain",
            Self::Ass | Self::Ssa => "text/x-ssa",
            Self::Vtt => "text/vtt",
            Self::Sup => "application/octet-stream",
            Self::Idx => "text/plain",
        }
    }
}

/// ISO 639-1 code to display name.
const LANG_NAMES: &[(&str, &str)] = &[
    ("en", "English"), ("hi", "Hindi"), ("es", "Spanish"), ("fr", "French"),
    ("de", "German"), ("it", "Italian"), ("pt", "Portuguese"), ("ru", "Russian"),
    ("ja", "Japanese"), ("ko", "Korean"), ("zh", "Chinese"), ("ar", "Arabic"),
    ("tr", "Turkish"), ("pl", "Polish"), ("nl", "Dutch"), ("sv", "Swedish"),
    ("da", "Danish"), ("no", "Norwegian"), ("fi", "Finnish"), ("el", "Greek"),
    ("cs", "Czech"), ("ro", "Romanian"), ("hu", "Hungarian"), ("th", "Thai"),
    ("id", "Indonesian"), ("ms", "Malay"), ("vi", "Vietnamese"), ("uk", "Ukrainian"),
    ("bg", "Bulgarian"), ("hr", "Croatian"), ("sr", "Serbian"), ("sk", "Slovak"),
    ("sl", "Slovenian"), ("lt", "Lithuanian"), ("lv", "Latvian"), ("et", "Estonian"),
    ("he", "Hebrew"), ("fa", "Persian"), ("bn", "Bengali"), ("ta", "Tamil"),
    ("te", "Telugu"), ("ml", "Malayalam"), ("kn", "Kannada"), ("mr", "Marathi"),
    ("gu", "Gujarati"), ("pa", "Punjabi"), ("ur", "Urdu"), ("ne", "Nepali"),
    ("si", "Sinhala"), ("my", "Burmese"), ("km", "Khmer"), ("lo", "Lao"),
    ("ka", "Georgian"), ("am", "Amharic"), ("sw", "Swahili"), ("af", "Afrikaans"),
    ("sq", "Albanian"), ("eu", "Basque"), ("ca", "Catalan"), ("gl", "Galician"),
    ("is", "Icelandic"), ("mk", "Macedonian"), ("mt", "Maltese"), ("cy", "Welsh"),
    ("ga", "Irish"), ("la", "Latin"), ("und", "Undefined"),
];

/// Display name for a language code; unknown codes pass through verbatim.
pub fn language_name(code: &str) -> String {
    let lower = code.trim().to_ascii_lowercase();
    LANG_NAMES
        .iter()
        .find(|(c, _)| *c == lower)
        .map(|(_, n)| (*n).to_string())
        .unwrap_or_else(|| code.to_string())
}

fn is_lang_code(s: &str) -> bool {
    let lower = s.to_ascii_lowercase();
    LANG_NAMES.iter().any(|(c, _)| *c == lower) || lower.len() == 3
}

/// Parse language / forced / SDH markers from the segments between the media
/// stem and the subtitle extension.
fn parse_markers(media_stem: &str, sub_stem: &str) -> (Option<String>, bool, bool) {
    let extra = if sub_stem.len() > media_stem.len() {
        &sub_stem[media_stem.len()..]
    } else {
        return (None, false, false);
    };

    let mut language = None;
    let mut forced = false;
    let mut sdh = false;

    for part in extra.split('.').filter(|s| !s.is_empty()) {
        let lower = part.to_ascii_lowercase();
        if lower == "forced" {
            forced = true;
        } else if lower == "sdh" || lower == "hi" || lower == "cc" {
            sdh = true;
        } else if is_lang_code(part) && language.is_none() {
            language = Some(lower);
        }
    }

    (language, forced, sdh)
}

fn build_label(language_name: &str, forced: bool, sdh: bool) -> String {
    let mut parts = vec![language_name.to_string()];
    if forced {
        parts.push("Forced".into());
    }
    if sdh {
        parts.push("SDH".into());
    }
    parts.join(" ")
}

/// Discover sidecar subtitles for a media file and group them by language.
/// `media_path` must already be resolved under `root`; ids are encoded
/// relative to `root` so the files can be served by the download route.
pub fn find_subtitles(root: &Path, media_path: &Path) -> Vec<SubtitleGroup> {
    let parent = match media_path.parent() {
        Some(p) => p,
        None => return Vec::new(),
    };
    let media_stem = match media_path.file_stem().and_then(|s| s.to_str()) {
        Some(s) => s.to_string(),
        None => return Vec::new(),
    };

    let entries = match std::fs::read_dir(parent) {
        Ok(e) => e,
        Err(_) => return Vec::new(),
    };

    let mut found: Vec<SubtitleFile> = Vec::new();
    for entry in entries.flatten() {
        let path = entry.path();
        if !path.is_file() {
            continue;
        }

        let format = match path
            .extension()
            .and_then(|e| e.to_str())
            .and_then(SubtitleFormat::from_extension)
        {
            Some(f) => f,
            None => continue,
        };

        let sub_stem = match path.file_stem().and_then(|s| s.to_str()) {
            Some(s) => s.to_string(),
            None => continue,
        };
        if !sub_stem.starts_with(&media_stem) {
            continue;
        }

        let (language, forced, sdh) = parse_markers(&media_stem, &sub_stem);
        let lang_name = language
            .as_deref()
            .map_or_else(|| "Unknown".to_string(), language_name);

        let relative = path.strip_prefix(root).unwrap_or(&path);
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();

        found.push(SubtitleFile {
            id: encode_id(relative),
            name,
            format,
            label: build_label(&lang_name, forced, sdh),
            language,
            language_name: lang_name,
            forced,
            sdh,
        });
    }

    found.sort_by(|a, b| a.name.cmp(&b.name));

    // Group by language, preserving first-seen order
    let mut groups: Vec<SubtitleGroup> = Vec::new();
    for sub in found {
        match groups.iter_mut().find(|g| g.language == sub.language) {
            Some(g) => g.subtitles.push(sub),
            None => groups.push(SubtitleGroup {
                language: sub.language.clone(),
                language_name: sub.language_name.clone(),
                subtitles: vec![sub],
            }),
        }
    }
    groups
}

// ─── Tests ───────────────────────────────────────────────────────────────────
