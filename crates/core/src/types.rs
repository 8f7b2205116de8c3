use serde::{Deserialize, Serialize};

/// A single entry in the archive: a file or a folder, as it appears on the
/// wire and as input to the filename-intelligence functions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArchiveFile {
    /// Stable opaque id (hex-encoded root-relative path).
    #[serde(default)]
    pub id: String,
    pub name: String,
    pub size: u64,
    /// Modification time, unix seconds.
    pub time: i64,
    #[serde(default)]
    pub is_folder: bool,
}

/// Broad file category derived from the extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FileType {
    Folder,
    Video,
    Audio,
    Archive,
    Other,
}

pub const VIDEO_EXTENSIONS: &[&str] = &[
    "mp4", "mkv", "avi", "mov", "webm", "flv", "wmv", "m4v", "ts",
];

pub const AUDIO_EXTENSIONS: &[&str] = &[
    "mp3", "flac", "wav", "m4a", "ogg", "aac", "wma", "opus",
];

pub const ARCHIVE_EXTENSIONS: &[&str] = &["zip", "rar", "7z", "tar", "gz", "bz2", "iso"];

impl FileType {
    /// Categorize by the extension after the final dot.
    pub fn from_name(name: &str) -> Self {
        let ext = match name.rsplit('.').next() {
            Some(e) => e.to_lowercase(),
            None => return Self::Other,
        };
        if VIDEO_EXTENSIONS.contains(&ext.as_str()) {
            Self::Video
        } else if AUDIO_EXTENSIONS.contains(&ext.as_str()) {
            Self::Audio
        } else if ARCHIVE_EXTENSIONS.contains(&ext.as_str()) {
            Self::Archive
        } else {
            Self::Other
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Folder => "folder",
            Self::Video => "video",
            Self::Audio => "audio",
            Self::Archive => "archive",
            Self::Other => "other",
        }
    }
}

impl std::fmt::Display for FileType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Check a name against the video extension vocabulary.
pub fn is_video_name(name: &str) -> bool {
    FileType::from_name(name) == FileType::Video
}
