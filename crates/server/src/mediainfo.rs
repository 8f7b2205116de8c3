use std::path::Path;

use serde::Serialize;
use serde_json::Value;
use tokio::process::Command;

use arkiv_core::error::ApiError;

/// One track of the media report: a type label plus flat key/value pairs.
/// Properties keep ffprobe's order, so they are stored as pairs and
/// serialized as a JSON object.
#[derive(Debug, Clone, Serialize)]
pub struct Track {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(serialize_with = "pairs_as_map")]
    pub properties: Vec<(String, String)>,
}

fn pairs_as_map<S>(pairs: &[(String, String)], serializer: S) -> Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    use serde::ser::SerializeMap;
    let mut map = serializer.serialize_map(Some(pairs.len()))?;
    for (k, v) in pairs {
        map.serialize_entry(k, v)?;
    }
    map.end()
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MediaReport {
    pub filename: String,
    pub filesize: u64,
    pub tracks: Vec<Track>,
}

/// Run ffprobe against a file and return its JSON output.
pub async fn probe(ffprobe: &Path, file: &Path) -> Result<Value, ApiError> {
    let output = Command::new(ffprobe)
        .args(["-v", "quiet", "-print_format", "json", "-show_format", "-show_streams"])
        .arg(file)
        .output()
        .await
        .map_err(|e| ApiError::Internal(format!("failed to spawn ffprobe: {e}")))?;

    if !output.status.success() {
        return Err(ApiError::Upstream(format!(
            "ffprobe exited with {}",
            output.status
        )));
    }

    serde_json::from_slice(&output.stdout)
        .map_err(|e| ApiError::Upstream(format!("ffprobe produced invalid json: {e}")))
}

/// Convert raw ffprobe output into the track-oriented report shape.
pub fn build_report(filename: &str, filesize: u64, probed: &Value) -> MediaReport {
    let mut tracks = Vec::new();

    if let Some(format) = probed.get("format").filter(|f| f.is_object()) {
        tracks.push(Track {
            kind: "General".to_string(),
            properties: object_properties(format),
        });
    }

    if let Some(streams) = probed.get("streams").and_then(Value::as_array) {
        for stream in streams {
            let kind = match stream.get("codec_type").and_then(Value::as_str) {
                Some("video") => "Video",
                Some("audio") => "Audio",
                Some("subtitle") => "Text",
                _ => continue,
            };
            tracks.push(Track {
                kind: kind.to_string(),
                properties: object_properties(stream),
            });
        }
    }

    MediaReport {
        filename: filename.to_string(),
        filesize,
        tracks,
    }
}

/// Flatten one ffprobe object into display pairs. Scalars are kept as-is,
/// `tags` entries are inlined, `disposition` flags surface only when set.
fn object_properties(obj: &Value) -> Vec<(String, String)> {
    let mut props = Vec::new();
    let Some(map) = obj.as_object() else {
        return props;
    };

    for (key, value) in map {
        match key.as_str() {
            "index" | "codec_type" => continue,
            "tags" => {
                if let Some(tags) = value.as_object() {
                    for (tag, tag_value) in tags {
                        if let Some(s) = scalar_string(tag_value) {
                            props.push((humanize_key(tag), s));
                        }
                    }
                }
            }
            "disposition" => {
                if let Some(flags) = value.as_object() {
                    for flag in ["default", "forced"] {
                        if flags.get(flag).and_then(Value::as_i64) == Some(1) {
                            props.push((humanize_key(flag), "Yes".to_string()));
                        }
                    }
                }
            }
            "r_frame_rate" | "avg_frame_rate" => {
                if let Some(rate) = value.as_str().and_then(parse_fraction) {
                    if rate > 0.0 {
                        props.push((humanize_key(key), format!("{rate:.3} fps")));
                    }
                }
            }
            _ => {
                if let Some(s) = scalar_string(value) {
                    props.push((humanize_key(key), s));
                }
            }
        }
    }

    props
}

fn scalar_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// "sample_rate" -> "Sample rate", "codecName" -> "Codec name".
fn humanize_key(key: &str) -> String {
    let spaced = key.replace('_', " ");
    let mut out = String::with_capacity(spaced.len() + 4);
    let mut prev_lower = false;
    for c in spaced.chars() {
        if prev_lower && c.is_ascii_uppercase() {
            out.push(' ');
            out.push(c.to_ascii_lowercase());
        } else {
            out.push(c);
        }
        prev_lower = c.is_ascii_lowercase();
    }
    let mut chars = out.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => out,
    }
}

/// "24000/1001" -> 23.976...
fn parse_fraction(s: &str) -> Option<f64> {
    let mut parts = s.splitn(2, '/');
    let num: f64 = parts.next()?.parse().ok()?;
    match parts.next() {
        Some(den) => {
            let den: f64 = den.parse().ok()?;
            if den == 0.0 { None } else { Some(num / den) }
        }
        None => Some(num),
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
