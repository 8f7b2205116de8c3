use axum::body::Body;
use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::Response;
use std::path::PathBuf;
use tokio::io::AsyncReadExt;
use tokio::io::AsyncSeekExt;

use arkiv_catalog::ids::resolve_id;
use arkiv_catalog::subtitles::SubtitleFormat;
use arkiv_core::error::ApiError;

use crate::error::AppError;
use crate::state::AppState;

/// Parse an HTTP Range header per RFC 7233.
/// Only supports single byte ranges: `bytes=start-end` or `bytes=start-`.
pub struct ByteRange {
    pub start: u64,
    pub end_inclusive: u64,
}

pub fn parse_range_header(range_str: &str, file_size: u64) -> Result<ByteRange, ApiError> {
    let range_str = range_str.trim();
    if !range_str.starts_with("bytes=") {
        return Err(ApiError::BadRequest("only bytes ranges supported".into()));
    }

    // No byte of an empty file is addressable
    if file_size == 0 {
        return Err(ApiError::BadRequest("empty file has no satisfiable range".into()));
    }

    let spec = &range_str["bytes=".len()..];

    // Reject multi-range
    if spec.contains(',') {
        return Err(ApiError::BadRequest("multi-range not supported".into()));
    }

    let mut parts = spec.splitn(2, '-');
    let start_s = parts.next().unwrap_or("");
    let end_s = parts.next().unwrap_or("");

    if start_s.is_empty() {
        // Suffix range: bytes=-500 means last 500 bytes
        let suffix: u64 = end_s
            .parse()
            .map_err(|_| ApiError::BadRequest("bad range suffix".into()))?;
        let start = file_size.saturating_sub(suffix);
        return Ok(ByteRange {
            start,
            end_inclusive: file_size - 1,
        });
    }

    let start: u64 = start_s
        .parse()
        .map_err(|_| ApiError::BadRequest("bad range start".into()))?;

    let end: u64 = if end_s.is_empty() {
        file_size - 1
    } else {
        end_s
            .parse()
            .map_err(|_| ApiError::BadRequest("bad range end".into()))?
    };

    if start >= file_size {
        return Err(ApiError::BadRequest(format!(
            "range start {start} >= file size {file_size}"
        )));
    }

    let end = end.min(file_size - 1);

    if start > end {
        return Err(ApiError::BadRequest("range start > end".into()));
    }

    Ok(ByteRange {
        start,
        end_inclusive: end,
    })
}

/// Content-type guess from file extension.
fn content_type_for_path(path: &std::path::Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase());

    if let Some(format) = ext.as_deref().and_then(SubtitleFormat::from_extension) {
        return format.mime_type();
    }

    match ext.as_deref() {
        Some("mp4" | "m4v") => "video/mp4",
        Some("mkv") => "video/x-matroska",
        Some("webm") => "video/webm",
        Some("avi") => "video/x-msvideo",
        Some("mov") => "video/quicktime",
        Some("ts") => "video/mp2t",
        Some("flv") => "video/x-flv",
        Some("wmv") => "video/x-ms-wmv",
        Some("mp3") => "audio/mpeg",
        Some("flac") => "audio/flac",
        Some("wav") => "audio/wav",
        Some("m4a") => "audio/mp4",
        Some("ogg" | "opus") => "audio/ogg",
        Some("aac") => "audio/aac",
        Some("zip") => "application/zip",
        Some("iso") => "application/x-iso9660-image",
        _ => "application/octet-stream",
    }
}

/// Stream a file inline with HTTP Range support.
/// GET /s/{id}
pub async fn stream_file(
    State(state): State<AppState>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> Result<Response, AppError> {
    let path = resolve_file(&state, &id)?;
    serve_file(&path, &headers, None).await
}

/// Download a file as an attachment. The trailing name segment exists so
/// saved files keep their original names; the id alone decides what is sent.
/// GET /d/{id}/{name}
pub async fn download_file(
    State(state): State<AppState>,
    Path((id, name)): Path<(String, String)>,
    headers: HeaderMap,
) -> Result<Response, AppError> {
    let path = resolve_file(&state, &id)?;
    serve_file(&path, &headers, Some(&name)).await
}

fn resolve_file(state: &AppState, id: &str) -> Result<PathBuf, AppError> {
    let path = resolve_id(&state.root, id)?;
    if !path.is_file() {
        return Err(ApiError::NotFound("not a file".into()).into());
    }
    Ok(path)
}

async fn serve_file(
    path: &PathBuf,
    headers: &HeaderMap,
    attachment_name: Option<&str>,
) -> Result<Response, AppError> {
    let meta = tokio::fs::metadata(path)
        .await
        .map_err(|e| ApiError::Internal(format!("stat error: {e}")))?;
    let file_size = meta.len();
    let content_type = content_type_for_path(path);

    let disposition = attachment_name
        .map(|name| format!("attachment; filename=\"{}\"", name.replace('"', "")));

    if let Some(range_header) = headers.get("range").and_then(|v| v.to_str().ok()) {
        let range = match parse_range_header(range_header, file_size) {
            Ok(r) => r,
            Err(_) => {
                // 416 Range Not Satisfiable
                return Response::builder()
                    .status(StatusCode::RANGE_NOT_SATISFIABLE)
                    .header("Content-Range", format!("bytes */{file_size}"))
                    .body(Body::empty())
                    .map_err(|e| ApiError::Internal(format!("response build: {e}")).into());
            }
        };

        let content_length = range.end_inclusive - range.start + 1;

        let mut file = tokio::fs::File::open(path)
            .await
            .map_err(|e| ApiError::Internal(format!("file open error: {e}")))?;
        file.seek(std::io::SeekFrom::Start(range.start))
            .await
            .map_err(|e| ApiError::Internal(format!("seek error: {e}")))?;

        let stream = tokio_util::io::ReaderStream::new(file.take(content_length));

        let mut builder = Response::builder()
            .status(StatusCode::PARTIAL_CONTENT)
            .header("Content-Type", content_type)
            .header("Content-Length", content_length.to_string())
            .header(
                "Content-Range",
                format!("bytes {}-{}/{}", range.start, range.end_inclusive, file_size),
            )
            .header("Accept-Ranges", "bytes");
        if let Some(d) = &disposition {
            builder = builder.header("Content-Disposition", d);
        }
        builder
            .body(Body::from_stream(stream))
            .map_err(|e| ApiError::Internal(format!("response build: {e}")).into())
    } else {
        let file = tokio::fs::File::open(path)
            .await
            .map_err(|e| ApiError::Internal(format!("file open error: {e}")))?;

        let stream = tokio_util::io::ReaderStream::new(file);

        let mut builder = Response::builder()
            .status(StatusCode::OK)
            .header("Content-Type", content_type)
            .header("Content-Length", file_size.to_string())
            .header("Accept-Ranges", "bytes");
        if let Some(d) = &disposition {
            builder = builder.header("Content-Disposition", d);
        }
        builder
            .body(Body::from_stream(stream))
            .map_err(|e| ApiError::Internal(format!("response build: {e}")).into())
    }
}

// ─── Unit tests ──────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_range_basic() {
        let r = parse_range_header("bytes=0-999", 5000).unwrap();
        assert_eq!(r.start, 0);
        assert_eq!(r.end_inclusive, 999);
    }

    #[test]
    fn parse_range_open_end() {
        let r = parse_range_header("bytes=1000-", 5000).unwrap();
        assert_eq!(r.start, 1000);
        assert_eq!(r.end_inclusive, 4999);
    }

    #[test]
    fn parse_range_suffix() {
        let r = parse_range_header("bytes=-500", 5000).unwrap();
        assert_eq!(r.start, 4500);
        assert_eq!(r.end_inclusive, 4999);
    }

    #[test]
    fn parse_range_clamps_end() {
        let r = parse_range_header("bytes=0-99999", 5000).unwrap();
        assert_eq!(r.start, 0);
        assert_eq!(r.end_inclusive, 4999);
    }

    #[test]
    fn parse_range_start_beyond_size() {
        let r = parse_range_header("bytes=5000-", 5000);
        assert!(r.is_err());
    }

    #[test]
    fn parse_range_on_empty_file_is_unsatisfiable() {
        assert!(parse_range_header("bytes=-500", 0).is_err());
        assert!(parse_range_header("bytes=0-", 0).is_err());
        assert!(parse_range_header("bytes=0-0", 0).is_err());
    }

    #[test]
    fn parse_range_multi_rejected() {
        let r = parse_range_header("bytes=0-100, 200-300", 5000);
        assert!(r.is_err());
    }

    #[test]
    fn content_type_detection() {
        assert_eq!(
            content_type_for_path(std::path::Path::new("movie.mp4")),
            "video/mp4"
        );
        assert_eq!(
            content_type_for_path(std::path::Path::new("video.mkv")),
            "video/x-matroska"
        );
        assert_eq!(
            content_type_for_path(std::path::Path::new("album.flac")),
            "audio/flac"
        );
        assert_eq!(
            content_type_for_path(std::path::Path::new("subs.srt")),
            "application/x-subrip"
        );
        assert_eq!(
            content_type_for_path(std::path::Path::new("data.bin")),
            "application/octet-stream"
        );
    }
}
