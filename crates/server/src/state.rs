use std::path::PathBuf;
use std::sync::Arc;

use arkiv_metadata::cache::ResponseCache;
use arkiv_metadata::tmdb::TmdbClient;
use arkiv_metadata::{TitleCard, watch::WatchInfo};

/// Shared application state passed to all handlers.
#[derive(Clone)]
pub struct AppState {
    /// Canonicalized archive root; everything served lives under it.
    pub root: PathBuf,
    /// ffprobe binary for the media-info endpoint.
    pub ffprobe: PathBuf,
    /// Absent when no TMDB key is configured; metadata endpoints then 503.
    pub tmdb: Option<Arc<TmdbClient>>,
    /// Base URL prefixed to stream links handed to external players.
    pub public_url: String,
    pub movie_cache: Arc<ResponseCache<TitleCard>>,
    pub watch_cache: Arc<ResponseCache<WatchInfo>>,
}

impl AppState {
    pub fn new(root: PathBuf, ffprobe: PathBuf, tmdb: Option<Arc<TmdbClient>>, public_url: String) -> Self {
        Self {
            root,
            ffprobe,
            tmdb,
            public_url,
            movie_cache: Arc::new(ResponseCache::new()),
            watch_cache: Arc::new(ResponseCache::new()),
        }
    }

    /// Stream URL for a file id, absolute when a public URL is configured.
    pub fn stream_url(&self, id: &str) -> String {
        format!("{}/s/{id}", self.public_url)
    }
}
