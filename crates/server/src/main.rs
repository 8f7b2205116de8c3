use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use arkiv_metadata::tmdb::TmdbClient;
use arkiv_server::routes::build_router;
use arkiv_server::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let root = std::env::var("ARKIV_ROOT").unwrap_or_else(|_| ".".into());
    let root = PathBuf::from(&root)
        .canonicalize()
        .with_context(|| format!("archive root {root:?} does not exist"))?;

    let ffprobe = PathBuf::from(std::env::var("ARKIV_FFPROBE").unwrap_or_else(|_| "ffprobe".into()));

    let tmdb = match std::env::var("ARKIV_TMDB_KEY") {
        Ok(key) if !key.is_empty() => Some(Arc::new(TmdbClient::new(key))),
        _ => {
            warn!("ARKIV_TMDB_KEY not set; metadata endpoints will return 503");
            None
        }
    };

    let public_url = std::env::var("ARKIV_PUBLIC_URL").unwrap_or_default();
    let public_url = public_url.trim_end_matches('/').to_string();

    let bind = std::env::var("ARKIV_BIND").unwrap_or_else(|_| "0.0.0.0:8080".into());

    let state = AppState::new(root.clone(), ffprobe, tmdb, public_url);
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(&bind)
        .await
        .with_context(|| format!("cannot bind {bind}"))?;
    info!(addr = %bind, root = %root.display(), "serving archive");

    axum::serve(listener, app).await.context("server error")?;
    Ok(())
}
