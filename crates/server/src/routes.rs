use axum::extract::{Query, State};
use axum::routing::get;
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::json;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

use arkiv_catalog::ids::resolve_id;
use arkiv_catalog::list::{archive_files, list_dir};
use arkiv_catalog::query::{self, ListQuery, Page};
use arkiv_catalog::subtitles::{SubtitleGroup, find_subtitles};
use arkiv_core::error::ApiError;
use arkiv_metadata::watch::{WatchInfo, parse_watch_info};
use arkiv_metadata::{TitleCard, tmdb::TmdbClient};
use arkiv_scene::{find_related_files, parse_filename, similar_titles, RelatedFiles};

use crate::error::AppError;
use crate::mediainfo::{self, MediaReport};
use crate::playlinks::{PlayLinks, play_links};
use crate::state::AppState;
use crate::streaming;

pub fn build_router(state: AppState) -> Router {
    let api = Router::new()
        .route("/files", get(list_files))
        .route("/related", get(related_files))
        .route("/similar", get(similar_files))
        .route("/movie", get(movie_info))
        .route("/watch", get(watch_info))
        .route("/subtitles", get(list_subtitles))
        .route("/mediainfo", get(media_info))
        .route("/info", get(file_info))
        .route("/play-links", get(play_links_for));

    Router::new()
        .route("/health", get(health))
        .nest("/api", api)
        .route("/s/{id}", get(streaming::stream_file))
        .route("/d/{id}/{name}", get(streaming::download_file))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

async fn health() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

// ─── Listing ─────────────────────────────────────────────────────────────────

async fn list_files(
    State(state): State<AppState>,
    Query(q): Query<ListQuery>,
) -> Result<Json<Page>, AppError> {
    let entries = list_dir(&state.root, q.folder.as_deref())?;
    Ok(Json(query::apply(entries, &q)))
}

/// Parameters shared by the relation endpoints: a filename plus the folder
/// it lives in (the archive root when absent).
#[derive(Debug, Deserialize)]
struct NameQuery {
    filename: String,
    folder: Option<String>,
}

async fn related_files(
    State(state): State<AppState>,
    Query(q): Query<NameQuery>,
) -> Result<Json<RelatedFiles>, AppError> {
    let entries = list_dir(&state.root, q.folder.as_deref())?;
    let files = archive_files(&entries);
    Ok(Json(find_related_files(&q.filename, &files)))
}

#[derive(Debug, Deserialize)]
struct SimilarQuery {
    filename: String,
    #[serde(default = "default_similar_count")]
    count: usize,
    folder: Option<String>,
}

fn default_similar_count() -> usize {
    6
}

async fn similar_files(
    State(state): State<AppState>,
    Query(q): Query<SimilarQuery>,
) -> Result<Json<Vec<arkiv_scene::RelatedEntry>>, AppError> {
    let entries = list_dir(&state.root, q.folder.as_deref())?;
    let files = archive_files(&entries);
    let parsed = parse_filename(&q.filename);
    let picks = similar_titles(&parsed, &files, q.count, &mut rand::thread_rng());
    Ok(Json(picks))
}

// ─── Metadata ────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
struct FilenameQuery {
    filename: String,
}

fn tmdb_client(state: &AppState) -> Result<&TmdbClient, AppError> {
    state
        .tmdb
        .as_deref()
        .ok_or_else(|| ApiError::Unavailable("no TMDB API key configured".into()).into())
}

async fn title_card(state: &AppState, filename: &str) -> Result<TitleCard, AppError> {
    if let Some(card) = state.movie_cache.get(filename) {
        return Ok(card);
    }
    let tmdb = tmdb_client(state)?;
    let parsed = parse_filename(filename);
    let card = tmdb.lookup(&parsed).await?;
    state.movie_cache.put(filename, card.clone());
    Ok(card)
}

async fn movie_info(
    State(state): State<AppState>,
    Query(q): Query<FilenameQuery>,
) -> Result<Json<TitleCard>, AppError> {
    let card = title_card(&state, &q.filename).await?;
    Ok(Json(card))
}

async fn watch_info(
    State(state): State<AppState>,
    Query(q): Query<FilenameQuery>,
) -> Result<Json<WatchInfo>, AppError> {
    if let Some(info) = state.watch_cache.get(&q.filename) {
        return Ok(Json(info));
    }
    let card = title_card(&state, &q.filename).await?;
    let data = tmdb_client(&state)?.watch_providers(&card).await?;
    let info = parse_watch_info(&card, &data);
    state.watch_cache.put(&q.filename, info.clone());
    Ok(Json(info))
}

// ─── Per-file endpoints ──────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
struct IdQuery {
    id: String,
}

async fn list_subtitles(
    State(state): State<AppState>,
    Query(q): Query<IdQuery>,
) -> Result<Json<Vec<SubtitleGroup>>, AppError> {
    let path = resolve_id(&state.root, &q.id)?;
    if !path.is_file() {
        return Err(ApiError::NotFound("no such file".into()).into());
    }
    Ok(Json(find_subtitles(&state.root, &path)))
}

async fn media_info(
    State(state): State<AppState>,
    Query(q): Query<IdQuery>,
) -> Result<Json<MediaReport>, AppError> {
    let path = resolve_id(&state.root, &q.id)?;
    if !path.is_file() {
        return Err(ApiError::NotFound("no such file".into()).into());
    }
    let filename = file_name_of(&path);
    let filesize = std::fs::metadata(&path)
        .map_err(|e| ApiError::Internal(format!("stat error: {e}")))?
        .len();

    info!(file = %filename, "probing media");
    let probed = mediainfo::probe(&state.ffprobe, &path).await?;
    Ok(Json(mediainfo::build_report(&filename, filesize, &probed)))
}

async fn file_info(
    State(state): State<AppState>,
    Query(q): Query<IdQuery>,
) -> Result<Json<serde_json::Value>, AppError> {
    let path = resolve_id(&state.root, &q.id)?;
    if !path.is_file() {
        return Err(ApiError::NotFound("no such file".into()).into());
    }
    let filesize = std::fs::metadata(&path)
        .map_err(|e| ApiError::Internal(format!("stat error: {e}")))?
        .len();

    Ok(Json(json!({
        "id": q.id,
        "filename": file_name_of(&path),
        "filesize": filesize,
        "streamUrl": state.stream_url(&q.id),
    })))
}

async fn play_links_for(
    State(state): State<AppState>,
    Query(q): Query<IdQuery>,
) -> Result<Json<PlayLinks>, AppError> {
    let path = resolve_id(&state.root, &q.id)?;
    if !path.is_file() {
        return Err(ApiError::NotFound("no such file".into()).into());
    }
    let name = file_name_of(&path);
    Ok(Json(play_links(&state.stream_url(&q.id), &name)))
}

fn file_name_of(path: &std::path::Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}
