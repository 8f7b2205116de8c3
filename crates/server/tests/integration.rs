use axum_test::TestServer;
use serde_json::Value;

use arkiv_server::routes::build_router;
use arkiv_server::state::AppState;

/// Archive fixture on disk plus a server rooted at it. The TempDir must
/// outlive the server, so both are returned together.
fn test_app() -> (tempfile::TempDir, TestServer) {
    let tmp = tempfile::tempdir().unwrap();
    let root = tmp.path();

    let video = b"fake video data".as_slice();
    std::fs::write(
        root.join("The.Show.S02E05.Title.Here.1080p.WEB-DL.x264-GRP.mkv"),
        video,
    )
    .unwrap();
    std::fs::write(
        root.join("The.Show.S02E05.Title.Here.720p.WEB-DL.x264-GRP.mkv"),
        video,
    )
    .unwrap();
    std::fs::write(
        root.join("The.Show.S02E06.Next.One.1080p.WEB-DL.x264-GRP.mkv"),
        video,
    )
    .unwrap();
    std::fs::write(root.join("Inception.2010.1080p.BluRay.x264-GRP.mkv"), video).unwrap();
    std::fs::write(
        root.join("Inception.2010.1080p.BluRay.x264-GRP.en.srt"),
        b"1\n00:00:00,000 --> 00:00:01,000\nhi\n",
    )
    .unwrap();
    std::fs::write(root.join("notes.txt"), b"text").unwrap();
    std::fs::create_dir(root.join("Extras")).unwrap();
    std::fs::write(root.join("Extras").join("bonus.mkv"), video).unwrap();

    let state = AppState::new(
        root.canonicalize().unwrap(),
        "ffprobe".into(),
        None,
        String::new(),
    );
    let server = TestServer::new(build_router(state)).unwrap();
    (tmp, server)
}

/// Find a listing entry by name and return its id.
async fn id_of(server: &TestServer, name: &str) -> String {
    let resp = server.get("/api/files").await;
    resp.assert_status_ok();
    let body: Value = resp.json();
    body["files"]
        .as_array()
        .unwrap()
        .iter()
        .find(|f| f["name"] == name)
        .unwrap_or_else(|| panic!("no entry named {name}"))["id"]
        .as_str()
        .unwrap()
        .to_string()
}

#[tokio::test]
async fn health_endpoint_returns_ok() {
    let (_tmp, server) = test_app();
    let resp = server.get("/health").await;
    resp.assert_status_ok();
    let body: Value = resp.json();
    assert_eq!(body["status"], "ok");
}

// ---------------------------------------------------------------------------
// Listing tests
// ---------------------------------------------------------------------------

#[tokio::test]
async fn listing_puts_folders_first() {
    let (_tmp, server) = test_app();
    let resp = server.get("/api/files").await;
    resp.assert_status_ok();
    let body: Value = resp.json();

    let files = body["files"].as_array().unwrap();
    assert_eq!(body["total"], 7);
    assert_eq!(body["page"], 1);
    assert_eq!(body["totalPages"], 1);
    assert_eq!(files[0]["name"], "Extras");
    assert_eq!(files[0]["isFolder"], true);
    assert_eq!(files[0]["fileType"], "folder");
}

#[tokio::test]
async fn listing_entries_carry_parsed_fields() {
    let (_tmp, server) = test_app();
    let resp = server.get("/api/files?sort=name&filter=video").await;
    resp.assert_status_ok();
    let body: Value = resp.json();

    let files = body["files"].as_array().unwrap();
    assert_eq!(body["total"], 4);

    let inception = files
        .iter()
        .find(|f| f["name"].as_str().unwrap().starts_with("Inception"))
        .unwrap();
    assert_eq!(inception["parsed"]["title"], "Inception");
    assert_eq!(inception["parsed"]["year"], 2010);
    assert_eq!(inception["parsed"]["resolution"], "1080P");
    assert_eq!(inception["year"], 2010);
    assert_eq!(inception["displayName"], "Inception 2010 1080P.mkv");
}

#[tokio::test]
async fn listing_search_understands_episode_markers() {
    let (_tmp, server) = test_app();
    let resp = server.get("/api/files?search=show%20s2").await;
    resp.assert_status_ok();
    let body: Value = resp.json();
    assert_eq!(body["total"], 3);
    for f in body["files"].as_array().unwrap() {
        assert!(f["name"].as_str().unwrap().starts_with("The.Show"));
    }
}

#[tokio::test]
async fn listing_filters_by_year() {
    let (_tmp, server) = test_app();
    let resp = server.get("/api/files?year=2010").await;
    resp.assert_status_ok();
    let body: Value = resp.json();
    let names: Vec<&str> = body["files"]
        .as_array()
        .unwrap()
        .iter()
        .map(|f| f["name"].as_str().unwrap())
        .collect();
    assert!(names.iter().all(|n| n.contains("2010")));
    assert_eq!(body["total"], 2);
}

#[tokio::test]
async fn listing_descends_into_folders() {
    let (_tmp, server) = test_app();
    let folder_id = id_of(&server, "Extras").await;
    let resp = server
        .get(&format!("/api/files?folder={folder_id}"))
        .await;
    resp.assert_status_ok();
    let body: Value = resp.json();
    assert_eq!(body["total"], 1);
    assert_eq!(body["files"][0]["name"], "bonus.mkv");
}

// ---------------------------------------------------------------------------
// Relation tests
// ---------------------------------------------------------------------------

#[tokio::test]
async fn related_splits_resolutions_and_episodes() {
    let (_tmp, server) = test_app();
    let resp = server
        .get("/api/related?filename=The.Show.S02E05.Title.Here.1080p.WEB-DL.x264-GRP.mkv")
        .await;
    resp.assert_status_ok();
    let body: Value = resp.json();

    let res = body["otherResolutions"].as_array().unwrap();
    assert_eq!(res.len(), 1);
    assert_eq!(res[0]["parsed"]["resolution"], "720P");

    let eps = body["otherEpisodes"].as_array().unwrap();
    assert_eq!(eps.len(), 1);
    assert_eq!(eps[0]["parsed"]["episode"], 6);

    assert_eq!(body["current"]["season"], 2);
}

#[tokio::test]
async fn similar_picks_one_file_per_series() {
    let (_tmp, server) = test_app();
    let resp = server
        .get("/api/similar?filename=Inception.2010.1080p.BluRay.x264-GRP.mkv")
        .await;
    resp.assert_status_ok();
    let body: Value = resp.json();

    let picks = body.as_array().unwrap();
    assert_eq!(picks.len(), 1);
    assert_eq!(picks[0]["parsed"]["title"], "The Show");
}

// ---------------------------------------------------------------------------
// Per-file endpoints
// ---------------------------------------------------------------------------

#[tokio::test]
async fn info_returns_stream_url() {
    let (_tmp, server) = test_app();
    let id = id_of(&server, "Inception.2010.1080p.BluRay.x264-GRP.mkv").await;
    let resp = server.get(&format!("/api/info?id={id}")).await;
    resp.assert_status_ok();
    let body: Value = resp.json();
    assert_eq!(body["filename"], "Inception.2010.1080p.BluRay.x264-GRP.mkv");
    assert_eq!(body["filesize"], 15);
    assert_eq!(body["streamUrl"], format!("/s/{id}"));
}

#[tokio::test]
async fn play_links_cover_all_players() {
    let (_tmp, server) = test_app();
    let id = id_of(&server, "Inception.2010.1080p.BluRay.x264-GRP.mkv").await;
    let resp = server.get(&format!("/api/play-links?id={id}")).await;
    resp.assert_status_ok();
    let body: Value = resp.json();
    assert_eq!(body["vlc"], format!("vlc:///s/{id}"));
    assert!(body["iina"].as_str().unwrap().starts_with("iina://weblink?url="));
    assert!(body["mx"].as_str().unwrap().contains("com.mxtech.videoplayer.ad"));
}

#[tokio::test]
async fn subtitles_found_and_grouped() {
    let (_tmp, server) = test_app();
    let id = id_of(&server, "Inception.2010.1080p.BluRay.x264-GRP.mkv").await;
    let resp = server.get(&format!("/api/subtitles?id={id}")).await;
    resp.assert_status_ok();
    let body: Value = resp.json();

    let groups = body.as_array().unwrap();
    assert_eq!(groups.len(), 1);
    assert_eq!(groups[0]["language"], "en");
    assert_eq!(groups[0]["languageName"], "English");
    let subs = groups[0]["subtitles"].as_array().unwrap();
    assert_eq!(subs.len(), 1);
    assert_eq!(subs[0]["format"], "srt");
}

// ---------------------------------------------------------------------------
// Streaming tests
// ---------------------------------------------------------------------------

#[tokio::test]
async fn stream_with_range_returns_206() {
    let (_tmp, server) = test_app();
    let id = id_of(&server, "Inception.2010.1080p.BluRay.x264-GRP.mkv").await;

    let resp = server
        .get(&format!("/s/{id}"))
        .add_header(
            axum::http::header::RANGE,
            "bytes=0-4".parse::<axum::http::HeaderValue>().unwrap(),
        )
        .await;
    assert_eq!(resp.status_code(), axum::http::StatusCode::PARTIAL_CONTENT);
    assert_eq!(resp.as_bytes().as_ref(), b"fake ");
    let cr = resp.headers().get("content-range").unwrap().to_str().unwrap();
    assert_eq!(cr, "bytes 0-4/15");
    let ct = resp.headers().get("content-type").unwrap().to_str().unwrap();
    assert_eq!(ct, "video/x-matroska");

    // Open-ended range
    let resp = server
        .get(&format!("/s/{id}"))
        .add_header(
            axum::http::header::RANGE,
            "bytes=10-".parse::<axum::http::HeaderValue>().unwrap(),
        )
        .await;
    assert_eq!(resp.status_code(), axum::http::StatusCode::PARTIAL_CONTENT);
    assert_eq!(resp.as_bytes().as_ref(), b" data");
}

#[tokio::test]
async fn stream_without_range_returns_whole_file() {
    let (_tmp, server) = test_app();
    let id = id_of(&server, "Inception.2010.1080p.BluRay.x264-GRP.mkv").await;

    let resp = server.get(&format!("/s/{id}")).await;
    resp.assert_status_ok();
    assert_eq!(resp.as_bytes().as_ref(), b"fake video data");
    let ar = resp.headers().get("accept-ranges").unwrap().to_str().unwrap();
    assert_eq!(ar, "bytes");
}

#[tokio::test]
async fn unsatisfiable_range_returns_416() {
    let (_tmp, server) = test_app();
    let id = id_of(&server, "Inception.2010.1080p.BluRay.x264-GRP.mkv").await;

    let resp = server
        .get(&format!("/s/{id}"))
        .add_header(
            axum::http::header::RANGE,
            "bytes=9999-".parse::<axum::http::HeaderValue>().unwrap(),
        )
        .await;
    assert_eq!(
        resp.status_code(),
        axum::http::StatusCode::RANGE_NOT_SATISFIABLE
    );
    let cr = resp.headers().get("content-range").unwrap().to_str().unwrap();
    assert_eq!(cr, "bytes */15");
}

#[tokio::test]
async fn range_on_empty_file_returns_416() {
    let tmp = tempfile::tempdir().unwrap();
    std::fs::write(tmp.path().join("empty.mkv"), b"").unwrap();
    let state = AppState::new(
        tmp.path().canonicalize().unwrap(),
        "ffprobe".into(),
        None,
        String::new(),
    );
    let server = TestServer::new(build_router(state)).unwrap();

    let id = hex::encode(b"empty.mkv");
    let resp = server
        .get(&format!("/s/{id}"))
        .add_header(
            axum::http::header::RANGE,
            "bytes=-500".parse::<axum::http::HeaderValue>().unwrap(),
        )
        .await;
    assert_eq!(
        resp.status_code(),
        axum::http::StatusCode::RANGE_NOT_SATISFIABLE
    );
    let cr = resp.headers().get("content-range").unwrap().to_str().unwrap();
    assert_eq!(cr, "bytes */0");
}

#[tokio::test]
async fn download_sets_attachment_disposition() {
    let (_tmp, server) = test_app();
    let id = id_of(&server, "Inception.2010.1080p.BluRay.x264-GRP.mkv").await;

    let resp = server
        .get(&format!("/d/{id}/Inception.2010.1080p.BluRay.x264-GRP.mkv"))
        .await;
    resp.assert_status_ok();
    let cd = resp
        .headers()
        .get("content-disposition")
        .unwrap()
        .to_str()
        .unwrap();
    assert_eq!(
        cd,
        "attachment; filename=\"Inception.2010.1080p.BluRay.x264-GRP.mkv\""
    );
    assert_eq!(resp.as_bytes().as_ref(), b"fake video data");
}

// ---------------------------------------------------------------------------
// Error shape tests
// ---------------------------------------------------------------------------

#[tokio::test]
async fn malformed_id_returns_400() {
    let (_tmp, server) = test_app();
    let resp = server.get("/api/info?id=zz").await;
    resp.assert_status(axum::http::StatusCode::BAD_REQUEST);
    let body: Value = resp.json();
    assert_eq!(body["error"]["code"], "bad_request");
}

#[tokio::test]
async fn unknown_id_returns_404() {
    let (_tmp, server) = test_app();
    let id = hex::encode(b"nope.mkv");
    let resp = server.get(&format!("/api/info?id={id}")).await;
    resp.assert_status(axum::http::StatusCode::NOT_FOUND);
    let body: Value = resp.json();
    assert_eq!(body["error"]["code"], "not_found");
}

#[tokio::test]
async fn movie_without_api_key_returns_503() {
    let (_tmp, server) = test_app();
    let resp = server
        .get("/api/movie?filename=Inception.2010.1080p.BluRay.x264-GRP.mkv")
        .await;
    resp.assert_status(axum::http::StatusCode::SERVICE_UNAVAILABLE);
    let body: Value = resp.json();
    assert_eq!(body["error"]["code"], "unavailable");
}
