//! TMDB (The Movie Database) client.
//!
//! Uses TMDB API v3: https://developer.themoviedb.org/docs

use arkiv_scene::ParsedName;
use tracing::debug;

use crate::{CastMember, MetadataError, TitleCard, TitleKind};

const BASE_URL: &str = "https://api.themoviedb.org/3";
const IMAGE_BASE: &str = "https://image.tmdb.org/t/p";

pub struct TmdbClient {
    api_key: String,
    client: reqwest::Client,
}

impl TmdbClient {
    pub fn new(api_key: String) -> Self {
        Self {
            api_key,
            client: reqwest::Client::new(),
        }
    }

    async fn get_json(
        &self,
        path: &str,
        params: &[(&str, &str)],
    ) -> Result<serde_json::Value, MetadataError> {
        let mut all_params = vec![("api_key", self.api_key.as_str())];
        all_params.extend_from_slice(params);

        let url = format!("{BASE_URL}{path}");
        debug!(url = %url, "TMDB request");

        let resp = self
            .client
            .get(&url)
            .query(&all_params)
            .send()
            .await
            .map_err(|e| MetadataError::Network(e.to_string()))?;

        if resp.status() == reqwest::StatusCode::NOT_FOUND {
            return Err(MetadataError::NotFound);
        }

        if !resp.status().is_success() {
            return Err(MetadataError::Provider(format!(
                "TMDB returned {}",
                resp.status()
            )));
        }

        resp.json()
            .await
            .map_err(|e| MetadataError::Provider(format!("parse JSON: {e}")))
    }

    /// Resolve a parsed filename to a metadata card. Files with an episode
    /// marker search the TV index, everything else the movie index; the
    /// parsed year scopes the search when present.
    pub async fn lookup(&self, parsed: &ParsedName) -> Result<TitleCard, MetadataError> {
        let is_show = parsed.season.is_some();

        let mut params = vec![("query", parsed.title.as_str())];
        let year_str = parsed.year.map(|y| y.to_string());
        if let Some(ref y) = year_str {
            params.push((if is_show { "first_air_date_year" } else { "year" }, y));
        }

        let search_path = if is_show { "/search/tv" } else { "/search/movie" };
        let data = self.get_json(search_path, &params).await?;
        let id = data["results"][0]["id"]
            .as_u64()
            .ok_or(MetadataError::NotFound)?;

        let details_path = if is_show {
            format!("/tv/{id}")
        } else {
            format!("/movie/{id}")
        };
        let details = self
            .get_json(
                &details_path,
                &[("append_to_response", "credits,external_ids")],
            )
            .await?;

        Ok(if is_show {
            parse_show_card(&details)
        } else {
            parse_movie_card(&details)
        })
    }

    /// Streaming availability per country for a resolved title.
    pub async fn watch_providers(
        &self,
        card: &TitleCard,
    ) -> Result<serde_json::Value, MetadataError> {
        let path = match card.kind {
            TitleKind::Movie => format!("/movie/{}/watch/providers", card.id),
            TitleKind::Show => format!("/tv/{}/watch/providers", card.id),
        };
        self.get_json(&path, &[]).await
    }
}

fn strings_at(data: &serde_json::Value, path: &str, field: &str) -> Vec<String> {
    data[path]
        .as_array()
        .map(|items| {
            items
                .iter()
                .filter_map(|i| i[field].as_str())
                .map(|s| s.to_string())
                .collect()
        })
        .unwrap_or_default()
}

fn extract_cast(data: &serde_json::Value) -> Vec<CastMember> {
    data["credits"]["cast"]
        .as_array()
        .map(|cast| {
            cast.iter()
                .take(20)
                .filter_map(|c| {
                    let name = c["name"].as_str()?;
                    Some(CastMember {
                        name: name.to_string(),
                        character: c["character"].as_str().map(|s| s.to_string()),
                        photo: c["profile_path"]
                            .as_str()
                            .map(|p| format!("{IMAGE_BASE}/w185{p}")),
                    })
                })
                .collect()
        })
        .unwrap_or_default()
}

fn crew_names(data: &serde_json::Value, jobs: &[&str]) -> Vec<String> {
    let mut names: Vec<String> = data["credits"]["crew"]
        .as_array()
        .map(|crew| {
            crew.iter()
                .filter(|c| c["job"].as_str().is_some_and(|j| jobs.contains(&j)))
                .filter_map(|c| c["name"].as_str())
                .map(|s| s.to_string())
                .collect()
        })
        .unwrap_or_default();
    names.dedup();
    names
}

fn year_of(date: Option<&str>) -> Option<i32> {
    date.and_then(|d| d.get(..4)).and_then(|y| y.parse().ok())
}

pub fn parse_movie_card(data: &serde_json::Value) -> TitleCard {
    let release_date = data["release_date"].as_str();

    TitleCard {
        id: data["id"].as_u64().unwrap_or(0),
        kind: TitleKind::Movie,
        title: data["title"].as_str().unwrap_or("Unknown").to_string(),
        original_title: data["original_title"].as_str().map(|s| s.to_string()),
        tagline: data["tagline"].as_str().filter(|t| !t.is_empty()).map(|s| s.to_string()),
        overview: data["overview"].as_str().map(|s| s.to_string()),
        year: year_of(release_date),
        runtime: data["runtime"].as_i64().map(|r| r as i32),
        rating: data["vote_average"].as_f64(),
        vote_count: data["vote_count"].as_u64(),
        genres: strings_at(data, "genres", "name"),
        directors: crew_names(data, &["Director"]),
        writers: crew_names(data, &["Writer", "Screenplay"]),
        languages: strings_at(data, "spoken_languages", "english_name"),
        countries: strings_at(data, "production_countries", "name"),
        release_date: release_date.map(|s| s.to_string()),
        status: data["status"].as_str().map(|s| s.to_string()),
        budget: data["budget"].as_u64().filter(|b| *b > 0),
        revenue: data["revenue"].as_u64().filter(|r| *r > 0),
        companies: strings_at(data, "production_companies", "name"),
        cast: extract_cast(data),
        poster: data["poster_path"]
            .as_str()
            .map(|p| format!("{IMAGE_BASE}/w500{p}")),
        backdrop: data["backdrop_path"]
            .as_str()
            .map(|p| format!("{IMAGE_BASE}/w1280{p}")),
        imdb_id: data["imdb_id"]
            .as_str()
            .or_else(|| data["external_ids"]["imdb_id"].as_str())
            .map(|s| s.to_string()),
        seasons: None,
    }
}

pub fn parse_show_card(data: &serde_json::Value) -> TitleCard {
    let first_air = data["first_air_date"].as_str();

    TitleCard {
        id: data["id"].as_u64().unwrap_or(0),
        kind: TitleKind::Show,
        title: data["name"].as_str().unwrap_or("Unknown").to_string(),
        original_title: data["original_name"].as_str().map(|s| s.to_string()),
        tagline: data["tagline"].as_str().filter(|t| !t.is_empty()).map(|s| s.to_string()),
        overview: data["overview"].as_str().map(|s| s.to_string()),
        year: year_of(first_air),
        runtime: data["episode_run_time"][0].as_i64().map(|r| r as i32),
        rating: data["vote_average"].as_f64(),
        vote_count: data["vote_count"].as_u64(),
        genres: strings_at(data, "genres", "name"),
        directors: strings_at(data, "created_by", "name"),
        writers: crew_names(data, &["Writer", "Screenplay"]),
        languages: strings_at(data, "spoken_languages", "english_name"),
        countries: strings_at(data, "production_countries", "name"),
        release_date: first_air.map(|s| s.to_string()),
        status: data["status"].as_str().map(|s| s.to_string()),
        budget: None,
        revenue: None,
        companies: strings_at(data, "production_companies", "name"),
        cast: extract_cast(data),
        poster: data["poster_path"]
            .as_str()
            .map(|p| format!("{IMAGE_BASE}/w500{p}")),
        backdrop: data["backdrop_path"]
            .as_str()
            .map(|p| format!("{IMAGE_BASE}/w1280{p}")),
        imdb_id: data["external_ids"]["imdb_id"].as_str().map(|s| s.to_string()),
        seasons: data["number_of_seasons"].as_i64().map(|n| n as i32),
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
