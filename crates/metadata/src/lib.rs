pub mod cache;
pub mod tmdb;
pub mod watch;

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum MetadataError {
    #[error("provider error: {0}")]
    Provider(String),
    #[error("network error: {0}")]
    Network(String),
    #[error("not found")]
    NotFound,
}

/// Movie or series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TitleKind {
    Movie,
    Show,
}

/// The metadata card for one title, as rendered by clients.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TitleCard {
    /// TMDB id.
    pub id: u64,
    #[serde(rename = "type")]
    pub kind: TitleKind,
    pub title: String,
    pub original_title: Option<String>,
    pub tagline: Option<String>,
    pub overview: Option<String>,
    pub year: Option<i32>,
    pub runtime: Option<i32>,
    pub rating: Option<f64>,
    pub vote_count: Option<u64>,
    pub genres: Vec<String>,
    pub directors: Vec<String>,
    pub writers: Vec<String>,
    pub languages: Vec<String>,
    pub countries: Vec<String>,
    pub release_date: Option<String>,
    pub status: Option<String>,
    pub budget: Option<u64>,
    pub revenue: Option<u64>,
    pub companies: Vec<String>,
    pub cast: Vec<CastMember>,
    pub poster: Option<String>,
    pub backdrop: Option<String>,
    pub imdb_id: Option<String>,
    /// Season count; shows only.
    pub seasons: Option<i32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CastMember {
    pub name: String,
    pub character: Option<String>,
    pub photo: Option<String>,
}

impl Default for TitleKind {
    fn default() -> Self {
        Self::Movie
    }
}
