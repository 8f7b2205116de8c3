//! Directory-backed file catalog: stable ids, single-level listings,
//! server-side filtering/sorting/pagination and sidecar subtitle discovery.

pub mod ids;
pub mod list;
pub mod query;
pub mod subtitles;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("malformed file id")]
    BadId,
    #[error("no such file")]
    NotFound,
    #[error("path escapes the archive root")]
    OutsideRoot,
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}
