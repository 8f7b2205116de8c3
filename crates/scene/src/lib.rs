//! Scene-release filename intelligence: parsing, series grouping, related-file
//! discovery, similarity sampling, fuzzy search and sort orders.
//!
//! Everything in this crate is synchronous, pure and total over its inputs.

pub mod order;
pub mod parse;
pub mod search;
pub mod series;
pub mod similar;
pub mod vocab;

pub use order::SortKey;
pub use parse::{ParsedName, display_name, extract_year, parse_filename};
pub use search::smart_search;
pub use series::{RelatedEntry, RelatedFiles, find_related_files, normalize_title, series_key};
pub use similar::similar_titles;
