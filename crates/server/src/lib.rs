pub mod error;
pub mod mediainfo;
pub mod playlinks;
pub mod routes;
pub mod state;
pub mod streaming;
