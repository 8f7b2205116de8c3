use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use arkiv_catalog::CatalogError;
use arkiv_core::error::{ApiError, ErrorEnvelope};
use arkiv_metadata::MetadataError;

/// Newtype wrapper so we can implement `IntoResponse` in this crate.
pub struct AppError(pub ApiError);

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.0.status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        let envelope = ErrorEnvelope::from(&self.0);
        (status, Json(envelope)).into_response()
    }
}

impl From<ApiError> for AppError {
    fn from(e: ApiError) -> Self {
        Self(e)
    }
}

impl From<CatalogError> for AppError {
    fn from(e: CatalogError) -> Self {
        let api = match e {
            CatalogError::BadId => ApiError::BadRequest("malformed file id".into()),
            CatalogError::NotFound => ApiError::NotFound("no such file".into()),
            CatalogError::OutsideRoot => {
                ApiError::Forbidden("path escapes the archive root".into())
            }
            CatalogError::Io(e) => ApiError::Internal(format!("io error: {e}")),
        };
        Self(api)
    }
}

impl From<MetadataError> for AppError {
    fn from(e: MetadataError) -> Self {
        let api = match e {
            MetadataError::NotFound => ApiError::NotFound("title not found".into()),
            MetadataError::Network(msg) => ApiError::Upstream(format!("network: {msg}")),
            MetadataError::Provider(msg) => ApiError::Upstream(msg),
        };
        Self(api)
    }
}
