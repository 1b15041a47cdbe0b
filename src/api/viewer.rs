//! Viewer extractor for Axum handlers.
//!
//! The acting user is identified by the `X-User-Id` header. Token issuance and
//! verification happen upstream of this service.

use crate::api::handlers::AppError;
use crate::AppState;
use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use uuid::Uuid;

pub const VIEWER_HEADER: &str = "x-user-id";

/// Identity of the user on whose behalf a request is made
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewer(pub Uuid);

impl Viewer {
    fn from_parts(parts: &Parts) -> Result<Self, AppError> {
        let raw = parts
            .headers
            .get(VIEWER_HEADER)
            .ok_or_else(|| AppError::Unauthorized("Missing X-User-Id header".to_string()))?;
        let id = raw
            .to_str()
            .ok()
            .and_then(|s| s.trim().parse::<Uuid>().ok())
            .ok_or_else(|| AppError::Unauthorized("Invalid X-User-Id header".to_string()))?;
        Ok(Self(id))
    }
}

impl FromRequestParts<AppState> for Viewer {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        _state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        Self::from_parts(parts)
    }
}
