//! `Caller` extractor: reads the gateway-supplied user id and builds the
//! request context.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use quizhub_core::error::AppError;
use quizhub_core::types::UserId;
use quizhub_service::RequestContext;

use crate::error::ApiError;

/// Header carrying the authenticated user's id.
pub const CALLER_HEADER: &str = "x-user-id";

/// Identified caller available in handlers.
#[derive(Debug, Clone)]
pub struct Caller(pub RequestContext);

impl std::ops::Deref for Caller {
    type Target = RequestContext;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl<S> FromRequestParts<S> for Caller
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let raw = parts
            .headers
            .get(CALLER_HEADER)
            .and_then(|v| v.to_str().ok())
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .ok_or_else(|| AppError::authentication("Missing X-User-Id header"))?;

        let user_id: UserId = raw
            .parse()
            .map_err(|_| AppError::authentication("Invalid X-User-Id header"))?;

        Ok(Caller(RequestContext::new(user_id)))
    }
}
