//! Caller identity extraction.
//!
//! The authenticating frontend (BFF) validates the session and forwards the
//! caller's identity in headers. These headers are the trust boundary of
//! this service; a request without them is the one failure mode that gets
//! an explicit error instead of a degraded report.

use axum::async_trait;
use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use crate::error::AppError;

/// Authenticated caller identity extracted from request headers.
#[derive(Debug, Clone)]
pub struct AuthContext {
    /// Identity-provider id of the caller.
    pub user_id: String,
    /// Caller's role, when the session carries one.
    pub role: Option<String>,
}

#[async_trait]
impl<S> FromRequestParts<S> for AuthContext
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let user_id = parts
            .headers
            .get("X-User-ID")
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| {
                AppError::Unauthorized(anyhow::anyhow!(
                    "Missing X-User-ID header (required from BFF)"
                ))
            })?;

        let role = parts
            .headers
            .get("X-User-Role")
            .and_then(|v| v.to_str().ok())
            .map(|s| s.to_string());

        // Add to tracing span for observability
        let span = tracing::Span::current();
        span.record("user_id", user_id);
        if let Some(ref r) = role {
            span.record("role", r.as_str());
        }

        Ok(AuthContext {
            user_id: user_id.to_string(),
            role,
        })
    }
}
