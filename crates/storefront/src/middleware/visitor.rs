//! Visitor identity extractor.

use axum::{extract::FromRequestParts, http::request::Parts};
use tower_sessions::Session;

use multiservice_core::VisitorId;

use crate::error::AppError;

/// Session key holding the visitor id.
pub const VISITOR_ID_KEY: &str = "visitor_id";

/// Opaque id of the browser session making the request.
///
/// Assigned on first use and stored in the session, so it stays stable for
/// the lifetime of the session cookie.
///
/// # Example
///
/// ```rust,ignore
/// async fn handler(Visitor(visitor): Visitor) -> impl IntoResponse {
///     visitor.to_string()
/// }
/// ```
#[derive(Debug, Clone)]
pub struct Visitor(pub VisitorId);

impl<S> FromRequestParts<S> for Visitor
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let session = parts
            .extensions
            .get::<Session>()
            .cloned()
            .ok_or_else(|| AppError::Internal("session layer is not installed".to_string()))?;

        if let Some(existing) = session.get::<VisitorId>(VISITOR_ID_KEY).await? {
            return Ok(Self(existing));
        }

        let visitor = VisitorId::random();
        session.insert(VISITOR_ID_KEY, &visitor).await?;
        tracing::debug!(visitor = %visitor, "New visitor session");
        Ok(Self(visitor))
    }
}
