//! Authenticated-owner extraction.
//!
//! Authentication itself is delegated to the fronting identity-aware proxy,
//! which verifies the session and asserts the caller's id in the
//! `x-auth-request-user` header. The API trusts only that header — never an
//! owner id in a request body — so every mutation is scoped to the verified
//! caller.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum::http::StatusCode;
use axum::Json;
use serde_json::json;
use uuid::Uuid;

use crate::error::ApiError;

/// Header populated by the identity-aware proxy.
pub const OWNER_HEADER: &str = "x-auth-request-user";

/// The verified owner identity of the current request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OwnerIdentity(pub Uuid);

#[axum::async_trait]
impl<S> FromRequestParts<S> for OwnerIdentity
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let raw = parts
            .headers
            .get(OWNER_HEADER)
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| unauthorized("missing authenticated identity"))?;

        let owner_id = raw
            .parse::<Uuid>()
            .map_err(|_| unauthorized("malformed authenticated identity"))?;

        Ok(OwnerIdentity(owner_id))
    }
}

fn unauthorized(description: &str) -> ApiError {
    (
        StatusCode::UNAUTHORIZED,
        Json(json!({
            "error": "unauthorized",
            "error_description": description,
        })),
    )
}
