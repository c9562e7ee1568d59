//! Error-to-HTTP mapping.
//!
//! Every handler returns the same body shape on failure:
//! `{"error": "...", "error_description": "..."}`. Validation and
//! authorization failures map to distinct statuses so clients can render
//! "bad input" versus "permission denied" without parsing messages.

use axum::http::StatusCode;
use axum::Json;
use serde_json::{json, Value};

use schola_core::Error;

/// Handler error type: status plus the standard JSON body.
pub type ApiError = (StatusCode, Json<Value>);

/// Handler result alias.
pub type ApiResult<T> = Result<T, ApiError>;

/// Map a core error to its HTTP representation.
pub fn to_response(err: Error) -> ApiError {
    let (status, code) = match &err {
        Error::Validation(_) => (StatusCode::BAD_REQUEST, "validation_error"),
        Error::Unauthorized(_) => (StatusCode::UNAUTHORIZED, "unauthorized"),
        Error::Forbidden(_) => (StatusCode::FORBIDDEN, "forbidden"),
        Error::NotFound(_) | Error::EventNotFound(_) | Error::JobNotFound(_) => {
            (StatusCode::NOT_FOUND, "not_found")
        }
        Error::Database(_) => (StatusCode::INTERNAL_SERVER_ERROR, "database_error"),
        _ => (StatusCode::INTERNAL_SERVER_ERROR, "internal_error"),
    };

    if status.is_server_error() {
        tracing::error!(subsystem = "api", error = %err, "Request failed");
    }

    (
        status,
        Json(json!({
            "error": code,
            "error_description": err.to_string(),
        })),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[test]
    fn test_validation_maps_to_400() {
        let (status, body) = to_response(Error::Validation("class_id is required".into()));
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body.0["error"], "validation_error");
        assert!(body.0["error_description"]
            .as_str()
            .unwrap()
            .contains("class_id"));
    }

    #[test]
    fn test_forbidden_distinct_from_validation() {
        let (status, body) = to_response(Error::Forbidden("not the owner".into()));
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(body.0["error"], "forbidden");
    }

    #[test]
    fn test_not_found_maps_to_404() {
        let (status, _) = to_response(Error::EventNotFound(Uuid::new_v4()));
        assert_eq!(status, StatusCode::NOT_FOUND);
        let (status, _) = to_response(Error::JobNotFound(Uuid::new_v4()));
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_database_error_maps_to_500() {
        let (status, body) = to_response(Error::Database(sqlx::Error::PoolClosed));
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body.0["error"], "database_error");
    }
}
