//! # schola-api
//!
//! HTTP API server for the schola backend: calendar series, the upload
//! queue, and owner preferences, served over axum with the owner identity
//! asserted by the fronting proxy.

pub mod auth;
pub mod error;
pub mod handlers;

use axum::http::header;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::json;
use tower_http::cors::{Any, CorsLayer};
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::request_id::{
    MakeRequestId, PropagateRequestIdLayer, RequestId, SetRequestIdLayer,
};
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use uuid::Uuid;

use schola_db::Database;

/// Maximum accepted request body size (metadata only — file bytes go
/// straight to object storage, never through this API).
const MAX_BODY_BYTES: usize = 256 * 1024;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    pub db: Database,
}

/// Generates time-ordered UUIDv7 request correlation IDs.
///
/// UUIDv7 embeds a Unix timestamp, so IDs sort chronologically — useful for
/// log correlation and debugging production incidents.
#[derive(Clone, Default)]
pub struct MakeRequestUuidV7;

impl MakeRequestId for MakeRequestUuidV7 {
    fn make_request_id<B>(&mut self, _request: &axum::http::Request<B>) -> Option<RequestId> {
        let id = Uuid::now_v7().to_string().parse().ok()?;
        Some(RequestId::new(id))
    }
}

/// OpenAPI documentation, served at `/openapi.json`.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Schola API",
        description = "Calendar series, upload queue, and preferences for the schola education platform"
    ),
    paths(
        handlers::calendar::create_event,
        handlers::calendar::list_events,
        handlers::calendar::get_event,
        handlers::calendar::update_event,
        handlers::calendar::delete_event,
        handlers::uploads::enqueue_upload,
        handlers::uploads::get_upload,
        handlers::uploads::list_uploads,
        handlers::preferences::get_preferences,
        handlers::preferences::put_preferences,
    ),
    components(schemas(
        schola_core::CalendarEvent,
        schola_core::RepeatPattern,
        schola_core::DeleteScope,
        schola_core::UploadJob,
        schola_core::UploadStatus,
        schola_core::EnqueueUploadRequest,
        schola_core::ListUploadsResponse,
        schola_core::UpdateEventRequest,
        schola_core::PreferenceSet,
        schola_core::OwnerPreferences,
        handlers::calendar::CreateEventRequest,
    )),
    tags(
        (name = "Calendar", description = "Recurring event series"),
        (name = "Uploads", description = "File ingestion queue"),
        (name = "Preferences", description = "Per-owner preferences"),
        (name = "System", description = "Health and metadata")
    )
)]
pub struct ApiDoc;

/// GET /health
async fn health() -> Json<serde_json::Value> {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

/// GET /openapi.json
async fn openapi_spec() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

/// Build the application router with all routes and middleware layers.
pub fn router(state: AppState) -> Router {
    use handlers::{calendar, preferences, uploads};

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION]);

    Router::new()
        .route("/health", get(health))
        .route("/openapi.json", get(openapi_spec))
        .route(
            "/api/v1/calendar/events",
            post(calendar::create_event).get(calendar::list_events),
        )
        .route(
            "/api/v1/calendar/events/:id",
            get(calendar::get_event)
                .patch(calendar::update_event)
                .delete(calendar::delete_event),
        )
        .route(
            "/api/v1/uploads",
            post(uploads::enqueue_upload).get(uploads::list_uploads),
        )
        .route("/api/v1/uploads/:id", get(uploads::get_upload))
        .route(
            "/api/v1/preferences",
            get(preferences::get_preferences).put(preferences::put_preferences),
        )
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(TraceLayer::new_for_http())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuidV7))
        .layer(RequestBodyLimitLayer::new(MAX_BODY_BYTES))
        .layer(cors)
        .with_state(state)
}
