//! Upload queue endpoints: enqueue, job status, class listing with summary.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use uuid::Uuid;

use schola_core::{
    batch_summary, EnqueueUploadRequest, ListUploadsResponse, UploadJob, UploadQueueRepository,
};

use crate::auth::OwnerIdentity;
use crate::error::{to_response, ApiResult};
use crate::AppState;

/// POST /api/v1/uploads
///
/// Accepts the hand-off for an already-uploaded blob and queues it for
/// ingestion. Fire-and-forget: responds 202 as soon as the `pending` row is
/// in; the worker picks it up asynchronously.
#[utoipa::path(post, path = "/api/v1/uploads", tag = "Uploads",
    request_body = EnqueueUploadRequest,
    responses(
        (status = 202, description = "Accepted", body = UploadJob),
        (status = 400, description = "Validation error")))]
pub async fn enqueue_upload(
    State(state): State<AppState>,
    owner: OwnerIdentity,
    Json(req): Json<EnqueueUploadRequest>,
) -> ApiResult<(StatusCode, Json<UploadJob>)> {
    let upload = req.validate().map_err(to_response)?;
    let job = state
        .db
        .uploads
        .enqueue(owner.0, upload)
        .await
        .map_err(to_response)?;
    Ok((StatusCode::ACCEPTED, Json(job)))
}

/// GET /api/v1/uploads/{id}
#[utoipa::path(get, path = "/api/v1/uploads/{id}", tag = "Uploads",
    responses(
        (status = 200, description = "Success", body = UploadJob),
        (status = 404, description = "Not found")))]
pub async fn get_upload(
    State(state): State<AppState>,
    owner: OwnerIdentity,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<UploadJob>> {
    let job = state
        .db
        .uploads
        .fetch(owner.0, id)
        .await
        .map_err(to_response)?;
    Ok(Json(job))
}

/// Query parameters for listing a class's uploads.
#[derive(Debug, Clone, Deserialize, utoipa::IntoParams)]
pub struct ListUploadsQuery {
    pub class_id: Uuid,
}

/// GET /api/v1/uploads
///
/// Lists the caller's jobs for one class together with the single-line
/// batch summary the UI shows.
#[utoipa::path(get, path = "/api/v1/uploads", tag = "Uploads",
    params(ListUploadsQuery),
    responses((status = 200, description = "Success", body = ListUploadsResponse)))]
pub async fn list_uploads(
    State(state): State<AppState>,
    owner: OwnerIdentity,
    Query(query): Query<ListUploadsQuery>,
) -> ApiResult<Json<ListUploadsResponse>> {
    let jobs = state
        .db
        .uploads
        .list_for_class(owner.0, query.class_id)
        .await
        .map_err(to_response)?;

    let statuses: Vec<_> = jobs.iter().map(|j| j.status).collect();
    Ok(Json(ListUploadsResponse {
        summary: batch_summary(&statuses),
        jobs,
    }))
}
