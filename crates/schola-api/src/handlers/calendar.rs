//! Calendar event endpoints: series creation, listing, update, scoped delete.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::json;
use uuid::Uuid;

use schola_core::{
    expand_series, CalendarEvent, CalendarRepository, DeleteScope, EventSpec, ListEventsRequest,
    RepeatPattern, UpdateEventRequest,
};

use crate::auth::OwnerIdentity;
use crate::error::{to_response, ApiResult};
use crate::AppState;

/// Wire request for creating a (possibly recurring) event.
///
/// `repeat` arrives as a free string and is parsed leniently: an
/// unrecognized cadence creates a single occurrence instead of failing.
#[derive(Debug, Clone, Deserialize, utoipa::ToSchema)]
pub struct CreateEventRequest {
    pub title: String,
    pub starts_at: DateTime<Utc>,
    pub ends_at: Option<DateTime<Utc>>,
    pub class_id: Option<Uuid>,
    pub location: Option<String>,
    pub notes: Option<String>,
    pub event_type: Option<String>,
    pub repeat: Option<String>,
}

/// POST /api/v1/calendar/events
///
/// Expands the event specification up to the 365-day horizon and persists the
/// whole series as one all-or-nothing batch. Responds with every created
/// occurrence (one element for non-recurring events).
#[utoipa::path(post, path = "/api/v1/calendar/events", tag = "Calendar",
    request_body = CreateEventRequest,
    responses((status = 201, description = "Created", body = [CalendarEvent])))]
pub async fn create_event(
    State(state): State<AppState>,
    owner: OwnerIdentity,
    Json(req): Json<CreateEventRequest>,
) -> ApiResult<(StatusCode, Json<Vec<CalendarEvent>>)> {
    let spec = EventSpec {
        title: req.title,
        starts_at: req.starts_at,
        ends_at: req.ends_at,
        class_id: req.class_id,
        location: req.location,
        notes: req.notes,
        event_type: req.event_type,
        repeat: RepeatPattern::parse_lenient(req.repeat.as_deref()),
    };

    let rows = expand_series(&spec, owner.0, Utc::now()).map_err(to_response)?;
    let created = state
        .db
        .calendar
        .insert_series(rows)
        .await
        .map_err(to_response)?;

    Ok((StatusCode::CREATED, Json(created)))
}

/// GET /api/v1/calendar/events
#[utoipa::path(get, path = "/api/v1/calendar/events", tag = "Calendar",
    params(ListEventsRequest),
    responses((status = 200, description = "Success", body = [CalendarEvent])))]
pub async fn list_events(
    State(state): State<AppState>,
    owner: OwnerIdentity,
    Query(req): Query<ListEventsRequest>,
) -> ApiResult<Json<Vec<CalendarEvent>>> {
    let events = state
        .db
        .calendar
        .list(owner.0, req)
        .await
        .map_err(to_response)?;
    Ok(Json(events))
}

/// GET /api/v1/calendar/events/{id}
#[utoipa::path(get, path = "/api/v1/calendar/events/{id}", tag = "Calendar",
    responses(
        (status = 200, description = "Success", body = CalendarEvent),
        (status = 404, description = "Not found")))]
pub async fn get_event(
    State(state): State<AppState>,
    owner: OwnerIdentity,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<CalendarEvent>> {
    let event = state
        .db
        .calendar
        .fetch(owner.0, id)
        .await
        .map_err(to_response)?;
    Ok(Json(event))
}

/// PATCH /api/v1/calendar/events/{id}
#[utoipa::path(patch, path = "/api/v1/calendar/events/{id}", tag = "Calendar",
    request_body = UpdateEventRequest,
    responses((status = 200, description = "Updated", body = CalendarEvent)))]
pub async fn update_event(
    State(state): State<AppState>,
    owner: OwnerIdentity,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateEventRequest>,
) -> ApiResult<Json<CalendarEvent>> {
    let event = state
        .db
        .calendar
        .update(owner.0, id, req)
        .await
        .map_err(to_response)?;
    Ok(Json(event))
}

/// Query parameters for scoped deletion.
#[derive(Debug, Clone, Default, Deserialize, utoipa::IntoParams)]
pub struct DeleteEventQuery {
    /// Deletion scope; defaults to `this`
    #[serde(default)]
    pub scope: DeleteScope,
}

/// DELETE /api/v1/calendar/events/{id}
///
/// Removes the occurrence and, per scope, other members of its series.
/// Deleting an already-deleted series member yields `deleted: 0`, not an
/// error (scoped deletes are idempotent under concurrent requests).
#[utoipa::path(delete, path = "/api/v1/calendar/events/{id}", tag = "Calendar",
    params(DeleteEventQuery),
    responses((status = 200, description = "Deleted")))]
pub async fn delete_event(
    State(state): State<AppState>,
    owner: OwnerIdentity,
    Path(id): Path<Uuid>,
    Query(query): Query<DeleteEventQuery>,
) -> ApiResult<Json<serde_json::Value>> {
    let deleted = state
        .db
        .calendar
        .delete_scoped(owner.0, id, query.scope)
        .await
        .map_err(to_response)?;
    Ok(Json(json!({ "deleted": deleted })))
}
