//! Event routes: public listing and detail, plus host-scoped CRUD.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use tracing::info;
use uuid::Uuid;
use validator::Validate;

use domain::models::event::{
    CreateEventRequest, EventDetail, EventFilter, EventSummary, UpdateEventRequest,
};
use domain::models::Event;
use persistence::repositories::EventRepository;

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::CurrentUser;

/// List public events with optional filters.
///
/// GET /api/v1/events?category=...&upcoming=true&past=true
pub async fn list_public_events(
    State(state): State<AppState>,
    Query(filter): Query<EventFilter>,
) -> Result<Json<Vec<EventSummary>>, ApiError> {
    let event_repo = EventRepository::new(state.pool.clone());

    let events = event_repo
        .list_public(filter.category.as_deref(), filter.upcoming, filter.past)
        .await?;

    Ok(Json(events.into_iter().map(Into::into).collect()))
}

/// Get an event by id with all of its RSVPs (any status) and attendee
/// names.
///
/// GET /api/v1/events/:id
pub async fn get_event(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<EventDetail>, ApiError> {
    let event_repo = EventRepository::new(state.pool.clone());

    let event = event_repo
        .find_by_id_with_host(id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Event not found".to_string()))?;

    let rsvps = event_repo.list_attendees(id).await?;

    Ok(Json(EventDetail {
        event: Event {
            id: event.id,
            host_id: event.host_id,
            title: event.title,
            description: event.description,
            date: event.date,
            location: event.location,
            category: event.category,
            capacity: event.capacity,
            is_public: event.is_public,
            image_url: event.image_url,
            created_at: event.created_at,
            updated_at: event.updated_at,
        },
        host_name: event.host_name,
        rsvps: rsvps.into_iter().map(Into::into).collect(),
    }))
}

/// Create an event owned by the caller.
///
/// POST /api/v1/events
pub async fn create_event(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Json(request): Json<CreateEventRequest>,
) -> Result<(StatusCode, Json<Event>), ApiError> {
    request.validate()?;

    let event_repo = EventRepository::new(state.pool.clone());

    let event = event_repo
        .create_event(
            current_user.user_id,
            &request.title,
            request.description.as_deref(),
            request.date,
            request.location.as_deref(),
            request.category.as_deref(),
            request.capacity,
            request.is_public,
            request.image_url.as_deref(),
        )
        .await?;

    info!(
        event_id = %event.id,
        host_id = %current_user.user_id,
        "Event created"
    );

    Ok((StatusCode::CREATED, Json(event.into())))
}

/// Update an event. Only the host may update it.
///
/// PUT /api/v1/events/:id
pub async fn update_event(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateEventRequest>,
) -> Result<Json<Event>, ApiError> {
    request.validate()?;

    let event_repo = EventRepository::new(state.pool.clone());

    let existing = event_repo
        .find_by_id(id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Event not found".to_string()))?;

    if existing.host_id != current_user.user_id {
        return Err(ApiError::Forbidden(
            "Only the host can update this event".to_string(),
        ));
    }

    let event = event_repo
        .update_event(
            id,
            &request.title,
            request.description.as_deref(),
            request.date,
            request.location.as_deref(),
            request.category.as_deref(),
            request.capacity,
            request.is_public,
            request.image_url.as_deref(),
        )
        .await?
        .ok_or_else(|| ApiError::NotFound("Event not found".to_string()))?;

    info!(event_id = %id, host_id = %current_user.user_id, "Event updated");

    Ok(Json(event.into()))
}

/// Delete an event. Only the host may delete it; RSVP rows cascade.
///
/// DELETE /api/v1/events/:id
pub async fn delete_event(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    let event_repo = EventRepository::new(state.pool.clone());

    let existing = event_repo
        .find_by_id(id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Event not found".to_string()))?;

    if existing.host_id != current_user.user_id {
        return Err(ApiError::Forbidden(
            "Only the host can delete this event".to_string(),
        ));
    }

    let rows_affected = event_repo.delete_event(id).await?;
    if rows_affected == 0 {
        return Err(ApiError::NotFound("Event not found".to_string()));
    }

    info!(event_id = %id, host_id = %current_user.user_id, "Event deleted");

    Ok(StatusCode::NO_CONTENT)
}

/// List events hosted by the caller, newest first.
///
/// GET /api/v1/events/user/events
pub async fn list_my_events(
    State(state): State<AppState>,
    current_user: CurrentUser,
) -> Result<Json<Vec<EventSummary>>, ApiError> {
    let event_repo = EventRepository::new(state.pool.clone());

    let events = event_repo.list_hosted_by(current_user.user_id).await?;

    Ok(Json(events.into_iter().map(Into::into).collect()))
}
