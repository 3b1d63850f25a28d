//! RSVP routes: create-or-update, listing, and owner-scoped updates.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use tracing::{info, warn};
use uuid::Uuid;
use validator::Validate;

use domain::models::rsvp::{CreateRsvpRequest, RsvpStatus, RsvpWithEvent, UpdateRsvpRequest};
use domain::models::Rsvp;
use persistence::repositories::{EventRepository, NotificationRepository, RsvpRepository};

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::CurrentUser;
use crate::middleware::metrics::record_rsvp_recorded;

/// Create or update the caller's RSVP for an event.
///
/// POST /api/v1/rsvps
///
/// One RSVP exists per (user, event) pair; submitting again updates the
/// status and guest count in place. Returns 201 when the RSVP was created
/// and 200 when an existing one was updated. Capacity is not checked here:
/// concurrent confirmations may exceed an event's capacity.
pub async fn create_or_update_rsvp(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Json(request): Json<CreateRsvpRequest>,
) -> Result<(StatusCode, Json<Rsvp>), ApiError> {
    request.validate()?;

    let event_repo = EventRepository::new(state.pool.clone());
    let rsvp_repo = RsvpRepository::new(state.pool.clone());

    let event = event_repo
        .find_by_id(request.event_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Event not found".to_string()))?;

    let existed = rsvp_repo
        .find_by_user_and_event(current_user.user_id, request.event_id)
        .await?
        .is_some();

    let rsvp = rsvp_repo
        .upsert(
            current_user.user_id,
            request.event_id,
            request.status.into(),
            request.guest_count,
        )
        .await?;

    record_rsvp_recorded(request.status.as_str());

    info!(
        rsvp_id = %rsvp.id,
        event_id = %request.event_id,
        user_id = %current_user.user_id,
        status = %request.status,
        "RSVP recorded"
    );

    // Tell the host about new confirmed attendees. Best-effort: a failed
    // insert is logged and never fails the RSVP itself.
    if request.status == RsvpStatus::Confirmed && event.host_id != current_user.user_id {
        let notification_repo = NotificationRepository::new(state.pool.clone());
        let message = format!("New confirmed RSVP for \"{}\"", event.title);
        if let Err(e) = notification_repo
            .create(event.host_id, Some(event.id), &message)
            .await
        {
            warn!(event_id = %event.id, "Failed to create host notification: {}", e);
        }
    }

    let status_code = if existed {
        StatusCode::OK
    } else {
        StatusCode::CREATED
    };

    Ok((status_code, Json(rsvp.into())))
}

/// List the caller's RSVPs joined with event metadata, newest first.
///
/// GET /api/v1/rsvps/user
pub async fn list_my_rsvps(
    State(state): State<AppState>,
    current_user: CurrentUser,
) -> Result<Json<Vec<RsvpWithEvent>>, ApiError> {
    let rsvp_repo = RsvpRepository::new(state.pool.clone());

    let rsvps = rsvp_repo.list_for_user(current_user.user_id).await?;

    Ok(Json(rsvps.into_iter().map(Into::into).collect()))
}

/// Update an RSVP's status and guest count. Only the owning user may
/// update it.
///
/// PUT /api/v1/rsvps/:id
pub async fn update_rsvp(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateRsvpRequest>,
) -> Result<Json<Rsvp>, ApiError> {
    request.validate()?;

    let rsvp_repo = RsvpRepository::new(state.pool.clone());

    let existing = rsvp_repo
        .find_by_id(id)
        .await?
        .ok_or_else(|| ApiError::NotFound("RSVP not found".to_string()))?;

    if existing.user_id != current_user.user_id {
        return Err(ApiError::Forbidden(
            "Only the owner can update this RSVP".to_string(),
        ));
    }

    let rsvp = rsvp_repo
        .update(id, request.status.into(), request.guest_count)
        .await?
        .ok_or_else(|| ApiError::NotFound("RSVP not found".to_string()))?;

    info!(
        rsvp_id = %id,
        user_id = %current_user.user_id,
        status = %request.status,
        "RSVP updated"
    );

    Ok(Json(rsvp.into()))
}
