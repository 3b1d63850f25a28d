//! Notification routes, all scoped to the owning user.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::Serialize;
use tracing::info;
use uuid::Uuid;

use domain::models::notification::NotificationWithEvent;
use domain::models::Notification;
use persistence::repositories::NotificationRepository;

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::CurrentUser;

/// Acknowledgement body for bulk operations.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct MarkAllReadResponse {
    pub marked_read: u64,
}

/// List the caller's notifications with event titles, newest first.
///
/// GET /api/v1/notifications
pub async fn list_notifications(
    State(state): State<AppState>,
    current_user: CurrentUser,
) -> Result<Json<Vec<NotificationWithEvent>>, ApiError> {
    let notification_repo = NotificationRepository::new(state.pool.clone());

    let notifications = notification_repo.list_for_user(current_user.user_id).await?;

    Ok(Json(notifications.into_iter().map(Into::into).collect()))
}

/// Mark one notification as read. Only the owner may do so.
///
/// PUT /api/v1/notifications/:id/read
pub async fn mark_read(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(id): Path<Uuid>,
) -> Result<Json<Notification>, ApiError> {
    let notification_repo = NotificationRepository::new(state.pool.clone());

    notification_repo
        .find_for_user(id, current_user.user_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Notification not found".to_string()))?;

    let notification = notification_repo
        .mark_read(id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Notification not found".to_string()))?;

    Ok(Json(notification.into()))
}

/// Mark all of the caller's notifications as read.
///
/// PUT /api/v1/notifications/read-all
pub async fn mark_all_read(
    State(state): State<AppState>,
    current_user: CurrentUser,
) -> Result<Json<MarkAllReadResponse>, ApiError> {
    let notification_repo = NotificationRepository::new(state.pool.clone());

    let marked_read = notification_repo.mark_all_read(current_user.user_id).await?;

    info!(
        user_id = %current_user.user_id,
        marked_read = marked_read,
        "All notifications marked read"
    );

    Ok(Json(MarkAllReadResponse { marked_read }))
}

/// Delete a notification. Only the owner may do so.
///
/// DELETE /api/v1/notifications/:id
pub async fn delete_notification(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    let notification_repo = NotificationRepository::new(state.pool.clone());

    notification_repo
        .find_for_user(id, current_user.user_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Notification not found".to_string()))?;

    let rows_affected = notification_repo.delete(id).await?;
    if rows_affected == 0 {
        return Err(ApiError::NotFound("Notification not found".to_string()));
    }

    Ok(StatusCode::NO_CONTENT)
}
