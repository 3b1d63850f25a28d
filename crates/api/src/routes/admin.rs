//! Admin statistics routes.
//!
//! All handlers sit behind the admin middleware; the caller's role has
//! already been checked when these run.

use axum::{extract::State, Json};
use domain::models::admin::{EventStats, OverallStats, UserActivity};
use persistence::repositories::StatsRepository;

use crate::app::AppState;
use crate::error::ApiError;

/// System-wide totals.
///
/// GET /api/v1/admin/stats
pub async fn overall_stats(
    State(state): State<AppState>,
) -> Result<Json<OverallStats>, ApiError> {
    let stats_repo = StatsRepository::new(state.pool.clone());
    let stats = stats_repo.overall_stats().await?;
    Ok(Json(stats.into()))
}

/// Per-event RSVP breakdown.
///
/// GET /api/v1/admin/events/stats
pub async fn event_stats(
    State(state): State<AppState>,
) -> Result<Json<Vec<EventStats>>, ApiError> {
    let stats_repo = StatsRepository::new(state.pool.clone());
    let stats = stats_repo.event_stats().await?;
    Ok(Json(stats.into_iter().map(Into::into).collect()))
}

/// Per-user activity summary.
///
/// GET /api/v1/admin/users/activity
pub async fn user_activity(
    State(state): State<AppState>,
) -> Result<Json<Vec<UserActivity>>, ApiError> {
    let stats_repo = StatsRepository::new(state.pool.clone());
    let activity = stats_repo.user_activity().await?;
    Ok(Json(activity.into_iter().map(Into::into).collect()))
}
