//! Check-in routes: token issuance for hosts and redemption for attendees.

use axum::{
    extract::{Path, State},
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;
use validator::Validate;

use domain::models::user::UserRole;
use persistence::repositories::{EventRepository, RsvpRepository, UserRepository};
use shared::checkin::{sign_token, verify_token, CheckinTokenError};

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::CurrentUser;
use crate::middleware::metrics::record_checkin_redeemed;

/// Response after issuing a check-in token.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct IssueTokenResponse {
    pub event_id: Uuid,
    /// Opaque signed token; clients render it as a QR code.
    pub token: String,
    pub issued_at: DateTime<Utc>,
}

/// Request to redeem a scanned check-in token.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "snake_case")]
pub struct RedeemTokenRequest {
    #[validate(length(min = 1, message = "Token is required"))]
    pub token: String,
}

/// Response after a successful check-in.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct RedeemTokenResponse {
    pub message: String,
    pub event_id: Uuid,
    pub checked_in_at: Option<DateTime<Utc>>,
}

/// Issue a signed check-in token for an event.
///
/// GET /api/v1/checkin/events/:id/token
///
/// Only the event's host or an admin may issue tokens. The embedded
/// timestamp is informational; redemption does not check it for expiry.
pub async fn issue_token(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(event_id): Path<Uuid>,
) -> Result<Json<IssueTokenResponse>, ApiError> {
    let event_repo = EventRepository::new(state.pool.clone());
    let user_repo = UserRepository::new(state.pool.clone());

    let event = event_repo
        .find_by_id(event_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Event not found".to_string()))?;

    if event.host_id != current_user.user_id {
        let user = user_repo
            .find_by_id(current_user.user_id)
            .await?
            .ok_or_else(|| ApiError::Unauthorized("Unknown user".to_string()))?;
        let role: UserRole = user.role.into();
        if !role.is_admin() {
            return Err(ApiError::Forbidden(
                "Only the host or an admin can issue check-in tokens".to_string(),
            ));
        }
    }

    let issued_at = Utc::now();
    let token = sign_token(event_id, issued_at, &state.config.checkin.secret);

    info!(
        event_id = %event_id,
        user_id = %current_user.user_id,
        "Check-in token issued"
    );

    Ok(Json(IssueTokenResponse {
        event_id,
        token,
        issued_at,
    }))
}

/// Redeem a check-in token for the calling user.
///
/// POST /api/v1/checkin
///
/// The caller must hold a confirmed RSVP for the event encoded in the
/// token. Re-redeeming simply re-sets the checked-in flag.
pub async fn redeem_token(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Json(request): Json<RedeemTokenRequest>,
) -> Result<Json<RedeemTokenResponse>, ApiError> {
    request.validate()?;

    let decoded = verify_token(&request.token, &state.config.checkin.secret).map_err(
        |e| match e {
            CheckinTokenError::SignatureMismatch => {
                ApiError::Unauthorized("Invalid check-in token".to_string())
            }
            CheckinTokenError::Malformed => {
                ApiError::Unauthorized("Invalid check-in token".to_string())
            }
        },
    )?;

    let event_repo = EventRepository::new(state.pool.clone());
    let rsvp_repo = RsvpRepository::new(state.pool.clone());

    event_repo
        .find_by_id(decoded.event_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Event not found".to_string()))?;

    // A confirmed RSVP is the ticket; anything else cannot check in
    rsvp_repo
        .find_confirmed(current_user.user_id, decoded.event_id)
        .await?
        .ok_or_else(|| ApiError::Validation("You must RSVP to check in".to_string()))?;

    let rsvp = rsvp_repo
        .mark_checked_in(current_user.user_id, decoded.event_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("RSVP not found".to_string()))?;

    record_checkin_redeemed();

    info!(
        event_id = %decoded.event_id,
        user_id = %current_user.user_id,
        "Check-in successful"
    );

    Ok(Json(RedeemTokenResponse {
        message: "Check-in successful".to_string(),
        event_id: decoded.event_id,
        checked_in_at: rsvp.checked_in_at,
    }))
}
