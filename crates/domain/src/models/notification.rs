//! Notification domain models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A user-targeted notification, optionally linked to an event.
///
/// Notifications are created by server-side side effects (e.g. a new
/// confirmed RSVP on a hosted event) and deleted explicitly by the owner.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Notification {
    pub id: Uuid,
    pub user_id: Uuid,
    pub event_id: Option<Uuid>,
    pub message: String,
    pub is_read: bool,
    pub created_at: DateTime<Utc>,
}

/// A notification joined with the title of its linked event, for listings.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct NotificationWithEvent {
    #[serde(flatten)]
    pub notification: Notification,
    pub event_title: Option<String>,
}
