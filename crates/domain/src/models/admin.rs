//! Admin statistics models.
//!
//! All counts are aggregates computed at query time.

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

/// System-wide totals.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct OverallStats {
    pub total_users: i64,
    pub total_events: i64,
    pub total_rsvps: i64,
    pub total_checkins: i64,
}

/// Per-event RSVP breakdown.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct EventStats {
    pub id: Uuid,
    pub title: String,
    pub date: DateTime<Utc>,
    pub location: Option<String>,
    pub capacity: i32,
    pub total_rsvps: i64,
    pub confirmed_count: i64,
    pub pending_count: i64,
    pub declined_count: i64,
    pub checked_in_count: i64,
}

/// Per-user activity summary.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct UserActivity {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
    pub events_created: i64,
    pub events_attended: i64,
    pub events_checked_in: i64,
}
