//! RSVP domain models.
//!
//! An RSVP records a user's intent to attend an event, with a guest count
//! and a check-in flag. There is exactly one RSVP per (user, event) pair;
//! re-submitting updates the existing record.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;
use validator::Validate;

/// Attendance status of an RSVP.
///
/// Any status may be set directly on the first RSVP, and the owning user
/// may move between statuses freely.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RsvpStatus {
    Confirmed,
    Pending,
    Declined,
}

impl RsvpStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            RsvpStatus::Confirmed => "confirmed",
            RsvpStatus::Pending => "pending",
            RsvpStatus::Declined => "declined",
        }
    }
}

impl FromStr for RsvpStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "confirmed" => Ok(RsvpStatus::Confirmed),
            "pending" => Ok(RsvpStatus::Pending),
            "declined" => Ok(RsvpStatus::Declined),
            _ => Err(format!("Invalid RSVP status: {}", s)),
        }
    }
}

impl fmt::Display for RsvpStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Represents an RSVP record.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Rsvp {
    pub id: Uuid,
    pub user_id: Uuid,
    pub event_id: Uuid,
    pub status: RsvpStatus,
    pub guest_count: i32,
    pub checked_in: bool,
    pub checked_in_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Request to create or update the caller's RSVP for an event.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "snake_case")]
pub struct CreateRsvpRequest {
    pub event_id: Uuid,

    pub status: RsvpStatus,

    #[validate(range(min = 1, message = "Guest count must be at least 1"))]
    #[serde(default = "default_guest_count")]
    pub guest_count: i32,
}

/// Request to update an existing RSVP by id.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "snake_case")]
pub struct UpdateRsvpRequest {
    pub status: RsvpStatus,

    #[validate(range(min = 1, message = "Guest count must be at least 1"))]
    pub guest_count: i32,
}

fn default_guest_count() -> i32 {
    1
}

/// An RSVP joined with metadata of the event it belongs to, for the
/// caller's RSVP listing.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct RsvpWithEvent {
    #[serde(flatten)]
    pub rsvp: Rsvp,
    pub event_title: String,
    pub event_date: DateTime<Utc>,
    pub event_location: Option<String>,
    pub event_image_url: Option<String>,
}
