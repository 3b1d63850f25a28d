//! Event domain models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use super::rsvp::RsvpStatus;

/// Represents an event record.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Event {
    pub id: Uuid,
    pub host_id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub date: DateTime<Utc>,
    pub location: Option<String>,
    pub category: Option<String>,
    pub capacity: i32,
    pub is_public: bool,
    pub image_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Request to create an event.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "snake_case")]
pub struct CreateEventRequest {
    #[validate(length(min = 1, max = 200, message = "Title must be 1-200 characters"))]
    pub title: String,

    #[validate(length(max = 5000, message = "Description must be at most 5000 characters"))]
    pub description: Option<String>,

    pub date: DateTime<Utc>,

    #[validate(length(max = 300, message = "Location must be at most 300 characters"))]
    pub location: Option<String>,

    #[validate(length(max = 100, message = "Category must be at most 100 characters"))]
    pub category: Option<String>,

    #[validate(range(min = 0, message = "Capacity must be non-negative"))]
    pub capacity: i32,

    #[serde(default = "default_is_public")]
    pub is_public: bool,

    #[validate(url(message = "Invalid image URL"))]
    pub image_url: Option<String>,
}

fn default_is_public() -> bool {
    true
}

/// Request to update an event. All fields are replaced, matching the
/// full-row update semantics of the API.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "snake_case")]
pub struct UpdateEventRequest {
    #[validate(length(min = 1, max = 200, message = "Title must be 1-200 characters"))]
    pub title: String,

    #[validate(length(max = 5000, message = "Description must be at most 5000 characters"))]
    pub description: Option<String>,

    pub date: DateTime<Utc>,

    #[validate(length(max = 300, message = "Location must be at most 300 characters"))]
    pub location: Option<String>,

    #[validate(length(max = 100, message = "Category must be at most 100 characters"))]
    pub category: Option<String>,

    #[validate(range(min = 0, message = "Capacity must be non-negative"))]
    pub capacity: i32,

    pub is_public: bool,

    #[validate(url(message = "Invalid image URL"))]
    pub image_url: Option<String>,
}

/// Query filters for the public event listing.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct EventFilter {
    pub category: Option<String>,
    #[serde(default)]
    pub upcoming: bool,
    #[serde(default)]
    pub past: bool,
}

/// Event summary for listings, annotated with the host name and the count
/// of confirmed RSVPs (derived at query time, never stored).
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct EventSummary {
    pub id: Uuid,
    pub host_id: Uuid,
    pub host_name: String,
    pub title: String,
    pub description: Option<String>,
    pub date: DateTime<Utc>,
    pub location: Option<String>,
    pub category: Option<String>,
    pub capacity: i32,
    pub is_public: bool,
    pub image_url: Option<String>,
    pub confirmed_count: i64,
    pub created_at: DateTime<Utc>,
}

/// An RSVP attached to an event detail view, annotated with the attendee
/// name.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct EventAttendee {
    pub rsvp_id: Uuid,
    pub user_id: Uuid,
    pub user_name: String,
    pub status: RsvpStatus,
    pub guest_count: i32,
    pub checked_in: bool,
    pub checked_in_at: Option<DateTime<Utc>>,
}

/// Full event view: the event, its host name, and every RSVP regardless of
/// status.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct EventDetail {
    #[serde(flatten)]
    pub event: Event,
    pub host_name: String,
    pub rsvps: Vec<EventAttendee>,
}
