//! RSVP entities (database row mappings).

use chrono::{DateTime, Utc};
use domain::models::rsvp::RsvpStatus;
use sqlx::FromRow;
use uuid::Uuid;

/// Database enum that maps to the PostgreSQL `rsvp_status` type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "rsvp_status", rename_all = "lowercase")]
pub enum RsvpStatusDb {
    Confirmed,
    Pending,
    Declined,
}

impl From<RsvpStatusDb> for RsvpStatus {
    fn from(db_status: RsvpStatusDb) -> Self {
        match db_status {
            RsvpStatusDb::Confirmed => RsvpStatus::Confirmed,
            RsvpStatusDb::Pending => RsvpStatus::Pending,
            RsvpStatusDb::Declined => RsvpStatus::Declined,
        }
    }
}

impl From<RsvpStatus> for RsvpStatusDb {
    fn from(status: RsvpStatus) -> Self {
        match status {
            RsvpStatus::Confirmed => RsvpStatusDb::Confirmed,
            RsvpStatus::Pending => RsvpStatusDb::Pending,
            RsvpStatus::Declined => RsvpStatusDb::Declined,
        }
    }
}

/// Database row mapping for the rsvps table.
#[derive(Debug, Clone, FromRow)]
pub struct RsvpEntity {
    pub id: Uuid,
    pub user_id: Uuid,
    pub event_id: Uuid,
    pub status: RsvpStatusDb,
    pub guest_count: i32,
    pub checked_in: bool,
    pub checked_in_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<RsvpEntity> for domain::models::Rsvp {
    fn from(entity: RsvpEntity) -> Self {
        Self {
            id: entity.id,
            user_id: entity.user_id,
            event_id: entity.event_id,
            status: entity.status.into(),
            guest_count: entity.guest_count,
            checked_in: entity.checked_in,
            checked_in_at: entity.checked_in_at,
            created_at: entity.created_at,
            updated_at: entity.updated_at,
        }
    }
}

/// RSVP row joined with event metadata, for the caller's RSVP listing.
#[derive(Debug, Clone, FromRow)]
pub struct RsvpWithEventEntity {
    pub id: Uuid,
    pub user_id: Uuid,
    pub event_id: Uuid,
    pub status: RsvpStatusDb,
    pub guest_count: i32,
    pub checked_in: bool,
    pub checked_in_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    // Event info
    pub event_title: String,
    pub event_date: DateTime<Utc>,
    pub event_location: Option<String>,
    pub event_image_url: Option<String>,
}

impl From<RsvpWithEventEntity> for domain::models::rsvp::RsvpWithEvent {
    fn from(entity: RsvpWithEventEntity) -> Self {
        Self {
            rsvp: domain::models::Rsvp {
                id: entity.id,
                user_id: entity.user_id,
                event_id: entity.event_id,
                status: entity.status.into(),
                guest_count: entity.guest_count,
                checked_in: entity.checked_in,
                checked_in_at: entity.checked_in_at,
                created_at: entity.created_at,
                updated_at: entity.updated_at,
            },
            event_title: entity.event_title,
            event_date: entity.event_date,
            event_location: entity.event_location,
            event_image_url: entity.event_image_url,
        }
    }
}

/// Confirmed attendee row for CSV export.
#[derive(Debug, Clone, FromRow)]
pub struct AttendeeExportEntity {
    pub name: String,
    pub email: String,
    pub guest_count: i32,
    pub status: RsvpStatusDb,
    pub checked_in: bool,
    pub checked_in_at: Option<DateTime<Utc>>,
}
