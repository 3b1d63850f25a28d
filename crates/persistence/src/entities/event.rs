//! Event entities (database row mappings).

use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

use super::rsvp::RsvpStatusDb;

/// Database row mapping for the events table.
#[derive(Debug, Clone, FromRow)]
pub struct EventEntity {
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

impl From<EventEntity> for domain::models::Event {
    fn from(entity: EventEntity) -> Self {
        Self {
            id: entity.id,
            host_id: entity.host_id,
            title: entity.title,
            description: entity.description,
            date: entity.date,
            location: entity.location,
            category: entity.category,
            capacity: entity.capacity,
            is_public: entity.is_public,
            image_url: entity.image_url,
            created_at: entity.created_at,
            updated_at: entity.updated_at,
        }
    }
}

/// Event row joined with the host name.
#[derive(Debug, Clone, FromRow)]
pub struct EventWithHostEntity {
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
    // Host info
    pub host_name: String,
}

/// Event row annotated with host name and confirmed-RSVP count, for
/// listings. The count is an aggregate computed at query time.
#[derive(Debug, Clone, FromRow)]
pub struct EventSummaryEntity {
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
    // Annotations
    pub host_name: String,
    pub confirmed_count: i64,
}

impl From<EventSummaryEntity> for domain::models::event::EventSummary {
    fn from(entity: EventSummaryEntity) -> Self {
        Self {
            id: entity.id,
            host_id: entity.host_id,
            host_name: entity.host_name,
            title: entity.title,
            description: entity.description,
            date: entity.date,
            location: entity.location,
            category: entity.category,
            capacity: entity.capacity,
            is_public: entity.is_public,
            image_url: entity.image_url,
            confirmed_count: entity.confirmed_count,
            created_at: entity.created_at,
        }
    }
}

/// RSVP row joined with the attendee name, for the event detail view.
#[derive(Debug, Clone, FromRow)]
pub struct EventAttendeeEntity {
    pub rsvp_id: Uuid,
    pub user_id: Uuid,
    pub user_name: String,
    pub status: RsvpStatusDb,
    pub guest_count: i32,
    pub checked_in: bool,
    pub checked_in_at: Option<DateTime<Utc>>,
}

impl From<EventAttendeeEntity> for domain::models::event::EventAttendee {
    fn from(entity: EventAttendeeEntity) -> Self {
        Self {
            rsvp_id: entity.rsvp_id,
            user_id: entity.user_id,
            user_name: entity.user_name,
            status: entity.status.into(),
            guest_count: entity.guest_count,
            checked_in: entity.checked_in,
            checked_in_at: entity.checked_in_at,
        }
    }
}
