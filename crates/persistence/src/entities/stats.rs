//! Admin statistics entities (aggregate query rows).

use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

/// System-wide totals row.
#[derive(Debug, Clone, FromRow)]
pub struct OverallStatsEntity {
    pub total_users: i64,
    pub total_events: i64,
    pub total_rsvps: i64,
    pub total_checkins: i64,
}

impl From<OverallStatsEntity> for domain::models::admin::OverallStats {
    fn from(entity: OverallStatsEntity) -> Self {
        Self {
            total_users: entity.total_users,
            total_events: entity.total_events,
            total_rsvps: entity.total_rsvps,
            total_checkins: entity.total_checkins,
        }
    }
}

/// Per-event RSVP breakdown row.
#[derive(Debug, Clone, FromRow)]
pub struct EventStatsEntity {
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

impl From<EventStatsEntity> for domain::models::admin::EventStats {
    fn from(entity: EventStatsEntity) -> Self {
        Self {
            id: entity.id,
            title: entity.title,
            date: entity.date,
            location: entity.location,
            capacity: entity.capacity,
            total_rsvps: entity.total_rsvps,
            confirmed_count: entity.confirmed_count,
            pending_count: entity.pending_count,
            declined_count: entity.declined_count,
            checked_in_count: entity.checked_in_count,
        }
    }
}

/// Per-user activity row.
#[derive(Debug, Clone, FromRow)]
pub struct UserActivityEntity {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
    pub events_created: i64,
    pub events_attended: i64,
    pub events_checked_in: i64,
}

impl From<UserActivityEntity> for domain::models::admin::UserActivity {
    fn from(entity: UserActivityEntity) -> Self {
        Self {
            id: entity.id,
            name: entity.name,
            email: entity.email,
            created_at: entity.created_at,
            events_created: entity.events_created,
            events_attended: entity.events_attended,
            events_checked_in: entity.events_checked_in,
        }
    }
}
