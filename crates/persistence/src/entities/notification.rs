//! Notification entities (database row mappings).

use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

/// Database row mapping for the notifications table.
#[derive(Debug, Clone, FromRow)]
pub struct NotificationEntity {
    pub id: Uuid,
    pub user_id: Uuid,
    pub event_id: Option<Uuid>,
    pub message: String,
    pub is_read: bool,
    pub created_at: DateTime<Utc>,
}

impl From<NotificationEntity> for domain::models::Notification {
    fn from(entity: NotificationEntity) -> Self {
        Self {
            id: entity.id,
            user_id: entity.user_id,
            event_id: entity.event_id,
            message: entity.message,
            is_read: entity.is_read,
            created_at: entity.created_at,
        }
    }
}

/// Notification row joined with the linked event title.
#[derive(Debug, Clone, FromRow)]
pub struct NotificationWithEventEntity {
    pub id: Uuid,
    pub user_id: Uuid,
    pub event_id: Option<Uuid>,
    pub message: String,
    pub is_read: bool,
    pub created_at: DateTime<Utc>,
    // Event info
    pub event_title: Option<String>,
}

impl From<NotificationWithEventEntity> for domain::models::notification::NotificationWithEvent {
    fn from(entity: NotificationWithEventEntity) -> Self {
        Self {
            notification: domain::models::Notification {
                id: entity.id,
                user_id: entity.user_id,
                event_id: entity.event_id,
                message: entity.message,
                is_read: entity.is_read,
                created_at: entity.created_at,
            },
            event_title: entity.event_title,
        }
    }
}
