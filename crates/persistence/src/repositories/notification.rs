//! Notification repository for database operations.

use sqlx::PgPool;
use uuid::Uuid;

use crate::entities::{NotificationEntity, NotificationWithEventEntity};
use crate::metrics::QueryTimer;

/// Repository for notification-related database operations.
#[derive(Clone)]
pub struct NotificationRepository {
    pool: PgPool,
}

impl NotificationRepository {
    /// Creates a new NotificationRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create a notification for a user, optionally linked to an event.
    pub async fn create(
        &self,
        user_id: Uuid,
        event_id: Option<Uuid>,
        message: &str,
    ) -> Result<NotificationEntity, sqlx::Error> {
        let timer = QueryTimer::new("create_notification");
        let result = sqlx::query_as::<_, NotificationEntity>(
            r#"
            INSERT INTO notifications (user_id, event_id, message)
            VALUES ($1, $2, $3)
            RETURNING id, user_id, event_id, message, is_read, created_at
            "#,
        )
        .bind(user_id)
        .bind(event_id)
        .bind(message)
        .fetch_one(&self.pool)
        .await;
        timer.record();
        result
    }

    /// List a user's notifications with event titles, newest first.
    pub async fn list_for_user(
        &self,
        user_id: Uuid,
    ) -> Result<Vec<NotificationWithEventEntity>, sqlx::Error> {
        let timer = QueryTimer::new("list_notifications_for_user");
        let result = sqlx::query_as::<_, NotificationWithEventEntity>(
            r#"
            SELECT n.id, n.user_id, n.event_id, n.message, n.is_read, n.created_at,
                   e.title AS event_title
            FROM notifications n
            LEFT JOIN events e ON n.event_id = e.id
            WHERE n.user_id = $1
            ORDER BY n.created_at DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Find a notification owned by the given user.
    pub async fn find_for_user(
        &self,
        id: Uuid,
        user_id: Uuid,
    ) -> Result<Option<NotificationEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_notification_for_user");
        let result = sqlx::query_as::<_, NotificationEntity>(
            r#"
            SELECT id, user_id, event_id, message, is_read, created_at
            FROM notifications
            WHERE id = $1 AND user_id = $2
            "#,
        )
        .bind(id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Mark a notification as read.
    pub async fn mark_read(&self, id: Uuid) -> Result<Option<NotificationEntity>, sqlx::Error> {
        let timer = QueryTimer::new("mark_notification_read");
        let result = sqlx::query_as::<_, NotificationEntity>(
            r#"
            UPDATE notifications
            SET is_read = TRUE
            WHERE id = $1
            RETURNING id, user_id, event_id, message, is_read, created_at
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Mark all of a user's notifications as read.
    pub async fn mark_all_read(&self, user_id: Uuid) -> Result<u64, sqlx::Error> {
        let timer = QueryTimer::new("mark_all_notifications_read");
        let result = sqlx::query(
            r#"
            UPDATE notifications
            SET is_read = TRUE
            WHERE user_id = $1
            "#,
        )
        .bind(user_id)
        .execute(&self.pool)
        .await?;
        timer.record();
        Ok(result.rows_affected())
    }

    /// Delete a notification.
    pub async fn delete(&self, id: Uuid) -> Result<u64, sqlx::Error> {
        let timer = QueryTimer::new("delete_notification");
        let result = sqlx::query("DELETE FROM notifications WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        timer.record();
        Ok(result.rows_affected())
    }
}
