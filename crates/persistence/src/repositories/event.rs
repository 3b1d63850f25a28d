//! Event repository for database operations.

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::entities::{
    EventAttendeeEntity, EventEntity, EventSummaryEntity, EventWithHostEntity,
};
use crate::metrics::QueryTimer;

/// Repository for event-related database operations.
#[derive(Clone)]
pub struct EventRepository {
    pool: PgPool,
}

impl EventRepository {
    /// Creates a new EventRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// List public events, optionally filtered by category and by date
    /// relative to now. Each row carries the host name and the count of
    /// confirmed RSVPs (derived at query time).
    pub async fn list_public(
        &self,
        category: Option<&str>,
        upcoming: bool,
        past: bool,
    ) -> Result<Vec<EventSummaryEntity>, sqlx::Error> {
        let timer = QueryTimer::new("list_public_events");
        let result = sqlx::query_as::<_, EventSummaryEntity>(
            r#"
            SELECT
                e.id, e.host_id, e.title, e.description, e.date, e.location, e.category,
                e.capacity, e.is_public, e.image_url, e.created_at,
                u.name AS host_name,
                COUNT(r.id) AS confirmed_count
            FROM events e
            JOIN users u ON e.host_id = u.id
            LEFT JOIN rsvps r ON e.id = r.event_id AND r.status = 'confirmed'
            WHERE e.is_public = TRUE
              AND ($1::text IS NULL OR e.category = $1)
              AND (NOT $2 OR e.date > NOW())
              AND (NOT $3 OR e.date <= NOW())
            GROUP BY e.id, u.name
            ORDER BY e.date ASC
            "#,
        )
        .bind(category)
        .bind(upcoming)
        .bind(past)
        .fetch_all(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Find an event by ID.
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<EventEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_event_by_id");
        let result = sqlx::query_as::<_, EventEntity>(
            r#"
            SELECT id, host_id, title, description, date, location, category,
                   capacity, is_public, image_url, created_at, updated_at
            FROM events
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Find an event by ID with its host name.
    pub async fn find_by_id_with_host(
        &self,
        id: Uuid,
    ) -> Result<Option<EventWithHostEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_event_by_id_with_host");
        let result = sqlx::query_as::<_, EventWithHostEntity>(
            r#"
            SELECT e.id, e.host_id, e.title, e.description, e.date, e.location, e.category,
                   e.capacity, e.is_public, e.image_url, e.created_at, e.updated_at,
                   u.name AS host_name
            FROM events e
            JOIN users u ON e.host_id = u.id
            WHERE e.id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// List all RSVPs for an event (any status) with attendee names.
    pub async fn list_attendees(
        &self,
        event_id: Uuid,
    ) -> Result<Vec<EventAttendeeEntity>, sqlx::Error> {
        let timer = QueryTimer::new("list_event_attendees");
        let result = sqlx::query_as::<_, EventAttendeeEntity>(
            r#"
            SELECT r.id AS rsvp_id, r.user_id, u.name AS user_name, r.status,
                   r.guest_count, r.checked_in, r.checked_in_at
            FROM rsvps r
            JOIN users u ON r.user_id = u.id
            WHERE r.event_id = $1
            ORDER BY r.created_at ASC
            "#,
        )
        .bind(event_id)
        .fetch_all(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Create a new event owned by the given host.
    #[allow(clippy::too_many_arguments)]
    pub async fn create_event(
        &self,
        host_id: Uuid,
        title: &str,
        description: Option<&str>,
        date: DateTime<Utc>,
        location: Option<&str>,
        category: Option<&str>,
        capacity: i32,
        is_public: bool,
        image_url: Option<&str>,
    ) -> Result<EventEntity, sqlx::Error> {
        let timer = QueryTimer::new("create_event");
        let result = sqlx::query_as::<_, EventEntity>(
            r#"
            INSERT INTO events (host_id, title, description, date, location, category,
                                capacity, is_public, image_url)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING id, host_id, title, description, date, location, category,
                      capacity, is_public, image_url, created_at, updated_at
            "#,
        )
        .bind(host_id)
        .bind(title)
        .bind(description)
        .bind(date)
        .bind(location)
        .bind(category)
        .bind(capacity)
        .bind(is_public)
        .bind(image_url)
        .fetch_one(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Replace an event's fields.
    #[allow(clippy::too_many_arguments)]
    pub async fn update_event(
        &self,
        id: Uuid,
        title: &str,
        description: Option<&str>,
        date: DateTime<Utc>,
        location: Option<&str>,
        category: Option<&str>,
        capacity: i32,
        is_public: bool,
        image_url: Option<&str>,
    ) -> Result<Option<EventEntity>, sqlx::Error> {
        let timer = QueryTimer::new("update_event");
        let result = sqlx::query_as::<_, EventEntity>(
            r#"
            UPDATE events
            SET title = $1, description = $2, date = $3, location = $4, category = $5,
                capacity = $6, is_public = $7, image_url = $8, updated_at = NOW()
            WHERE id = $9
            RETURNING id, host_id, title, description, date, location, category,
                      capacity, is_public, image_url, created_at, updated_at
            "#,
        )
        .bind(title)
        .bind(description)
        .bind(date)
        .bind(location)
        .bind(category)
        .bind(capacity)
        .bind(is_public)
        .bind(image_url)
        .bind(id)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Delete an event. RSVP rows cascade at the schema level.
    pub async fn delete_event(&self, id: Uuid) -> Result<u64, sqlx::Error> {
        let timer = QueryTimer::new("delete_event");
        let result = sqlx::query("DELETE FROM events WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        timer.record();
        Ok(result.rows_affected())
    }

    /// List events hosted by the given user with confirmed-RSVP counts,
    /// newest first.
    pub async fn list_hosted_by(
        &self,
        host_id: Uuid,
    ) -> Result<Vec<EventSummaryEntity>, sqlx::Error> {
        let timer = QueryTimer::new("list_events_hosted_by");
        let result = sqlx::query_as::<_, EventSummaryEntity>(
            r#"
            SELECT
                e.id, e.host_id, e.title, e.description, e.date, e.location, e.category,
                e.capacity, e.is_public, e.image_url, e.created_at,
                u.name AS host_name,
                COUNT(r.id) AS confirmed_count
            FROM events e
            JOIN users u ON e.host_id = u.id
            LEFT JOIN rsvps r ON e.id = r.event_id AND r.status = 'confirmed'
            WHERE e.host_id = $1
            GROUP BY e.id, u.name
            ORDER BY e.created_at DESC
            "#,
        )
        .bind(host_id)
        .fetch_all(&self.pool)
        .await;
        timer.record();
        result
    }
}
