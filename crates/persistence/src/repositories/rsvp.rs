//! RSVP repository for database operations.

use sqlx::PgPool;
use uuid::Uuid;

use crate::entities::{AttendeeExportEntity, RsvpEntity, RsvpStatusDb, RsvpWithEventEntity};
use crate::metrics::QueryTimer;

/// Repository for RSVP-related database operations.
#[derive(Clone)]
pub struct RsvpRepository {
    pool: PgPool,
}

impl RsvpRepository {
    /// Creates a new RsvpRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Find an RSVP by ID.
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<RsvpEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_rsvp_by_id");
        let result = sqlx::query_as::<_, RsvpEntity>(
            r#"
            SELECT id, user_id, event_id, status, guest_count, checked_in, checked_in_at,
                   created_at, updated_at
            FROM rsvps
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Find the RSVP a user holds for an event, if any.
    pub async fn find_by_user_and_event(
        &self,
        user_id: Uuid,
        event_id: Uuid,
    ) -> Result<Option<RsvpEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_rsvp_by_user_and_event");
        let result = sqlx::query_as::<_, RsvpEntity>(
            r#"
            SELECT id, user_id, event_id, status, guest_count, checked_in, checked_in_at,
                   created_at, updated_at
            FROM rsvps
            WHERE user_id = $1 AND event_id = $2
            "#,
        )
        .bind(user_id)
        .bind(event_id)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Create or update the RSVP for a (user, event) pair.
    ///
    /// The unique constraint on (user_id, event_id) guarantees a single row
    /// per pair; a repeated call updates status and guest count in place.
    pub async fn upsert(
        &self,
        user_id: Uuid,
        event_id: Uuid,
        status: RsvpStatusDb,
        guest_count: i32,
    ) -> Result<RsvpEntity, sqlx::Error> {
        let timer = QueryTimer::new("upsert_rsvp");
        let result = sqlx::query_as::<_, RsvpEntity>(
            r#"
            INSERT INTO rsvps (user_id, event_id, status, guest_count)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (user_id, event_id)
            DO UPDATE SET status = EXCLUDED.status, guest_count = EXCLUDED.guest_count,
                          updated_at = NOW()
            RETURNING id, user_id, event_id, status, guest_count, checked_in, checked_in_at,
                      created_at, updated_at
            "#,
        )
        .bind(user_id)
        .bind(event_id)
        .bind(status)
        .bind(guest_count)
        .fetch_one(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Update an RSVP's status and guest count by ID.
    pub async fn update(
        &self,
        id: Uuid,
        status: RsvpStatusDb,
        guest_count: i32,
    ) -> Result<Option<RsvpEntity>, sqlx::Error> {
        let timer = QueryTimer::new("update_rsvp");
        let result = sqlx::query_as::<_, RsvpEntity>(
            r#"
            UPDATE rsvps
            SET status = $1, guest_count = $2, updated_at = NOW()
            WHERE id = $3
            RETURNING id, user_id, event_id, status, guest_count, checked_in, checked_in_at,
                      created_at, updated_at
            "#,
        )
        .bind(status)
        .bind(guest_count)
        .bind(id)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// List a user's RSVPs joined with event metadata, newest first.
    pub async fn list_for_user(
        &self,
        user_id: Uuid,
    ) -> Result<Vec<RsvpWithEventEntity>, sqlx::Error> {
        let timer = QueryTimer::new("list_rsvps_for_user");
        let result = sqlx::query_as::<_, RsvpWithEventEntity>(
            r#"
            SELECT r.id, r.user_id, r.event_id, r.status, r.guest_count, r.checked_in,
                   r.checked_in_at, r.created_at, r.updated_at,
                   e.title AS event_title, e.date AS event_date,
                   e.location AS event_location, e.image_url AS event_image_url
            FROM rsvps r
            JOIN events e ON r.event_id = e.id
            WHERE r.user_id = $1
            ORDER BY r.created_at DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Find a user's confirmed RSVP for an event, if any.
    pub async fn find_confirmed(
        &self,
        user_id: Uuid,
        event_id: Uuid,
    ) -> Result<Option<RsvpEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_confirmed_rsvp");
        let result = sqlx::query_as::<_, RsvpEntity>(
            r#"
            SELECT id, user_id, event_id, status, guest_count, checked_in, checked_in_at,
                   created_at, updated_at
            FROM rsvps
            WHERE user_id = $1 AND event_id = $2 AND status = 'confirmed'
            "#,
        )
        .bind(user_id)
        .bind(event_id)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Mark a user's RSVP for an event as checked in, recording the
    /// timestamp. Repeat calls simply re-set the flag.
    pub async fn mark_checked_in(
        &self,
        user_id: Uuid,
        event_id: Uuid,
    ) -> Result<Option<RsvpEntity>, sqlx::Error> {
        let timer = QueryTimer::new("mark_rsvp_checked_in");
        let result = sqlx::query_as::<_, RsvpEntity>(
            r#"
            UPDATE rsvps
            SET checked_in = TRUE, checked_in_at = NOW(), updated_at = NOW()
            WHERE user_id = $1 AND event_id = $2
            RETURNING id, user_id, event_id, status, guest_count, checked_in, checked_in_at,
                      created_at, updated_at
            "#,
        )
        .bind(user_id)
        .bind(event_id)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// List confirmed attendees of an event for export, ordered by name.
    pub async fn list_confirmed_attendees(
        &self,
        event_id: Uuid,
    ) -> Result<Vec<AttendeeExportEntity>, sqlx::Error> {
        let timer = QueryTimer::new("list_confirmed_attendees");
        let result = sqlx::query_as::<_, AttendeeExportEntity>(
            r#"
            SELECT u.name, u.email, r.guest_count, r.status, r.checked_in, r.checked_in_at
            FROM rsvps r
            JOIN users u ON r.user_id = u.id
            WHERE r.event_id = $1 AND r.status = 'confirmed'
            ORDER BY u.name
            "#,
        )
        .bind(event_id)
        .fetch_all(&self.pool)
        .await;
        timer.record();
        result
    }
}
