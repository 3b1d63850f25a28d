//! Admin statistics repository.
//!
//! All statistics are aggregates over the base tables computed at query
//! time; nothing here maintains running counters.

use sqlx::PgPool;

use crate::entities::{EventStatsEntity, OverallStatsEntity, UserActivityEntity};
use crate::metrics::QueryTimer;

/// Repository for admin statistics queries.
#[derive(Clone)]
pub struct StatsRepository {
    pool: PgPool,
}

impl StatsRepository {
    /// Creates a new StatsRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// System-wide totals.
    pub async fn overall_stats(&self) -> Result<OverallStatsEntity, sqlx::Error> {
        let timer = QueryTimer::new("overall_stats");
        let result = sqlx::query_as::<_, OverallStatsEntity>(
            r#"
            SELECT
                (SELECT COUNT(*) FROM users) AS total_users,
                (SELECT COUNT(*) FROM events) AS total_events,
                (SELECT COUNT(*) FROM rsvps WHERE status = 'confirmed') AS total_rsvps,
                (SELECT COUNT(*) FROM rsvps WHERE checked_in = TRUE) AS total_checkins
            "#,
        )
        .fetch_one(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Per-event RSVP breakdown by status and check-in count, newest first.
    pub async fn event_stats(&self) -> Result<Vec<EventStatsEntity>, sqlx::Error> {
        let timer = QueryTimer::new("event_stats");
        let result = sqlx::query_as::<_, EventStatsEntity>(
            r#"
            SELECT
                e.id, e.title, e.date, e.location, e.capacity,
                COUNT(r.id) AS total_rsvps,
                COUNT(*) FILTER (WHERE r.status = 'confirmed') AS confirmed_count,
                COUNT(*) FILTER (WHERE r.status = 'pending') AS pending_count,
                COUNT(*) FILTER (WHERE r.status = 'declined') AS declined_count,
                COUNT(*) FILTER (WHERE r.checked_in = TRUE) AS checked_in_count
            FROM events e
            LEFT JOIN rsvps r ON e.id = r.event_id
            GROUP BY e.id
            ORDER BY e.created_at DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Per-user activity: events created, attended, and checked in.
    pub async fn user_activity(&self) -> Result<Vec<UserActivityEntity>, sqlx::Error> {
        let timer = QueryTimer::new("user_activity");
        let result = sqlx::query_as::<_, UserActivityEntity>(
            r#"
            SELECT
                u.id, u.name, u.email, u.created_at,
                COUNT(DISTINCT e.id) AS events_created,
                COUNT(DISTINCT r.event_id) AS events_attended,
                COUNT(DISTINCT CASE WHEN r.checked_in = TRUE THEN r.event_id END)
                    AS events_checked_in
            FROM users u
            LEFT JOIN events e ON u.id = e.host_id
            LEFT JOIN rsvps r ON u.id = r.user_id
            GROUP BY u.id
            ORDER BY u.created_at DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await;
        timer.record();
        result
    }
}
