//! Attendee CSV export.

use axum::{
    extract::{Path, State},
    http::header,
    response::{IntoResponse, Response},
};
use tracing::info;
use uuid::Uuid;

use persistence::entities::AttendeeExportEntity;
use persistence::repositories::{EventRepository, RsvpRepository};

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::CurrentUser;

const CSV_HEADER: &str = "Name,Email,Guests,Status,Checked In,Check-in Time";

/// Export the confirmed attendees of an event as CSV.
///
/// GET /api/v1/export/events/:id/attendees
///
/// Only the host may export. A missing event and a foreign event both
/// answer 404 so the endpoint does not reveal which ids exist.
pub async fn export_attendees(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(event_id): Path<Uuid>,
) -> Result<Response, ApiError> {
    let event_repo = EventRepository::new(state.pool.clone());
    let rsvp_repo = RsvpRepository::new(state.pool.clone());

    let event = event_repo
        .find_by_id(event_id)
        .await?
        .filter(|event| event.host_id == current_user.user_id)
        .ok_or_else(|| ApiError::NotFound("Event not found or not authorized".to_string()))?;

    let attendees = rsvp_repo.list_confirmed_attendees(event_id).await?;

    info!(
        event_id = %event.id,
        host_id = %current_user.user_id,
        attendee_count = attendees.len(),
        "Attendees exported"
    );

    let csv = render_csv(&attendees);

    let filename = format!("attendees-event-{}.csv", event_id);
    Ok((
        [
            (header::CONTENT_TYPE, "text/csv".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename={}", filename),
            ),
        ],
        csv,
    )
        .into_response())
}

fn render_csv(attendees: &[AttendeeExportEntity]) -> String {
    let mut out = String::from(CSV_HEADER);
    out.push('\n');

    for attendee in attendees {
        let status: domain::models::rsvp::RsvpStatus = attendee.status.into();
        let checkin_time = attendee
            .checked_in_at
            .map(|t| t.to_rfc3339())
            .unwrap_or_default();

        out.push_str(&format!(
            "{},{},{},{},{},{}\n",
            csv_escape(&attendee.name),
            csv_escape(&attendee.email),
            attendee.guest_count,
            status,
            attendee.checked_in,
            checkin_time,
        ));
    }

    out
}

/// Quote a CSV field when it contains a delimiter, quote, or newline;
/// embedded quotes are doubled.
fn csv_escape(field: &str) -> String {
    if field.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use persistence::entities::RsvpStatusDb;

    #[test]
    fn test_csv_escape_plain() {
        assert_eq!(csv_escape("Alice"), "Alice");
        assert_eq!(csv_escape("alice@example.com"), "alice@example.com");
    }

    #[test]
    fn test_csv_escape_comma() {
        assert_eq!(csv_escape("Doe, Jane"), "\"Doe, Jane\"");
    }

    #[test]
    fn test_csv_escape_quotes() {
        assert_eq!(csv_escape("the \"host\""), "\"the \"\"host\"\"\"");
    }

    #[test]
    fn test_csv_escape_newline() {
        assert_eq!(csv_escape("line1\nline2"), "\"line1\nline2\"");
    }

    #[test]
    fn test_render_csv() {
        let attendees = vec![AttendeeExportEntity {
            name: "Doe, Jane".to_string(),
            email: "jane@example.com".to_string(),
            guest_count: 2,
            status: RsvpStatusDb::Confirmed,
            checked_in: false,
            checked_in_at: None,
        }];

        let csv = render_csv(&attendees);
        let mut lines = csv.lines();
        assert_eq!(lines.next(), Some(CSV_HEADER));
        assert_eq!(
            lines.next(),
            Some("\"Doe, Jane\",jane@example.com,2,confirmed,false,")
        );
        assert_eq!(lines.next(), None);
    }

    #[test]
    fn test_render_csv_empty() {
        let csv = render_csv(&[]);
        assert_eq!(csv, format!("{}\n", CSV_HEADER));
    }
}
