//! Integration tests for the attendee CSV export.

mod common;

use axum::http::{header, Method, StatusCode};
use common::*;
use tower::ServiceExt;

async fn confirm_rsvp(app: &axum::Router, token: &str, event_id: &str, guests: i32) {
    let response = app
        .clone()
        .oneshot(json_request_with_auth(
            Method::POST,
            "/api/v1/rsvps",
            serde_json::json!({
                "event_id": event_id,
                "status": "confirmed",
                "guest_count": guests
            }),
            token,
        ))
        .await
        .unwrap();
    assert!(response.status().is_success());
}

#[tokio::test]
async fn test_host_exports_confirmed_attendees() {
    let pool = create_test_pool().await;
    run_migrations(&pool).await;
    let app = create_test_app(test_config(), pool);

    let host = create_authenticated_user(&app, &TestUser::new()).await;
    let attendee = create_authenticated_user(&app, &TestUser::new()).await;
    let decliner = create_authenticated_user(&app, &TestUser::new()).await;
    let event = create_test_event(&app, &host, 50).await;
    let event_id = event["id"].as_str().unwrap();

    confirm_rsvp(&app, &attendee.token, event_id, 2).await;

    // A declined RSVP stays out of the export
    let response = app
        .clone()
        .oneshot(json_request_with_auth(
            Method::POST,
            "/api/v1/rsvps",
            serde_json::json!({
                "event_id": event_id,
                "status": "declined",
                "guest_count": 1
            }),
            &decliner.token,
        ))
        .await
        .unwrap();
    assert!(response.status().is_success());

    let response = app
        .clone()
        .oneshot(get_request_with_auth(
            &format!("/api/v1/export/events/{}/attendees", event_id),
            &host.token,
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response
            .headers()
            .get(header::CONTENT_TYPE)
            .unwrap()
            .to_str()
            .unwrap(),
        "text/csv"
    );
    assert!(response
        .headers()
        .get(header::CONTENT_DISPOSITION)
        .unwrap()
        .to_str()
        .unwrap()
        .contains("attachment"));

    let csv = response_body_text(response).await;
    let lines: Vec<&str> = csv.lines().collect();
    assert_eq!(lines[0], "Name,Email,Guests,Status,Checked In,Check-in Time");
    assert_eq!(lines.len(), 2);
    assert!(lines[1].contains(&attendee.email));
    assert!(lines[1].contains(",2,confirmed,false,"));
    assert!(!csv.contains(&decliner.email));
}

#[tokio::test]
async fn test_non_host_cannot_export() {
    let pool = create_test_pool().await;
    run_migrations(&pool).await;
    let app = create_test_app(test_config(), pool);

    let host = create_authenticated_user(&app, &TestUser::new()).await;
    let other = create_authenticated_user(&app, &TestUser::new()).await;
    let event = create_test_event(&app, &host, 50).await;

    let response = app
        .clone()
        .oneshot(get_request_with_auth(
            &format!(
                "/api/v1/export/events/{}/attendees",
                event["id"].as_str().unwrap()
            ),
            &other.token,
        ))
        .await
        .unwrap();

    // Foreign events answer exactly like missing ones
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_export_unknown_event_not_found() {
    let pool = create_test_pool().await;
    run_migrations(&pool).await;
    let app = create_test_app(test_config(), pool);

    let user = create_authenticated_user(&app, &TestUser::new()).await;

    let response = app
        .clone()
        .oneshot(get_request_with_auth(
            &format!("/api/v1/export/events/{}/attendees", uuid::Uuid::new_v4()),
            &user.token,
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
