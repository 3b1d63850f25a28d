//! Integration tests for the notification endpoints.

mod common;

use axum::http::{Method, StatusCode};
use common::*;
use tower::ServiceExt;

async fn confirm_rsvp(app: &axum::Router, token: &str, event_id: &str) {
    let response = app
        .clone()
        .oneshot(json_request_with_auth(
            Method::POST,
            "/api/v1/rsvps",
            serde_json::json!({
                "event_id": event_id,
                "status": "confirmed",
                "guest_count": 1
            }),
            token,
        ))
        .await
        .unwrap();
    assert!(response.status().is_success());
}

async fn list_notifications(app: &axum::Router, token: &str) -> serde_json::Value {
    let response = app
        .clone()
        .oneshot(get_request_with_auth("/api/v1/notifications", token))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    parse_response_body(response).await
}

#[tokio::test]
async fn test_confirmed_rsvp_notifies_host() {
    let pool = create_test_pool().await;
    run_migrations(&pool).await;
    let app = create_test_app(test_config(), pool);

    let host = create_authenticated_user(&app, &TestUser::new()).await;
    let attendee = create_authenticated_user(&app, &TestUser::new()).await;
    let event = create_test_event(&app, &host, 50).await;
    let event_id = event["id"].as_str().unwrap();

    confirm_rsvp(&app, &attendee.token, event_id).await;

    let notifications = list_notifications(&app, &host.token).await;
    let notifications = notifications.as_array().unwrap();
    assert_eq!(notifications.len(), 1);
    assert_eq!(notifications[0]["event_id"].as_str().unwrap(), event_id);
    assert_eq!(
        notifications[0]["event_title"].as_str().unwrap(),
        event["title"].as_str().unwrap()
    );
    assert!(!notifications[0]["is_read"].as_bool().unwrap());

    // The attendee got nothing
    let own = list_notifications(&app, &attendee.token).await;
    assert!(own.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_hosts_own_rsvp_does_not_notify() {
    let pool = create_test_pool().await;
    run_migrations(&pool).await;
    let app = create_test_app(test_config(), pool);

    let host = create_authenticated_user(&app, &TestUser::new()).await;
    let event = create_test_event(&app, &host, 50).await;

    confirm_rsvp(&app, &host.token, event["id"].as_str().unwrap()).await;

    let notifications = list_notifications(&app, &host.token).await;
    assert!(notifications.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_mark_notification_read() {
    let pool = create_test_pool().await;
    run_migrations(&pool).await;
    let app = create_test_app(test_config(), pool);

    let host = create_authenticated_user(&app, &TestUser::new()).await;
    let attendee = create_authenticated_user(&app, &TestUser::new()).await;
    let event = create_test_event(&app, &host, 50).await;

    confirm_rsvp(&app, &attendee.token, event["id"].as_str().unwrap()).await;

    let notifications = list_notifications(&app, &host.token).await;
    let notification_id = notifications[0]["id"].as_str().unwrap().to_string();

    let response = app
        .clone()
        .oneshot(json_request_with_auth(
            Method::PUT,
            &format!("/api/v1/notifications/{}/read", notification_id),
            serde_json::json!({}),
            &host.token,
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = parse_response_body(response).await;
    assert!(json["is_read"].as_bool().unwrap());
}

#[tokio::test]
async fn test_mark_all_notifications_read() {
    let pool = create_test_pool().await;
    run_migrations(&pool).await;
    let app = create_test_app(test_config(), pool);

    let host = create_authenticated_user(&app, &TestUser::new()).await;
    let event_a = create_test_event(&app, &host, 50).await;
    let event_b = create_test_event(&app, &host, 50).await;

    for event in [&event_a, &event_b] {
        let attendee = create_authenticated_user(&app, &TestUser::new()).await;
        confirm_rsvp(&app, &attendee.token, event["id"].as_str().unwrap()).await;
    }

    let response = app
        .clone()
        .oneshot(json_request_with_auth(
            Method::PUT,
            "/api/v1/notifications/read-all",
            serde_json::json!({}),
            &host.token,
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = parse_response_body(response).await;
    assert_eq!(json["marked_read"].as_i64().unwrap(), 2);

    let notifications = list_notifications(&app, &host.token).await;
    assert!(notifications
        .as_array()
        .unwrap()
        .iter()
        .all(|n| n["is_read"].as_bool().unwrap()));
}

#[tokio::test]
async fn test_delete_notification() {
    let pool = create_test_pool().await;
    run_migrations(&pool).await;
    let app = create_test_app(test_config(), pool);

    let host = create_authenticated_user(&app, &TestUser::new()).await;
    let attendee = create_authenticated_user(&app, &TestUser::new()).await;
    let event = create_test_event(&app, &host, 50).await;

    confirm_rsvp(&app, &attendee.token, event["id"].as_str().unwrap()).await;

    let notifications = list_notifications(&app, &host.token).await;
    let notification_id = notifications[0]["id"].as_str().unwrap().to_string();

    let response = app
        .clone()
        .oneshot(delete_request_with_auth(
            &format!("/api/v1/notifications/{}", notification_id),
            &host.token,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let notifications = list_notifications(&app, &host.token).await;
    assert!(notifications.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_foreign_notification_is_not_found() {
    let pool = create_test_pool().await;
    run_migrations(&pool).await;
    let app = create_test_app(test_config(), pool);

    let host = create_authenticated_user(&app, &TestUser::new()).await;
    let attendee = create_authenticated_user(&app, &TestUser::new()).await;
    let other = create_authenticated_user(&app, &TestUser::new()).await;
    let event = create_test_event(&app, &host, 50).await;

    confirm_rsvp(&app, &attendee.token, event["id"].as_str().unwrap()).await;

    let notifications = list_notifications(&app, &host.token).await;
    let notification_id = notifications[0]["id"].as_str().unwrap().to_string();

    // Another user can neither read-mark nor delete it
    let response = app
        .clone()
        .oneshot(json_request_with_auth(
            Method::PUT,
            &format!("/api/v1/notifications/{}/read", notification_id),
            serde_json::json!({}),
            &other.token,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = app
        .clone()
        .oneshot(delete_request_with_auth(
            &format!("/api/v1/notifications/{}", notification_id),
            &other.token,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
