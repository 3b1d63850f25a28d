//! Integration tests for the check-in endpoints.

mod common;

use axum::http::{Method, StatusCode};
use common::*;
use tower::ServiceExt;

async fn rsvp(app: &axum::Router, token: &str, event_id: &str, status: &str) {
    let response = app
        .clone()
        .oneshot(json_request_with_auth(
            Method::POST,
            "/api/v1/rsvps",
            serde_json::json!({
                "event_id": event_id,
                "status": status,
                "guest_count": 1
            }),
            token,
        ))
        .await
        .unwrap();
    assert!(response.status().is_success());
}

async fn issue_token(app: &axum::Router, token: &str, event_id: &str) -> String {
    let response = app
        .clone()
        .oneshot(get_request_with_auth(
            &format!("/api/v1/checkin/events/{}/token", event_id),
            token,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json = parse_response_body(response).await;
    json["token"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn test_host_can_issue_token() {
    let pool = create_test_pool().await;
    run_migrations(&pool).await;
    let app = create_test_app(test_config(), pool);

    let host = create_authenticated_user(&app, &TestUser::new()).await;
    let event = create_test_event(&app, &host, 50).await;
    let event_id = event["id"].as_str().unwrap();

    let checkin_token = issue_token(&app, &host.token, event_id).await;
    assert!(checkin_token.contains('.'));
    // The event id is not readable from the opaque token
    assert!(!checkin_token.contains(event_id));
}

#[tokio::test]
async fn test_non_host_cannot_issue_token() {
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
                "/api/v1/checkin/events/{}/token",
                event["id"].as_str().unwrap()
            ),
            &other.token,
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_admin_can_issue_token_for_any_event() {
    let pool = create_test_pool().await;
    run_migrations(&pool).await;
    let app = create_test_app(test_config(), pool.clone());

    let host = create_authenticated_user(&app, &TestUser::new()).await;
    let admin = create_authenticated_user(&app, &TestUser::new()).await;
    promote_to_admin(&pool, &admin.user_id).await;
    let event = create_test_event(&app, &host, 50).await;

    let checkin_token = issue_token(&app, &admin.token, event["id"].as_str().unwrap()).await;
    assert!(!checkin_token.is_empty());
}

#[tokio::test]
async fn test_issue_token_unknown_event_not_found() {
    let pool = create_test_pool().await;
    run_migrations(&pool).await;
    let app = create_test_app(test_config(), pool);

    let user = create_authenticated_user(&app, &TestUser::new()).await;

    let response = app
        .clone()
        .oneshot(get_request_with_auth(
            &format!("/api/v1/checkin/events/{}/token", uuid::Uuid::new_v4()),
            &user.token,
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_redeem_with_confirmed_rsvp_checks_in() {
    let pool = create_test_pool().await;
    run_migrations(&pool).await;
    let app = create_test_app(test_config(), pool);

    let host = create_authenticated_user(&app, &TestUser::new()).await;
    let attendee = create_authenticated_user(&app, &TestUser::new()).await;
    let event = create_test_event(&app, &host, 50).await;
    let event_id = event["id"].as_str().unwrap();

    rsvp(&app, &attendee.token, event_id, "confirmed").await;
    let checkin_token = issue_token(&app, &host.token, event_id).await;

    let response = app
        .clone()
        .oneshot(json_request_with_auth(
            Method::POST,
            "/api/v1/checkin",
            serde_json::json!({ "token": checkin_token }),
            &attendee.token,
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = parse_response_body(response).await;
    assert_eq!(json["event_id"].as_str().unwrap(), event_id);
    assert!(json["checked_in_at"].is_string());

    // The RSVP now carries the check-in flag
    let response = app
        .clone()
        .oneshot(get_request_with_auth("/api/v1/rsvps/user", &attendee.token))
        .await
        .unwrap();
    let rsvps = parse_response_body(response).await;
    assert!(rsvps[0]["checked_in"].as_bool().unwrap());
}

#[tokio::test]
async fn test_redeem_is_idempotent() {
    let pool = create_test_pool().await;
    run_migrations(&pool).await;
    let app = create_test_app(test_config(), pool);

    let host = create_authenticated_user(&app, &TestUser::new()).await;
    let attendee = create_authenticated_user(&app, &TestUser::new()).await;
    let event = create_test_event(&app, &host, 50).await;
    let event_id = event["id"].as_str().unwrap();

    rsvp(&app, &attendee.token, event_id, "confirmed").await;
    let checkin_token = issue_token(&app, &host.token, event_id).await;

    for _ in 0..2 {
        let response = app
            .clone()
            .oneshot(json_request_with_auth(
                Method::POST,
                "/api/v1/checkin",
                serde_json::json!({ "token": checkin_token }),
                &attendee.token,
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }
}

#[tokio::test]
async fn test_redeem_without_confirmed_rsvp_fails_without_side_effect() {
    let pool = create_test_pool().await;
    run_migrations(&pool).await;
    let app = create_test_app(test_config(), pool.clone());

    let host = create_authenticated_user(&app, &TestUser::new()).await;
    let attendee = create_authenticated_user(&app, &TestUser::new()).await;
    let event = create_test_event(&app, &host, 50).await;
    let event_id = event["id"].as_str().unwrap();

    // A pending RSVP is not a ticket
    rsvp(&app, &attendee.token, event_id, "pending").await;
    let checkin_token = issue_token(&app, &host.token, event_id).await;

    let response = app
        .clone()
        .oneshot(json_request_with_auth(
            Method::POST,
            "/api/v1/checkin",
            serde_json::json!({ "token": checkin_token }),
            &attendee.token,
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = parse_response_body(response).await;
    assert!(json["message"]
        .as_str()
        .unwrap()
        .contains("must RSVP to check in"));

    // The checked-in flag was not set
    let checked_in: bool = sqlx::query_scalar(
        "SELECT checked_in FROM rsvps WHERE user_id = $1::uuid AND event_id = $2::uuid",
    )
    .bind(&attendee.user_id)
    .bind(event_id)
    .fetch_one(&pool)
    .await
    .unwrap();
    assert!(!checked_in);
}

#[tokio::test]
async fn test_redeem_tampered_token_unauthorized_without_side_effect() {
    let pool = create_test_pool().await;
    run_migrations(&pool).await;
    let app = create_test_app(test_config(), pool.clone());

    let host = create_authenticated_user(&app, &TestUser::new()).await;
    let attendee = create_authenticated_user(&app, &TestUser::new()).await;
    let event = create_test_event(&app, &host, 50).await;
    let event_id = event["id"].as_str().unwrap();

    rsvp(&app, &attendee.token, event_id, "confirmed").await;
    let checkin_token = issue_token(&app, &host.token, event_id).await;

    // Corrupt the signature half of the token
    let (payload, signature) = checkin_token.split_once('.').unwrap();
    let flipped = if signature.starts_with('0') { "1" } else { "0" };
    let tampered = format!("{}.{}{}", payload, flipped, &signature[1..]);

    let response = app
        .clone()
        .oneshot(json_request_with_auth(
            Method::POST,
            "/api/v1/checkin",
            serde_json::json!({ "token": tampered }),
            &attendee.token,
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let checked_in: bool = sqlx::query_scalar(
        "SELECT checked_in FROM rsvps WHERE user_id = $1::uuid AND event_id = $2::uuid",
    )
    .bind(&attendee.user_id)
    .bind(event_id)
    .fetch_one(&pool)
    .await
    .unwrap();
    assert!(!checked_in);
}

#[tokio::test]
async fn test_redeem_for_deleted_event_not_found() {
    let pool = create_test_pool().await;
    run_migrations(&pool).await;
    let app = create_test_app(test_config(), pool);

    let host = create_authenticated_user(&app, &TestUser::new()).await;
    let event = create_test_event(&app, &host, 50).await;
    let event_id = event["id"].as_str().unwrap();

    let checkin_token = issue_token(&app, &host.token, event_id).await;

    // Token outlives the event
    let response = app
        .clone()
        .oneshot(delete_request_with_auth(
            &format!("/api/v1/events/{}", event_id),
            &host.token,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = app
        .clone()
        .oneshot(json_request_with_auth(
            Method::POST,
            "/api/v1/checkin",
            serde_json::json!({ "token": checkin_token }),
            &host.token,
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
