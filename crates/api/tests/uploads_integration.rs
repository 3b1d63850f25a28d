//! Integration tests for the image upload endpoints.

mod common;

use axum::http::StatusCode;
use common::*;
use tower::ServiceExt;

const BOUNDARY: &str = "integration-test-boundary";

// Minimal valid PNG header bytes; the server only checks the MIME type
const PNG_BYTES: &[u8] = &[0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A];

fn multipart_request(
    uri: &str,
    token: &str,
    field_name: &str,
    content_type: &str,
    data: &[u8],
) -> axum::http::Request<axum::body::Body> {
    use axum::{body::Body, http::{header, Method, Request}};

    let mut body = Vec::new();
    body.extend_from_slice(
        format!(
            "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{field_name}\"; \
             filename=\"upload.bin\"\r\nContent-Type: {content_type}\r\n\r\n"
        )
        .as_bytes(),
    );
    body.extend_from_slice(data);
    body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());

    Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .header(header::AUTHORIZATION, format!("Bearer {}", token))
        .body(Body::from(body))
        .unwrap()
}

#[tokio::test]
async fn test_upload_event_image() {
    let pool = create_test_pool().await;
    run_migrations(&pool).await;
    let config = test_config();
    let uploads_dir = config.uploads.dir.clone();
    let app = create_test_app(config, pool);

    let user = create_authenticated_user(&app, &TestUser::new()).await;

    let response = app
        .clone()
        .oneshot(multipart_request(
            "/api/v1/uploads/event-image",
            &user.token,
            "image",
            "image/png",
            PNG_BYTES,
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = parse_response_body(response).await;
    let image_url = json["image_url"].as_str().unwrap();
    assert!(image_url.starts_with("/uploads/event-"));
    assert!(image_url.ends_with(".png"));

    // The file landed on disk
    let filename = image_url.strip_prefix("/uploads/").unwrap();
    let stored = std::path::Path::new(&uploads_dir).join(filename);
    assert_eq!(std::fs::read(stored).unwrap(), PNG_BYTES);
}

#[tokio::test]
async fn test_upload_rejects_non_image() {
    let pool = create_test_pool().await;
    run_migrations(&pool).await;
    let app = create_test_app(test_config(), pool);

    let user = create_authenticated_user(&app, &TestUser::new()).await;

    let response = app
        .clone()
        .oneshot(multipart_request(
            "/api/v1/uploads/event-image",
            &user.token,
            "image",
            "application/pdf",
            b"%PDF-1.4",
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_upload_rejects_missing_file() {
    let pool = create_test_pool().await;
    run_migrations(&pool).await;
    let app = create_test_app(test_config(), pool);

    let user = create_authenticated_user(&app, &TestUser::new()).await;

    // Wrong field name: no "image" field in the form
    let response = app
        .clone()
        .oneshot(multipart_request(
            "/api/v1/uploads/event-image",
            &user.token,
            "attachment",
            "image/png",
            PNG_BYTES,
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_upload_requires_auth() {
    let pool = create_test_pool().await;
    run_migrations(&pool).await;
    let app = create_test_app(test_config(), pool);

    let mut request = multipart_request(
        "/api/v1/uploads/event-image",
        "irrelevant",
        "image",
        "image/png",
        PNG_BYTES,
    );
    request.headers_mut().remove(axum::http::header::AUTHORIZATION);

    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_profile_picture_updates_user() {
    let pool = create_test_pool().await;
    run_migrations(&pool).await;
    let app = create_test_app(test_config(), pool);

    let user = create_authenticated_user(&app, &TestUser::new()).await;

    let response = app
        .clone()
        .oneshot(multipart_request(
            "/api/v1/uploads/profile-picture",
            &user.token,
            "image",
            "image/jpeg",
            PNG_BYTES,
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = parse_response_body(response).await;
    let image_url = json["image_url"].as_str().unwrap().to_string();
    assert!(image_url.starts_with("/uploads/profile-"));

    // The profile now references the stored picture
    let response = app
        .clone()
        .oneshot(get_request_with_auth("/api/v1/auth/me", &user.token))
        .await
        .unwrap();
    let me = parse_response_body(response).await;
    assert_eq!(me["profile_picture_url"].as_str().unwrap(), image_url);
}
