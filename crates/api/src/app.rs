use axum::{
    extract::DefaultBodyLimit,
    middleware,
    routing::{delete, get, post, put},
    Router,
};
use sqlx::PgPool;
use std::sync::Arc;
use std::time::Duration;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    services::ServeDir,
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::Config;
use crate::middleware::{
    metrics_handler, metrics_middleware, rate_limit_middleware, require_admin, require_auth,
    trace_id, RateLimiterState,
};
use crate::routes::{admin, auth, checkin, events, export, health, notifications, rsvps, upload};

#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub config: Arc<Config>,
    pub rate_limiter: Option<Arc<RateLimiterState>>,
}

pub fn create_app(config: Config, pool: PgPool) -> Router {
    let config = Arc::new(config);

    // Create rate limiter if rate limiting is enabled (rate_limit_per_minute > 0)
    let rate_limiter = if config.security.rate_limit_per_minute > 0 {
        Some(Arc::new(RateLimiterState::new(
            config.security.rate_limit_per_minute,
        )))
    } else {
        None
    };

    let state = AppState {
        pool,
        config: config.clone(),
        rate_limiter,
    };

    // Build CORS layer based on configuration
    let cors = if config.security.cors_origins.is_empty() {
        // Default: allow any origin (for development)
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        // Production: only allow specified origins
        use tower_http::cors::AllowOrigin;
        let origins: Vec<_> = config
            .security
            .cors_origins
            .iter()
            .filter_map(|o| o.parse().ok())
            .collect();
        CorsLayer::new()
            .allow_origin(AllowOrigin::list(origins))
            .allow_methods(Any)
            .allow_headers(Any)
    };

    // Public routes (no authentication required)
    let public_routes = Router::new()
        .route("/api/health", get(health::health_check))
        .route("/api/health/ready", get(health::ready))
        .route("/api/health/live", get(health::live))
        .route("/metrics", get(metrics_handler))
        // Identity lifecycle
        .route("/api/v1/auth/register", post(auth::register))
        .route("/api/v1/auth/login", post(auth::login))
        .route("/api/v1/auth/forgot-password", post(auth::forgot_password))
        .route("/api/v1/auth/reset-password", post(auth::reset_password))
        // Public event listing and detail
        .route("/api/v1/events", get(events::list_public_events))
        .route("/api/v1/events/:id", get(events::get_event));

    // Protected routes (require bearer authentication)
    // Middleware order: auth runs first, then rate limiting (keyed by user id)
    let protected_routes = Router::new()
        // Profile
        .route("/api/v1/auth/me", get(auth::me))
        .route("/api/v1/auth/profile", put(auth::update_profile))
        // Event management
        .route("/api/v1/events", post(events::create_event))
        .route("/api/v1/events/:id", put(events::update_event))
        .route("/api/v1/events/:id", delete(events::delete_event))
        .route("/api/v1/events/user/events", get(events::list_my_events))
        // RSVPs
        .route("/api/v1/rsvps", post(rsvps::create_or_update_rsvp))
        .route("/api/v1/rsvps/user", get(rsvps::list_my_rsvps))
        .route("/api/v1/rsvps/:id", put(rsvps::update_rsvp))
        // Check-in
        .route(
            "/api/v1/checkin/events/:id/token",
            get(checkin::issue_token),
        )
        .route("/api/v1/checkin", post(checkin::redeem_token))
        // Attendee export
        .route(
            "/api/v1/export/events/:id/attendees",
            get(export::export_attendees),
        )
        // Notifications
        .route("/api/v1/notifications", get(notifications::list_notifications))
        .route(
            "/api/v1/notifications/read-all",
            put(notifications::mark_all_read),
        )
        .route(
            "/api/v1/notifications/:id/read",
            put(notifications::mark_read),
        )
        .route(
            "/api/v1/notifications/:id",
            delete(notifications::delete_notification),
        )
        // Rate limiting runs after auth (needs the user id from auth)
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            rate_limit_middleware,
        ))
        // Auth runs first (outermost layer = runs first)
        .route_layer(middleware::from_fn_with_state(state.clone(), require_auth));

    // Upload routes: authenticated, with a raised body limit for multipart
    // image payloads (the per-file cap is enforced in the handler).
    let upload_routes = Router::new()
        .route("/api/v1/uploads/event-image", post(upload::upload_event_image))
        .route(
            "/api/v1/uploads/profile-picture",
            post(upload::upload_profile_picture),
        )
        .route_layer(DefaultBodyLimit::max(
            config.uploads.max_file_bytes + 64 * 1024,
        ))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            rate_limit_middleware,
        ))
        .route_layer(middleware::from_fn_with_state(state.clone(), require_auth));

    // Admin routes (require the admin role)
    let admin_routes = Router::new()
        .route("/api/v1/admin/stats", get(admin::overall_stats))
        .route("/api/v1/admin/events/stats", get(admin::event_stats))
        .route("/api/v1/admin/users/activity", get(admin::user_activity))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            rate_limit_middleware,
        ))
        .route_layer(middleware::from_fn_with_state(state.clone(), require_admin));

    // Merge all routes
    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .merge(upload_routes)
        .merge(admin_routes)
        // Uploaded images are served directly from disk
        .nest_service("/uploads", ServeDir::new(&config.uploads.dir))
        // Global middleware (order matters: bottom layers run first)
        .layer(CompressionLayer::new())
        .layer(TimeoutLayer::new(Duration::from_secs(
            config.server.request_timeout_secs,
        )))
        .layer(middleware::from_fn(metrics_middleware)) // Prometheus metrics
        .layer(TraceLayer::new_for_http())
        .layer(middleware::from_fn(trace_id)) // Request ID and logging
        .layer(cors)
        .with_state(state)
}
