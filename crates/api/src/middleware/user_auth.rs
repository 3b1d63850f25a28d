//! Bearer token authentication middleware.
//!
//! Provides middleware for requiring JWT-based user authentication on
//! routes, plus an admin variant that resolves the caller's role from the
//! database.

use axum::{
    body::Body,
    extract::State,
    http::{Request, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use uuid::Uuid;

use crate::app::AppState;
use crate::config::JwtAuthConfig;
use persistence::repositories::UserRepository;
use shared::jwt::JwtConfig;

/// Authenticated user information extracted from the bearer token.
#[derive(Debug, Clone)]
pub struct AuthUser {
    /// User ID from the token subject claim.
    pub user_id: Uuid,
}

impl AuthUser {
    /// Validates a bearer token and returns the authenticated user.
    pub fn validate(jwt_config: &JwtConfig, token: &str) -> Result<Self, String> {
        let claims = jwt_config
            .validate_token(token)
            .map_err(|e| format!("Invalid token: {}", e))?;

        let user_id =
            Uuid::parse_str(&claims.sub).map_err(|_| "Invalid user ID in token".to_string())?;

        Ok(AuthUser { user_id })
    }

    /// Creates a JwtConfig from the application's JWT settings.
    pub fn create_jwt_config(config: &JwtAuthConfig) -> JwtConfig {
        JwtConfig::with_leeway(&config.secret, config.token_expiry_secs, config.leeway_secs)
    }
}

/// Extracts the bearer token from the Authorization header of a request.
fn bearer_token(req: &Request<Body>) -> Option<&str> {
    req.headers()
        .get("Authorization")
        .and_then(|v| v.to_str().ok())
        .and_then(|header| header.strip_prefix("Bearer "))
}

/// Middleware that requires bearer authentication.
///
/// Validates the token in the Authorization header and rejects requests
/// without a valid one. Authenticated user information is stored in request
/// extensions for downstream handlers.
pub async fn require_auth(
    State(state): State<AppState>,
    mut req: Request<Body>,
    next: Next,
) -> Response {
    let token = match bearer_token(&req) {
        Some(token) => token,
        None => return unauthorized_response("Missing or invalid Authorization header"),
    };

    let jwt_config = AuthUser::create_jwt_config(&state.config.jwt);

    match AuthUser::validate(&jwt_config, token) {
        Ok(auth) => {
            req.extensions_mut().insert(auth);
            next.run(req).await
        }
        Err(e) => {
            tracing::debug!("Token validation failed: {}", e);
            unauthorized_response("Invalid or expired token")
        }
    }
}

/// Middleware that requires bearer authentication with the admin role.
///
/// The role lives in the database rather than the token, so a lookup
/// resolves it on each request.
pub async fn require_admin(
    State(state): State<AppState>,
    mut req: Request<Body>,
    next: Next,
) -> Response {
    let token = match bearer_token(&req) {
        Some(token) => token,
        None => return unauthorized_response("Missing or invalid Authorization header"),
    };

    let jwt_config = AuthUser::create_jwt_config(&state.config.jwt);

    let auth = match AuthUser::validate(&jwt_config, token) {
        Ok(auth) => auth,
        Err(e) => {
            tracing::debug!("Token validation failed: {}", e);
            return unauthorized_response("Invalid or expired token");
        }
    };

    let user_repo = UserRepository::new(state.pool.clone());
    let user = match user_repo.find_by_id(auth.user_id).await {
        Ok(Some(user)) => user,
        Ok(None) => return unauthorized_response("Unknown user"),
        Err(e) => {
            tracing::error!("Failed to resolve user role: {}", e);
            return internal_error_response("Authentication service unavailable");
        }
    };

    let role: domain::models::user::UserRole = user.role.into();
    if !role.is_admin() {
        return forbidden_response("Admin access required");
    }

    req.extensions_mut().insert(auth);
    next.run(req).await
}

/// Helper to create an unauthorized response.
fn unauthorized_response(message: &str) -> Response {
    (
        StatusCode::UNAUTHORIZED,
        Json(json!({
            "error": "unauthorized",
            "message": message
        })),
    )
        .into_response()
}

/// Helper to create a forbidden response.
fn forbidden_response(message: &str) -> Response {
    (
        StatusCode::FORBIDDEN,
        Json(json!({
            "error": "forbidden",
            "message": message
        })),
    )
        .into_response()
}

/// Helper to create an internal error response.
fn internal_error_response(message: &str) -> Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({
            "error": "internal_error",
            "message": message
        })),
    )
        .into_response()
}
