//! Authentication routes for registration, login, profile management, and
//! password reset.

use axum::{extract::State, http::StatusCode, Json};
use serde::Serialize;
use tracing::{info, warn};
use validator::Validate;

use domain::models::user::{
    ForgotPasswordRequest, LoginRequest, RegisterRequest, ResetPasswordRequest,
    UpdateProfileRequest, UserProfile,
};

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::CurrentUser;
use crate::services::auth::{AuthError, AuthService};
use crate::services::email::EmailService;

/// Response body for successful registration or login.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct AuthResponse {
    pub token: String,
    pub user: UserProfile,
}

/// Generic acknowledgement body.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct MessageResponse {
    pub message: String,
}

fn map_auth_error(err: AuthError) -> ApiError {
    match err {
        AuthError::EmailAlreadyExists => ApiError::Conflict("Email already registered".to_string()),
        AuthError::InvalidCredentials => ApiError::Unauthorized("Invalid credentials".to_string()),
        AuthError::UserNotFound => ApiError::NotFound("User not found".to_string()),
        AuthError::InvalidResetToken => {
            ApiError::Validation("Invalid or expired reset token".to_string())
        }
        AuthError::DatabaseError(db_err) => ApiError::from(db_err),
        AuthError::TokenError(e) => ApiError::Internal(format!("Token error: {}", e)),
        AuthError::PasswordError(e) => ApiError::Internal(format!("Password error: {}", e)),
    }
}

/// Register a new user with email and password.
///
/// POST /api/v1/auth/register
pub async fn register(
    State(state): State<AppState>,
    Json(request): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<AuthResponse>), ApiError> {
    request.validate()?;

    let auth_service = AuthService::new(state.pool.clone(), &state.config.jwt);

    let result = auth_service
        .register(&request.name, &request.email, &request.password)
        .await
        .map_err(map_auth_error)?;

    info!(user_id = %result.user.id, "User registered");

    // Welcome email is fire-and-forget: the registration response never
    // waits on (or fails with) the mail transport.
    let email_service = EmailService::new(state.config.email.clone());
    let to_email = result.user.email.clone();
    let to_name = result.user.name.clone();
    tokio::spawn(async move {
        if let Err(e) = email_service.send_welcome_email(&to_email, &to_name).await {
            warn!(to = %to_email, "Failed to send welcome email: {}", e);
        }
    });

    Ok((
        StatusCode::CREATED,
        Json(AuthResponse {
            token: result.token,
            user: result.user.into(),
        }),
    ))
}

/// Log in with email and password.
///
/// POST /api/v1/auth/login
pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<AuthResponse>, ApiError> {
    request.validate()?;

    let auth_service = AuthService::new(state.pool.clone(), &state.config.jwt);

    let result = auth_service
        .login(&request.email, &request.password)
        .await
        .map_err(map_auth_error)?;

    info!(user_id = %result.user.id, "User logged in");

    Ok(Json(AuthResponse {
        token: result.token,
        user: result.user.into(),
    }))
}

/// Get the current user's profile.
///
/// GET /api/v1/auth/me
pub async fn me(
    State(state): State<AppState>,
    current_user: CurrentUser,
) -> Result<Json<UserProfile>, ApiError> {
    let auth_service = AuthService::new(state.pool.clone(), &state.config.jwt);

    let user = auth_service
        .current_user(current_user.user_id)
        .await
        .map_err(map_auth_error)?;

    Ok(Json(user.into()))
}

/// Update the current user's profile.
///
/// PUT /api/v1/auth/profile
pub async fn update_profile(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Json(request): Json<UpdateProfileRequest>,
) -> Result<Json<UserProfile>, ApiError> {
    request.validate()?;

    let auth_service = AuthService::new(state.pool.clone(), &state.config.jwt);

    let user = auth_service
        .update_profile(
            current_user.user_id,
            &request.name,
            &request.email,
            request.bio.as_deref(),
            request.phone.as_deref(),
            request.address.as_deref(),
            request.profile_picture_url.as_deref(),
        )
        .await
        .map_err(map_auth_error)?;

    info!(user_id = %current_user.user_id, "Profile updated");

    Ok(Json(user.into()))
}

/// Start a password reset.
///
/// POST /api/v1/auth/forgot-password
///
/// Always answers 200 with a generic message so the endpoint does not
/// reveal whether an email is registered.
pub async fn forgot_password(
    State(state): State<AppState>,
    Json(request): Json<ForgotPasswordRequest>,
) -> Result<Json<MessageResponse>, ApiError> {
    request.validate()?;

    let auth_service = AuthService::new(state.pool.clone(), &state.config.jwt);

    match auth_service.forgot_password(&request.email).await {
        Ok(Some((user, reset_token))) => {
            // The reset token is already stored; a failed send is logged
            // and does not roll it back.
            let email_service = EmailService::new(state.config.email.clone());
            if let Err(e) = email_service
                .send_password_reset_email(
                    &user.email,
                    &user.name,
                    &reset_token,
                    &state.config.server.app_base_url,
                )
                .await
            {
                warn!(to = %user.email, "Failed to send password reset email: {}", e);
            }
        }
        Ok(None) => {
            info!(email = %request.email, "Password reset requested for unknown email");
        }
        Err(e) => return Err(map_auth_error(e)),
    }

    Ok(Json(MessageResponse {
        message: "If that email is registered, a reset link has been sent".to_string(),
    }))
}

/// Complete a password reset.
///
/// POST /api/v1/auth/reset-password
pub async fn reset_password(
    State(state): State<AppState>,
    Json(request): Json<ResetPasswordRequest>,
) -> Result<Json<MessageResponse>, ApiError> {
    request.validate()?;

    let auth_service = AuthService::new(state.pool.clone(), &state.config.jwt);

    auth_service
        .reset_password(&request.token, &request.new_password)
        .await
        .map_err(map_auth_error)?;

    Ok(Json(MessageResponse {
        message: "Password updated".to_string(),
    }))
}
