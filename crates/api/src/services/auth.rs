//! Authentication service for registration, login, and password reset.

use chrono::{Duration, Utc};
use sqlx::PgPool;
use thiserror::Error;
use uuid::Uuid;

use domain::models::User;
use persistence::repositories::UserRepository;
use shared::crypto::{generate_reset_token, sha256_hex};
use shared::jwt::{JwtConfig, JwtError};
use shared::password::{hash_password, verify_password, PasswordError};

use crate::config::JwtAuthConfig;

/// Lifetime of a password-reset token.
const RESET_TOKEN_TTL_HOURS: i64 = 1;

/// Errors that can occur during authentication operations.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Email already registered")]
    EmailAlreadyExists,

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("User not found")]
    UserNotFound,

    #[error("Invalid or expired reset token")]
    InvalidResetToken,

    #[error("Token error: {0}")]
    TokenError(#[from] JwtError),

    #[error("Password error: {0}")]
    PasswordError(#[from] PasswordError),

    #[error("Database error: {0}")]
    DatabaseError(#[from] sqlx::Error),
}

/// Result of a successful registration or login.
#[derive(Debug, Clone)]
pub struct AuthResult {
    pub user: User,
    pub token: String,
}

/// Authentication service.
pub struct AuthService {
    users: UserRepository,
    jwt_config: JwtConfig,
}

impl AuthService {
    /// Creates a new AuthService with the given database pool and JWT
    /// configuration.
    pub fn new(pool: PgPool, jwt_config: &JwtAuthConfig) -> Self {
        Self {
            users: UserRepository::new(pool),
            jwt_config: JwtConfig::with_leeway(
                &jwt_config.secret,
                jwt_config.token_expiry_secs,
                jwt_config.leeway_secs,
            ),
        }
    }

    /// Registers a new account and issues a bearer token.
    pub async fn register(
        &self,
        name: &str,
        email: &str,
        password: &str,
    ) -> Result<AuthResult, AuthError> {
        if self.users.find_by_email(email).await?.is_some() {
            return Err(AuthError::EmailAlreadyExists);
        }

        let password_hash = hash_password(password)?;
        let entity = self.users.create_user(name, email, &password_hash).await?;

        let token = self.jwt_config.generate_token(entity.id)?;

        Ok(AuthResult {
            user: entity.into(),
            token,
        })
    }

    /// Verifies credentials and issues a bearer token.
    ///
    /// Unknown email and wrong password fail identically so the response
    /// does not reveal which one was wrong.
    pub async fn login(&self, email: &str, password: &str) -> Result<AuthResult, AuthError> {
        let entity = self
            .users
            .find_by_email(email)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        let password_hash = entity
            .password_hash
            .as_deref()
            .ok_or(AuthError::InvalidCredentials)?;

        if !verify_password(password, password_hash)? {
            return Err(AuthError::InvalidCredentials);
        }

        let token = self.jwt_config.generate_token(entity.id)?;

        Ok(AuthResult {
            user: entity.into(),
            token,
        })
    }

    /// Loads the profile of an authenticated user.
    pub async fn current_user(&self, user_id: Uuid) -> Result<User, AuthError> {
        let entity = self
            .users
            .find_by_id(user_id)
            .await?
            .ok_or(AuthError::UserNotFound)?;
        Ok(entity.into())
    }

    /// Updates profile fields, rejecting an email that belongs to another
    /// account.
    #[allow(clippy::too_many_arguments)]
    pub async fn update_profile(
        &self,
        user_id: Uuid,
        name: &str,
        email: &str,
        bio: Option<&str>,
        phone: Option<&str>,
        address: Option<&str>,
        profile_picture_url: Option<&str>,
    ) -> Result<User, AuthError> {
        if let Some(existing) = self.users.find_by_email(email).await? {
            if existing.id != user_id {
                return Err(AuthError::EmailAlreadyExists);
            }
        }

        let entity = self
            .users
            .update_profile(user_id, name, email, bio, phone, address, profile_picture_url)
            .await?
            .ok_or(AuthError::UserNotFound)?;

        Ok(entity.into())
    }

    /// Starts a password reset for the given email.
    ///
    /// Returns the user and the raw reset token when the account exists;
    /// `None` otherwise so the caller can answer identically either way.
    pub async fn forgot_password(&self, email: &str) -> Result<Option<(User, String)>, AuthError> {
        let entity = match self.users.find_by_email(email).await? {
            Some(entity) => entity,
            None => return Ok(None),
        };

        let token = generate_reset_token();
        let expires_at = Utc::now() + Duration::hours(RESET_TOKEN_TTL_HOURS);

        self.users
            .set_password_reset_token(entity.id, &sha256_hex(&token), expires_at)
            .await?;

        Ok(Some((entity.into(), token)))
    }

    /// Completes a password reset with a previously issued token.
    pub async fn reset_password(&self, token: &str, new_password: &str) -> Result<(), AuthError> {
        let entity = self
            .users
            .find_by_reset_token(&sha256_hex(token))
            .await?
            .ok_or(AuthError::InvalidResetToken)?;

        let password_hash = hash_password(new_password)?;
        self.users.update_password(entity.id, &password_hash).await?;

        Ok(())
    }
}
