//! User repository for database operations.

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::entities::UserEntity;
use crate::metrics::QueryTimer;

/// Repository for user-related database operations.
#[derive(Clone)]
pub struct UserRepository {
    pool: PgPool,
}

impl UserRepository {
    /// Creates a new UserRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Find a user by ID.
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<UserEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_user_by_id");
        let result = sqlx::query_as::<_, UserEntity>(
            r#"
            SELECT id, name, email, password_hash, role, bio, phone, address,
                   profile_picture_url, created_at, updated_at
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Find a user by email address.
    pub async fn find_by_email(&self, email: &str) -> Result<Option<UserEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_user_by_email");
        let result = sqlx::query_as::<_, UserEntity>(
            r#"
            SELECT id, name, email, password_hash, role, bio, phone, address,
                   profile_picture_url, created_at, updated_at
            FROM users
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Create a new user account.
    pub async fn create_user(
        &self,
        name: &str,
        email: &str,
        password_hash: &str,
    ) -> Result<UserEntity, sqlx::Error> {
        let timer = QueryTimer::new("create_user");
        let result = sqlx::query_as::<_, UserEntity>(
            r#"
            INSERT INTO users (name, email, password_hash)
            VALUES ($1, $2, $3)
            RETURNING id, name, email, password_hash, role, bio, phone, address,
                      profile_picture_url, created_at, updated_at
            "#,
        )
        .bind(name)
        .bind(email)
        .bind(password_hash)
        .fetch_one(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Update a user's profile fields.
    #[allow(clippy::too_many_arguments)]
    pub async fn update_profile(
        &self,
        id: Uuid,
        name: &str,
        email: &str,
        bio: Option<&str>,
        phone: Option<&str>,
        address: Option<&str>,
        profile_picture_url: Option<&str>,
    ) -> Result<Option<UserEntity>, sqlx::Error> {
        let timer = QueryTimer::new("update_user_profile");
        let result = sqlx::query_as::<_, UserEntity>(
            r#"
            UPDATE users
            SET name = $1, email = $2, bio = $3, phone = $4, address = $5,
                profile_picture_url = $6, updated_at = NOW()
            WHERE id = $7
            RETURNING id, name, email, password_hash, role, bio, phone, address,
                      profile_picture_url, created_at, updated_at
            "#,
        )
        .bind(name)
        .bind(email)
        .bind(bio)
        .bind(phone)
        .bind(address)
        .bind(profile_picture_url)
        .bind(id)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Replace the stored profile picture URL.
    pub async fn update_profile_picture(
        &self,
        id: Uuid,
        profile_picture_url: &str,
    ) -> Result<u64, sqlx::Error> {
        let timer = QueryTimer::new("update_user_profile_picture");
        let result = sqlx::query(
            r#"
            UPDATE users
            SET profile_picture_url = $1, updated_at = NOW()
            WHERE id = $2
            "#,
        )
        .bind(profile_picture_url)
        .bind(id)
        .execute(&self.pool)
        .await?;
        timer.record();
        Ok(result.rows_affected())
    }

    /// Store a password-reset token hash with its expiry.
    pub async fn set_password_reset_token(
        &self,
        id: Uuid,
        token_hash: &str,
        expires_at: DateTime<Utc>,
    ) -> Result<(), sqlx::Error> {
        let timer = QueryTimer::new("set_password_reset_token");
        sqlx::query(
            r#"
            UPDATE users
            SET password_reset_token_hash = $1, password_reset_expires_at = $2, updated_at = NOW()
            WHERE id = $3
            "#,
        )
        .bind(token_hash)
        .bind(expires_at)
        .bind(id)
        .execute(&self.pool)
        .await?;
        timer.record();
        Ok(())
    }

    /// Find a user by an unexpired password-reset token hash.
    pub async fn find_by_reset_token(
        &self,
        token_hash: &str,
    ) -> Result<Option<UserEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_user_by_reset_token");
        let result = sqlx::query_as::<_, UserEntity>(
            r#"
            SELECT id, name, email, password_hash, role, bio, phone, address,
                   profile_picture_url, created_at, updated_at
            FROM users
            WHERE password_reset_token_hash = $1 AND password_reset_expires_at > NOW()
            "#,
        )
        .bind(token_hash)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Replace the password hash and clear any pending reset token.
    pub async fn update_password(&self, id: Uuid, password_hash: &str) -> Result<(), sqlx::Error> {
        let timer = QueryTimer::new("update_user_password");
        sqlx::query(
            r#"
            UPDATE users
            SET password_hash = $1, password_reset_token_hash = NULL,
                password_reset_expires_at = NULL, updated_at = NOW()
            WHERE id = $2
            "#,
        )
        .bind(password_hash)
        .bind(id)
        .execute(&self.pool)
        .await?;
        timer.record();
        Ok(())
    }
}
