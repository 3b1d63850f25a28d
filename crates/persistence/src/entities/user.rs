//! User entity (database row mapping).

use chrono::{DateTime, Utc};
use domain::models::user::UserRole;
use sqlx::FromRow;
use uuid::Uuid;

/// Database enum that maps to the PostgreSQL `user_role` type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "user_role", rename_all = "lowercase")]
pub enum UserRoleDb {
    User,
    Admin,
}

impl From<UserRoleDb> for UserRole {
    fn from(db_role: UserRoleDb) -> Self {
        match db_role {
            UserRoleDb::User => UserRole::User,
            UserRoleDb::Admin => UserRole::Admin,
        }
    }
}

impl From<UserRole> for UserRoleDb {
    fn from(role: UserRole) -> Self {
        match role {
            UserRole::User => UserRoleDb::User,
            UserRole::Admin => UserRoleDb::Admin,
        }
    }
}

/// Database row mapping for the users table.
#[derive(Debug, Clone, FromRow)]
pub struct UserEntity {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub password_hash: Option<String>,
    pub role: UserRoleDb,
    pub bio: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub profile_picture_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<UserEntity> for domain::models::User {
    fn from(entity: UserEntity) -> Self {
        Self {
            id: entity.id,
            name: entity.name,
            email: entity.email,
            password_hash: entity.password_hash,
            role: entity.role.into(),
            bio: entity.bio,
            phone: entity.phone,
            address: entity.address,
            profile_picture_url: entity.profile_picture_url,
            created_at: entity.created_at,
            updated_at: entity.updated_at,
        }
    }
}
