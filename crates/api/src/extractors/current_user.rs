//! Authenticated-user extractor.
//!
//! Provides an Axum extractor for the identity established by the bearer
//! token. Routes behind the auth middleware get the identity from request
//! extensions; the extractor also validates the token directly so handlers
//! can be exercised without the middleware in tests.

use axum::{async_trait, extract::FromRequestParts, http::request::Parts, RequestPartsExt};
use axum_extra::{
    headers::{authorization::Bearer, Authorization},
    TypedHeader,
};
use uuid::Uuid;

use crate::app::AppState;
use crate::error::ApiError;
use crate::middleware::user_auth::AuthUser;

/// The authenticated caller.
#[derive(Debug, Clone)]
pub struct CurrentUser {
    /// User ID from the token subject claim.
    pub user_id: Uuid,
}

impl From<AuthUser> for CurrentUser {
    fn from(auth: AuthUser) -> Self {
        Self {
            user_id: auth.user_id,
        }
    }
}

#[async_trait]
impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        // Auth middleware normally runs first and stores the identity
        if let Some(auth) = parts.extensions.get::<AuthUser>() {
            return Ok(auth.clone().into());
        }

        // Otherwise, extract and validate the bearer token directly
        let TypedHeader(Authorization(bearer)) = parts
            .extract::<TypedHeader<Authorization<Bearer>>>()
            .await
            .map_err(|_| {
                ApiError::Unauthorized("Missing or invalid Authorization header".to_string())
            })?;

        let jwt_config = AuthUser::create_jwt_config(&state.config.jwt);

        let auth = AuthUser::validate(&jwt_config, bearer.token())
            .map_err(|_| ApiError::Unauthorized("Invalid or expired token".to_string()))?;

        Ok(auth.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_current_user_from_auth_user() {
        let auth = AuthUser {
            user_id: Uuid::new_v4(),
        };
        let current: CurrentUser = auth.clone().into();
        assert_eq!(current.user_id, auth.user_id);
    }

    #[test]
    fn test_current_user_debug() {
        let current = CurrentUser {
            user_id: Uuid::new_v4(),
        };
        let debug_str = format!("{:?}", current);
        assert!(debug_str.contains("CurrentUser"));
        assert!(debug_str.contains("user_id"));
    }
}
