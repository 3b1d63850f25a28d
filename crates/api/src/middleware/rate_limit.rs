//! Rate limiting middleware.
//!
//! Provides per-user rate limiting on authenticated routes using a
//! sliding-window quota.

use axum::{
    body::Body,
    extract::State,
    http::{header, Request, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use governor::{
    clock::DefaultClock,
    state::{InMemoryState, NotKeyed},
    Quota, RateLimiter as GovRateLimiter,
};
use serde_json::json;
use std::{
    collections::HashMap,
    num::NonZeroU32,
    sync::{Arc, RwLock},
};
use uuid::Uuid;

use crate::app::AppState;
use crate::middleware::user_auth::AuthUser;

/// Type alias for the rate limiter used per user.
type UserRateLimiter = GovRateLimiter<NotKeyed, InMemoryState, DefaultClock>;

/// Rate limiter state shared across all requests.
/// Uses a HashMap keyed by user id with individual rate limiters.
pub struct RateLimiterState {
    limiters: RwLock<HashMap<Uuid, Arc<UserRateLimiter>>>,
    rate_limit_per_minute: u32,
}

impl RateLimiterState {
    /// Create a new rate limiter state with the specified limit per minute.
    pub fn new(rate_limit_per_minute: u32) -> Self {
        Self {
            limiters: RwLock::new(HashMap::new()),
            rate_limit_per_minute,
        }
    }

    /// Get or create a rate limiter for the given user.
    fn get_or_create_limiter(&self, user_id: Uuid) -> Arc<UserRateLimiter> {
        // First try to get an existing limiter with the read lock
        {
            let limiters = self.limiters.read().unwrap();
            if let Some(limiter) = limiters.get(&user_id) {
                return limiter.clone();
            }
        }

        let mut limiters = self.limiters.write().unwrap();

        // Double-check in case another thread created it
        if let Some(limiter) = limiters.get(&user_id) {
            return limiter.clone();
        }

        let quota = Quota::per_minute(
            NonZeroU32::new(self.rate_limit_per_minute).unwrap_or(NonZeroU32::new(100).unwrap()),
        );
        let limiter = Arc::new(GovRateLimiter::direct(quota));
        limiters.insert(user_id, limiter.clone());
        limiter
    }

    /// Check if a request from the given user should be allowed.
    /// Returns Ok(()) if allowed, or Err with retry_after seconds if rate
    /// limited.
    pub fn check(&self, user_id: Uuid) -> Result<(), u64> {
        let limiter = self.get_or_create_limiter(user_id);

        match limiter.check() {
            Ok(_) => Ok(()),
            Err(not_until) => {
                let wait_time = not_until.wait_time_from(governor::clock::Clock::now(
                    &governor::clock::DefaultClock::default(),
                ));
                Err(wait_time.as_secs().max(1))
            }
        }
    }
}

impl std::fmt::Debug for RateLimiterState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RateLimiterState")
            .field("rate_limit_per_minute", &self.rate_limit_per_minute)
            .field("active_limiters", &self.limiters.read().unwrap().len())
            .finish()
    }
}

/// Middleware that applies rate limiting per authenticated user.
///
/// This middleware must run AFTER authentication so that the user id is
/// available in request extensions. Requests without one (rate limiting
/// disabled, or an unauthenticated path) pass through.
pub async fn rate_limit_middleware(
    State(state): State<AppState>,
    req: Request<Body>,
    next: Next,
) -> Response {
    let limiter = match &state.rate_limiter {
        Some(limiter) => limiter.clone(),
        None => return next.run(req).await,
    };

    let user_id = match req.extensions().get::<AuthUser>() {
        Some(auth) => auth.user_id,
        None => return next.run(req).await,
    };

    match limiter.check(user_id) {
        Ok(()) => next.run(req).await,
        Err(retry_after) => {
            tracing::warn!(user_id = %user_id, retry_after = retry_after, "Rate limit exceeded");
            (
                StatusCode::TOO_MANY_REQUESTS,
                [(header::RETRY_AFTER, retry_after.to_string())],
                Json(json!({
                    "error": "rate_limited",
                    "message": "Too many requests. Please try again later."
                })),
            )
                .into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rate_limiter_allows_within_quota() {
        let state = RateLimiterState::new(10);
        let user_id = Uuid::new_v4();

        for _ in 0..10 {
            assert!(state.check(user_id).is_ok());
        }
    }

    #[test]
    fn test_rate_limiter_blocks_over_quota() {
        let state = RateLimiterState::new(3);
        let user_id = Uuid::new_v4();

        for _ in 0..3 {
            assert!(state.check(user_id).is_ok());
        }
        let result = state.check(user_id);
        assert!(result.is_err());
        assert!(result.unwrap_err() >= 1);
    }

    #[test]
    fn test_rate_limiter_separate_users() {
        let state = RateLimiterState::new(1);
        let user_a = Uuid::new_v4();
        let user_b = Uuid::new_v4();

        assert!(state.check(user_a).is_ok());
        assert!(state.check(user_b).is_ok());
        assert!(state.check(user_a).is_err());
    }

    #[test]
    fn test_rate_limiter_debug_format() {
        let state = RateLimiterState::new(5);
        let debug = format!("{:?}", state);
        assert!(debug.contains("rate_limit_per_minute"));
    }
}
