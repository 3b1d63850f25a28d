//! Middleware for the EventHub API.

pub mod logging;
pub mod metrics;
pub mod rate_limit;
pub mod trace_id;
pub mod user_auth;

pub use metrics::{metrics_handler, metrics_middleware};
pub use rate_limit::{rate_limit_middleware, RateLimiterState};
pub use trace_id::trace_id;
pub use user_auth::{require_admin, require_auth};
