//! Application services for the EventHub API.

pub mod auth;
pub mod email;
