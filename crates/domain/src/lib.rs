//! Domain layer for the EventHub backend.
//!
//! This crate contains:
//! - Domain models (User, Event, Rsvp, Notification)
//! - Request/response types with validation schemas
//! - Role and status enums

pub mod models;
