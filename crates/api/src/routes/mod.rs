//! Route handlers for the EventHub API.

pub mod admin;
pub mod auth;
pub mod checkin;
pub mod events;
pub mod export;
pub mod health;
pub mod notifications;
pub mod rsvps;
pub mod upload;
