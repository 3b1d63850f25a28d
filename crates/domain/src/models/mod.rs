//! Domain models for EventHub.

pub mod admin;
pub mod event;
pub mod notification;
pub mod rsvp;
pub mod user;

pub use event::Event;
pub use notification::Notification;
pub use rsvp::Rsvp;
pub use user::User;
