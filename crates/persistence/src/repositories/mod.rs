//! Repository implementations for database operations.

pub mod event;
pub mod notification;
pub mod rsvp;
pub mod stats;
pub mod user;

pub use event::EventRepository;
pub use notification::NotificationRepository;
pub use rsvp::RsvpRepository;
pub use stats::StatsRepository;
pub use user::UserRepository;
