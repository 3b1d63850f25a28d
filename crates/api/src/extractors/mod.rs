//! Request extractors for the EventHub API.

pub mod current_user;

pub use current_user::CurrentUser;
