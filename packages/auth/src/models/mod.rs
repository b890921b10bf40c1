//! Data models for the application.

mod profile;
mod user;

pub use profile::ProviderProfile;
pub use user::{NewUser, User};
