//! # User model
//!
//! [`User`] is the full row from the `users` table:
//!
//! - `id`: primary key (`UUID`), generated by the store on insert and stable thereafter.
//! - `provider_id`: GitHub's numeric user id, unique across the table.
//! - `login`, `avatar_url`, `name`: copied from the GitHub profile on the first sign-in and
//!   never refreshed afterwards.
//! - `created_at`: audit timestamp.
//!
//! [`NewUser`] is the insert payload, built from a [`ProviderProfile`].

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;
use uuid::Uuid;

use super::ProviderProfile;

/// Full user record from the database.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, FromRow)]
pub struct User {
    pub id: Uuid,
    pub provider_id: i64,
    pub login: String,
    pub avatar_url: String,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

/// Fields needed to create a user; the store assigns `id` and `created_at`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    pub provider_id: i64,
    pub login: String,
    pub avatar_url: String,
    pub name: String,
}

impl From<&ProviderProfile> for NewUser {
    fn from(profile: &ProviderProfile) -> Self {
        Self {
            provider_id: profile.provider_id,
            login: profile.login.clone(),
            avatar_url: profile.avatar_url.clone(),
            name: profile.display_name.clone(),
        }
    }
}
