//! # Auth crate: GitHub sign-in for local user accounts
//!
//! Turns the one-time authorization code GitHub hands back after an OAuth redirect into a
//! local user record and a signed session token.
//!
//! ## Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`auth`] | The three-stage sign-in pipeline: code exchange, profile fetch, reconciliation and token signing |
//! | [`config`] | Process-wide configuration (`AuthConfig`) loaded once from the environment |
//! | [`db`] | PostgreSQL pool, migrations and the `UserRepository` implementations |
//! | [`error`] | `AuthError`, the error taxonomy every stage reports through |
//! | [`models`] | `User`, `NewUser` and `ProviderProfile` |
//!
//! ## Wiring
//!
//! ```rust,ignore
//! let config = auth::AuthConfig::from_env()?;
//! let pool = auth::db::connect_from_env().await?;
//! auth::db::migrate(&pool).await?;
//!
//! let authenticator = auth::AuthenticateUser::github(&config, pool)?;
//! let session = authenticator.execute(&code).await?;
//! ```

pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod models;

pub use auth::{
    AuthenticateUser, AuthenticatedSession, AuthorizationCode, CodeExchanger, GitHubAuthenticator,
    GitHubOAuth, IdentityFetcher, IdentityReconciler, JwtPayload, JwtSigner, ProviderAccessToken,
    SessionClaims, SigningSecret, TokenSigner,
};
pub use config::AuthConfig;
pub use db::{MemoryUserRepository, PgUserRepository, RepositoryError, UserRepository};
pub use error::AuthError;
pub use models::{NewUser, ProviderProfile, User};
