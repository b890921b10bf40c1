//! # Database module: the user store
//!
//! The pipeline only talks to the store through [`UserRepository`], so it can run against
//! PostgreSQL in production and an in-memory map in tests.
//!
//! ## Uniqueness
//!
//! `users.provider_id` carries a `UNIQUE` constraint. Two first sign-ins racing for the
//! same GitHub account both try to insert; the loser gets [`RepositoryError::Conflict`]
//! and is expected to read the winner's row instead. No application-level locking.
//!
//! ## Re-exports
//!
//! - [`connect`] / [`connect_from_env`]: open a `PgPool`.
//! - [`migrate`]: apply the embedded migrations in `migrations/`.
//! - [`PgUserRepository`] / [`MemoryUserRepository`]: the two store implementations.

mod memory;
mod pool;
mod users;

pub use memory::MemoryUserRepository;
pub use pool::{connect, connect_from_env, migrate};
pub use users::{PgUserRepository, RepositoryError, UserRepository};
