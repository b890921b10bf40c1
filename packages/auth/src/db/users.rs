use std::future::Future;

use sqlx::PgPool;

use crate::models::{NewUser, User};

#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    /// A user with this provider id already exists. Signals a lost insert race.
    #[error("user with provider id {0} already exists")]
    Conflict(i64),
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("user store unavailable: {0}")]
    Unavailable(String),
}

/// Keyed access to persisted users.
pub trait UserRepository: Send + Sync {
    fn find_by_provider_id(
        &self,
        provider_id: i64,
    ) -> impl Future<Output = Result<Option<User>, RepositoryError>> + Send;

    /// Insert a new user. Must fail with [`RepositoryError::Conflict`] rather than create a
    /// second row for the same provider id.
    fn create(
        &self,
        user: NewUser,
    ) -> impl Future<Output = Result<User, RepositoryError>> + Send;
}

/// `UserRepository` backed by the `users` table.
#[derive(Debug, Clone)]
pub struct PgUserRepository {
    pool: PgPool,
}

impl PgUserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

impl UserRepository for PgUserRepository {
    async fn find_by_provider_id(&self, provider_id: i64) -> Result<Option<User>, RepositoryError> {
        let user: Option<User> = sqlx::query_as("SELECT * FROM users WHERE provider_id = $1")
            .bind(provider_id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(user)
    }

    async fn create(&self, user: NewUser) -> Result<User, RepositoryError> {
        // Conflicts come back as "no row" instead of an aborted statement.
        let created: Option<User> = sqlx::query_as(
            r#"
            INSERT INTO users (provider_id, login, avatar_url, name)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (provider_id) DO NOTHING
            RETURNING *
            "#,
        )
        .bind(user.provider_id)
        .bind(&user.login)
        .bind(&user.avatar_url)
        .bind(&user.name)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            let unique = e
                .as_database_error()
                .is_some_and(|db| db.is_unique_violation());
            if unique {
                RepositoryError::Conflict(user.provider_id)
            } else {
                RepositoryError::Database(e)
            }
        })?;

        created.ok_or(RepositoryError::Conflict(user.provider_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_user(provider_id: i64, login: &str) -> NewUser {
        NewUser {
            provider_id,
            login: login.to_string(),
            avatar_url: format!("http://x/{login}.png"),
            name: login.to_uppercase(),
        }
    }

    async fn pool() -> PgPool {
        let url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");
        let pool = crate::db::connect(&url).await.unwrap();
        crate::db::migrate(&pool).await.unwrap();
        pool
    }

    #[tokio::test]
    #[ignore = "requires DATABASE_URL"]
    async fn test_pg_create_then_find() {
        let repo = PgUserRepository::new(pool().await);
        let provider_id = i64::from(uuid::Uuid::new_v4().as_fields().0);

        assert!(repo.find_by_provider_id(provider_id).await.unwrap().is_none());

        let created = repo.create(new_user(provider_id, "alice")).await.unwrap();
        let found = repo.find_by_provider_id(provider_id).await.unwrap().unwrap();
        assert_eq!(created, found);
        assert_eq!(found.login, "alice");
    }

    #[tokio::test]
    #[ignore = "requires DATABASE_URL"]
    async fn test_pg_duplicate_provider_id_is_conflict() {
        let repo = PgUserRepository::new(pool().await);
        let provider_id = i64::from(uuid::Uuid::new_v4().as_fields().0);

        repo.create(new_user(provider_id, "alice")).await.unwrap();
        let err = repo.create(new_user(provider_id, "alice2")).await.unwrap_err();
        assert!(matches!(err, RepositoryError::Conflict(id) if id == provider_id));
    }
}
