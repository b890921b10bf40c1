use std::collections::HashMap;
use std::sync::Arc;

use chrono::Utc;
use tokio::sync::Mutex;
use uuid::Uuid;

use super::users::{RepositoryError, UserRepository};
use crate::models::{NewUser, User};

/// In-memory `UserRepository` for testing and database-less embedders.
///
/// Clones share the same map.
#[derive(Clone, Debug, Default)]
pub struct MemoryUserRepository {
    users: Arc<Mutex<HashMap<i64, User>>>,
}

impl MemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored users.
    pub async fn len(&self) -> usize {
        self.users.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.users.lock().await.is_empty()
    }
}

impl UserRepository for MemoryUserRepository {
    async fn find_by_provider_id(&self, provider_id: i64) -> Result<Option<User>, RepositoryError> {
        Ok(self.users.lock().await.get(&provider_id).cloned())
    }

    async fn create(&self, user: NewUser) -> Result<User, RepositoryError> {
        let mut users = self.users.lock().await;
        if users.contains_key(&user.provider_id) {
            return Err(RepositoryError::Conflict(user.provider_id));
        }

        let created = User {
            id: Uuid::new_v4(),
            provider_id: user.provider_id,
            login: user.login,
            avatar_url: user.avatar_url,
            name: user.name,
            created_at: Utc::now(),
        };
        users.insert(created.provider_id, created.clone());
        Ok(created)
    }
}
