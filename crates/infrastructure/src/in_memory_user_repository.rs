use std::collections::{BTreeSet, HashMap};

use async_trait::async_trait;
use chrono::Utc;
use taskboard_application::{UserRecord, UserRepository};
use taskboard_core::{AppError, AppResult};
use taskboard_domain::{GroupName, UserId, Username};
use tokio::sync::RwLock;

/// In-memory user directory implementation.
#[derive(Debug, Default)]
pub struct InMemoryUserRepository {
    users: RwLock<HashMap<UserId, UserRecord>>,
    groups: RwLock<HashMap<UserId, BTreeSet<GroupName>>>,
}

impl InMemoryUserRepository {
    /// Creates an empty in-memory repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn find_by_username(&self, username: &str) -> AppResult<Option<UserRecord>> {
        Ok(self
            .users
            .read()
            .await
            .values()
            .find(|user| user.username == username)
            .cloned())
    }

    async fn find_by_id(&self, user_id: UserId) -> AppResult<Option<UserRecord>> {
        Ok(self.users.read().await.get(&user_id).cloned())
    }

    async fn create(&self, username: &Username, password_hash: &str) -> AppResult<UserRecord> {
        let mut users = self.users.write().await;
        if users
            .values()
            .any(|user| user.username == username.as_str())
        {
            return Err(AppError::Conflict(
                "a user with this username already exists".to_owned(),
            ));
        }

        let user = UserRecord {
            id: UserId::new(),
            username: username.as_str().to_owned(),
            password_hash: password_hash.to_owned(),
            is_administrator: false,
            created_at: Utc::now(),
        };
        users.insert(user.id, user.clone());

        Ok(user)
    }

    async fn list_groups(&self, user_id: UserId) -> AppResult<Vec<GroupName>> {
        Ok(self
            .groups
            .read()
            .await
            .get(&user_id)
            .map(|groups| groups.iter().cloned().collect())
            .unwrap_or_default())
    }

    async fn replace_groups(&self, user_id: UserId, groups: &[GroupName]) -> AppResult<()> {
        if !self.users.read().await.contains_key(&user_id) {
            return Err(AppError::NotFound(format!("user '{user_id}' does not exist")));
        }

        self.groups
            .write()
            .await
            .insert(user_id, groups.iter().cloned().collect());
        Ok(())
    }

    async fn set_administrator(&self, user_id: UserId, is_administrator: bool) -> AppResult<()> {
        let mut users = self.users.write().await;
        let Some(user) = users.get_mut(&user_id) else {
            return Err(AppError::NotFound(format!("user '{user_id}' does not exist")));
        };

        user.is_administrator = is_administrator;
        Ok(())
    }
}
