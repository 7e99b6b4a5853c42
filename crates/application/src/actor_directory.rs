use std::collections::BTreeSet;
use std::sync::Arc;

use taskboard_core::{AppError, AppResult, UserIdentity};
use taskboard_domain::{Actor, UserId};

use crate::UserRepository;

/// Resolves authenticated identities into authorization actors.
///
/// Every call reads the user directory, so group and administrator
/// changes apply to the next request.
#[derive(Clone)]
pub struct ActorDirectory {
    user_repository: Arc<dyn UserRepository>,
}

impl ActorDirectory {
    /// Creates a directory over a user repository.
    #[must_use]
    pub fn new(user_repository: Arc<dyn UserRepository>) -> Self {
        Self { user_repository }
    }

    /// Loads the actor behind a session identity.
    pub async fn resolve(&self, identity: &UserIdentity) -> AppResult<Actor> {
        let user_id = UserId::parse(identity.subject())
            .map_err(|_| AppError::Unauthorized("session subject is not a user id".to_owned()))?;

        let user = self
            .user_repository
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| AppError::Unauthorized("session user no longer exists".to_owned()))?;

        let groups: BTreeSet<_> = self
            .user_repository
            .list_groups(user_id)
            .await?
            .into_iter()
            .collect();

        Ok(Actor::new(
            user.id,
            user.username,
            user.is_administrator,
            groups,
        ))
    }

    /// Returns whether a user with this id exists.
    pub async fn user_exists(&self, user_id: UserId) -> AppResult<bool> {
        Ok(self.user_repository.find_by_id(user_id).await?.is_some())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use async_trait::async_trait;
    use chrono::Utc;
    use taskboard_core::{AppError, AppResult, UserIdentity};
    use taskboard_domain::{GroupName, UserId, Username};
    use tokio::sync::Mutex;

    use crate::{UserRecord, UserRepository};

    use super::ActorDirectory;

    #[derive(Default)]
    struct FakeUserRepository {
        users: Mutex<Vec<UserRecord>>,
        groups: Mutex<Vec<(UserId, GroupName)>>,
    }

    #[async_trait]
    impl UserRepository for FakeUserRepository {
        async fn find_by_username(&self, username: &str) -> AppResult<Option<UserRecord>> {
            Ok(self
                .users
                .lock()
                .await
                .iter()
                .find(|user| user.username == username)
                .cloned())
        }

        async fn find_by_id(&self, user_id: UserId) -> AppResult<Option<UserRecord>> {
            Ok(self
                .users
                .lock()
                .await
                .iter()
                .find(|user| user.id == user_id)
                .cloned())
        }

        async fn create(&self, username: &Username, password_hash: &str) -> AppResult<UserRecord> {
            let user = UserRecord {
                id: UserId::new(),
                username: username.as_str().to_owned(),
                password_hash: password_hash.to_owned(),
                is_administrator: false,
                created_at: Utc::now(),
            };
            self.users.lock().await.push(user.clone());
            Ok(user)
        }

        async fn list_groups(&self, user_id: UserId) -> AppResult<Vec<GroupName>> {
            Ok(self
                .groups
                .lock()
                .await
                .iter()
                .filter(|(member, _)| *member == user_id)
                .map(|(_, group)| group.clone())
                .collect())
        }

        async fn replace_groups(&self, user_id: UserId, groups: &[GroupName]) -> AppResult<()> {
            let mut memberships = self.groups.lock().await;
            memberships.retain(|(member, _)| *member != user_id);
            memberships.extend(groups.iter().map(|group| (user_id, group.clone())));
            Ok(())
        }

        async fn set_administrator(
            &self,
            user_id: UserId,
            is_administrator: bool,
        ) -> AppResult<()> {
            for user in self.users.lock().await.iter_mut() {
                if user.id == user_id {
                    user.is_administrator = is_administrator;
                }
            }
            Ok(())
        }
    }

    #[tokio::test]
    async fn resolve_reads_groups_on_every_call() {
        let repository = Arc::new(FakeUserRepository::default());
        let user = repository
            .create(
                &Username::new("alice").unwrap_or_else(|_| panic!("test")),
                "hash",
            )
            .await
            .unwrap_or_else(|_| panic!("test"));
        let directory = ActorDirectory::new(repository.clone());
        let identity = UserIdentity::new(user.id.to_string(), "alice");
        let author = GroupName::new("author").unwrap_or_else(|_| panic!("test"));

        let actor = directory
            .resolve(&identity)
            .await
            .unwrap_or_else(|_| panic!("test"));
        assert!(!actor.belongs_to(&author));

        repository
            .replace_groups(user.id, std::slice::from_ref(&author))
            .await
            .unwrap_or_else(|_| panic!("test"));

        let actor = directory
            .resolve(&identity)
            .await
            .unwrap_or_else(|_| panic!("test"));
        assert!(actor.belongs_to(&author));
    }

    #[tokio::test]
    async fn resolve_rejects_unknown_subjects() {
        let directory = ActorDirectory::new(Arc::new(FakeUserRepository::default()));

        let garbage = directory
            .resolve(&UserIdentity::new("not-a-uuid", "ghost"))
            .await;
        assert!(matches!(garbage, Err(AppError::Unauthorized(_))));

        let missing = directory
            .resolve(&UserIdentity::new(UserId::new().to_string(), "ghost"))
            .await;
        assert!(matches!(missing, Err(AppError::Unauthorized(_))));
    }
}
