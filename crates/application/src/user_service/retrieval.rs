use super::*;

impl UserService {
    /// Returns a user record by ID, if it exists.
    pub async fn find_by_id(&self, user_id: UserId) -> AppResult<Option<UserRecord>> {
        self.user_repository.find_by_id(user_id).await
    }

    /// Returns the groups a user belongs to.
    pub async fn list_groups(&self, user_id: UserId) -> AppResult<Vec<GroupName>> {
        self.user_repository.list_groups(user_id).await
    }
}
