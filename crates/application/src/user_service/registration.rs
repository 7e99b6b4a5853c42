use taskboard_core::AppError;
use taskboard_domain::{Username, validate_password};
use tracing::info;

use super::*;

impl UserService {
    /// Registers a new user with username and password.
    pub async fn register(&self, params: RegisterParams) -> AppResult<UserRecord> {
        let username = Username::new(params.username)?;
        validate_password(&params.password)?;

        if self
            .user_repository
            .find_by_username(username.as_str())
            .await?
            .is_some()
        {
            // Hash anyway so both branches cost the same.
            let _ = self.password_hasher.hash_password(&params.password);
            return Err(AppError::Conflict(format!(
                "username '{}' is already taken",
                username.as_str()
            )));
        }

        let password_hash = self.password_hasher.hash_password(&params.password)?;
        let user = self.user_repository.create(&username, &password_hash).await?;

        info!(user_id = %user.id, username = %user.username, "user registered");
        Ok(user)
    }
}
