use tracing::info;

use super::*;

impl UserService {
    /// Authenticates a user with username and password.
    ///
    /// Returns `AuthOutcome::Failed` for any failure (unknown username or
    /// wrong password) to prevent enumeration.
    pub async fn login(&self, username: &str, password: &str) -> AppResult<AuthOutcome> {
        let user = self.user_repository.find_by_username(username.trim()).await?;

        let Some(user) = user else {
            // Always hash to keep timing flat when the user is unknown.
            let _ = self.password_hasher.hash_password(password);
            return Ok(AuthOutcome::Failed);
        };

        let password_valid = self
            .password_hasher
            .verify_password(password, &user.password_hash)?;

        if !password_valid {
            info!(user_id = %user.id, "login rejected");
            return Ok(AuthOutcome::Failed);
        }

        info!(user_id = %user.id, "login succeeded");
        Ok(AuthOutcome::Authenticated(user))
    }
}
