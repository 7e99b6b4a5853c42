mod bootstrap;
mod password;
mod session;

use taskboard_application::UserRecord;
use taskboard_core::{AppError, UserIdentity};
use tower_sessions::Session;

pub use bootstrap::bootstrap_handler;
pub use password::{login_handler, register_handler};
pub use session::{logout_handler, me_handler};

pub const SESSION_USER_KEY: &str = "user_identity";

/// Rotates the session id and stores the user's identity in it.
pub(crate) async fn start_session(session: &Session, user: &UserRecord) -> Result<(), AppError> {
    let identity = UserIdentity::new(user.id.to_string(), user.username.clone());

    session
        .cycle_id()
        .await
        .map_err(|error| AppError::Internal(format!("failed to cycle session id: {error}")))?;

    session
        .insert(SESSION_USER_KEY, &identity)
        .await
        .map_err(|error| {
            AppError::Internal(format!("failed to persist session identity: {error}"))
        })?;

    Ok(())
}
