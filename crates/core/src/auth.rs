use serde::{Deserialize, Serialize};

/// User information persisted in the authenticated session.
///
/// Only the stable subject and the username live here. Administrator flags
/// and group memberships are looked up again on every request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserIdentity {
    subject: String,
    username: String,
}

impl UserIdentity {
    /// Creates a user identity from authentication data.
    #[must_use]
    pub fn new(subject: impl Into<String>, username: impl Into<String>) -> Self {
        Self {
            subject: subject.into(),
            username: username.into(),
        }
    }

    /// Returns the stable subject, the user id in string form.
    #[must_use]
    pub fn subject(&self) -> &str {
        self.subject.as_str()
    }

    /// Returns the login name of the current user.
    #[must_use]
    pub fn username(&self) -> &str {
        self.username.as_str()
    }
}
