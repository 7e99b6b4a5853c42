//! User domain types and validation rules.
//!
//! Password rules follow the OWASP Authentication cheat sheet. Usernames
//! accept the conventional `letters, digits and @.+-_` alphabet.

use std::collections::BTreeSet;

use taskboard_core::{AppError, AppResult};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a user record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct UserId(Uuid);

impl UserId {
    /// Creates a new random user identifier.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Creates a user identifier from an existing UUID value.
    #[must_use]
    pub fn from_uuid(value: Uuid) -> Self {
        Self(value)
    }

    /// Parses a session subject or path segment into a user identifier.
    pub fn parse(value: &str) -> AppResult<Self> {
        Uuid::parse_str(value)
            .map(Self)
            .map_err(|error| AppError::Validation(format!("invalid user id '{value}': {error}")))
    }

    /// Returns the underlying UUID value.
    #[must_use]
    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl Default for UserId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for UserId {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(formatter, "{}", self.0)
    }
}

/// Maximum username length.
pub const USERNAME_MAX_LENGTH: usize = 150;

/// Minimum username length.
pub const USERNAME_MIN_LENGTH: usize = 3;

/// Validated login name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Username(String);

impl Username {
    /// Creates a validated username.
    pub fn new(value: impl Into<String>) -> AppResult<Self> {
        let value = value.into();
        let trimmed = value.trim();
        let char_count = trimmed.chars().count();

        if char_count < USERNAME_MIN_LENGTH {
            return Err(AppError::Validation(format!(
                "username must be at least {USERNAME_MIN_LENGTH} characters"
            )));
        }

        if char_count > USERNAME_MAX_LENGTH {
            return Err(AppError::Validation(format!(
                "username must not exceed {USERNAME_MAX_LENGTH} characters"
            )));
        }

        if let Some(invalid) = trimmed
            .chars()
            .find(|character| !character.is_alphanumeric() && !"@.+-_".contains(*character))
        {
            return Err(AppError::Validation(format!(
                "username must not contain '{invalid}'"
            )));
        }

        Ok(Self(trimmed.to_owned()))
    }

    /// Returns the validated username.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

/// Minimum password length (NIST SP800-63B, no second factor).
pub const PASSWORD_MIN_LENGTH: usize = 10;

/// Maximum password length to allow passphrases (OWASP recommendation: at least 64).
pub const PASSWORD_MAX_LENGTH: usize = 128;

/// Validates a plaintext password against OWASP and NIST rules.
///
/// - Min length is 10 characters.
/// - Max length is 128 characters (protects against Argon2id DoS).
/// - Rejects common breached passwords from an embedded list.
pub fn validate_password(password: &str) -> AppResult<()> {
    let char_count = password.chars().count();

    if char_count < PASSWORD_MIN_LENGTH {
        return Err(AppError::Validation(format!(
            "password must be at least {PASSWORD_MIN_LENGTH} characters"
        )));
    }

    if char_count > PASSWORD_MAX_LENGTH {
        return Err(AppError::Validation(format!(
            "password must not exceed {PASSWORD_MAX_LENGTH} characters"
        )));
    }

    if is_common_password(password) {
        return Err(AppError::Validation(
            "this password is too common and has appeared in data breaches".to_owned(),
        ));
    }

    Ok(())
}

fn is_common_password(password: &str) -> bool {
    let lowered = password.to_lowercase();
    COMMON_PASSWORDS.iter().any(|entry| *entry == lowered)
}

/// Top breached passwords long enough to pass the length check.
static COMMON_PASSWORDS: &[&str] = &[
    "1234567890",
    "qwertyuiop",
    "password123",
    "password12",
    "1q2w3e4r5t",
    "iloveyou12",
    "0987654321",
    "1111111111",
    "qwerty1234",
    "letmein123",
    "welcome123",
    "administrator",
];

/// Name of a permission group, such as the project author group.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct GroupName(String);

impl GroupName {
    /// Creates a validated group name.
    pub fn new(value: impl Into<String>) -> AppResult<Self> {
        let value = value.into();
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(AppError::Validation(
                "group name must not be empty".to_owned(),
            ));
        }

        if trimmed.chars().count() > USERNAME_MAX_LENGTH {
            return Err(AppError::Validation(format!(
                "group name must not exceed {USERNAME_MAX_LENGTH} characters"
            )));
        }

        Ok(Self(trimmed.to_owned()))
    }

    /// Returns the group name.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl std::fmt::Display for GroupName {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        formatter.write_str(self.0.as_str())
    }
}

/// Authenticated caller as seen by authorization checks.
///
/// Built fresh for every request from the user directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Actor {
    user_id: UserId,
    username: String,
    is_administrator: bool,
    groups: BTreeSet<GroupName>,
}

impl Actor {
    /// Creates an actor.
    #[must_use]
    pub fn new(
        user_id: UserId,
        username: impl Into<String>,
        is_administrator: bool,
        groups: BTreeSet<GroupName>,
    ) -> Self {
        Self {
            user_id,
            username: username.into(),
            is_administrator,
            groups,
        }
    }

    /// Returns the caller's user id.
    #[must_use]
    pub fn user_id(&self) -> UserId {
        self.user_id
    }

    /// Returns the caller's username.
    #[must_use]
    pub fn username(&self) -> &str {
        self.username.as_str()
    }

    /// Returns whether the caller is a system administrator.
    #[must_use]
    pub fn is_administrator(&self) -> bool {
        self.is_administrator
    }

    /// Returns whether the caller belongs to `group`.
    #[must_use]
    pub fn belongs_to(&self, group: &GroupName) -> bool {
        self.groups.contains(group)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn username_is_trimmed() {
        let username = Username::new("  alice  ").unwrap_or_else(|_| panic!("test"));
        assert_eq!(username.as_str(), "alice");
    }

    #[test]
    fn username_with_space_is_rejected() {
        assert!(Username::new("alice smith").is_err());
    }

    #[test]
    fn short_username_is_rejected() {
        assert!(Username::new("al").is_err());
    }

    #[test]
    fn username_accepts_email_like_values() {
        assert!(Username::new("alice.smith+work@example.com").is_ok());
    }

    #[test]
    fn short_password_is_rejected() {
        assert!(validate_password("short").is_err());
    }

    #[test]
    fn adequate_password_is_accepted() {
        assert!(validate_password("a-reasonable-passphrase").is_ok());
    }

    #[test]
    fn common_password_is_rejected() {
        assert!(validate_password("Password123").is_err());
    }

    #[test]
    fn very_long_password_is_rejected() {
        let long = "a".repeat(PASSWORD_MAX_LENGTH + 1);
        assert!(validate_password(&long).is_err());
    }

    #[test]
    fn empty_group_name_is_rejected() {
        assert!(GroupName::new("  ").is_err());
    }

    #[test]
    fn actor_group_membership() {
        let authors = GroupName::new("author").unwrap_or_else(|_| panic!("test"));
        let actor = Actor::new(
            UserId::new(),
            "alice",
            false,
            BTreeSet::from([authors.clone()]),
        );
        assert!(actor.belongs_to(&authors));
        assert!(!actor.belongs_to(&GroupName::new("reviewer").unwrap_or_else(|_| panic!("test"))));
    }
}
