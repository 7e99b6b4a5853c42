//! User directory ports and application service.
//!
//! Owns registration, password authentication, group administration and
//! administrator bootstrap. Authentication failures stay generic so the
//! response never reveals whether a username exists.

mod groups;
mod login;
mod registration;
mod retrieval;

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use taskboard_core::AppResult;
use taskboard_domain::{GroupName, UserId, Username};

// ---------------------------------------------------------------------------
// Ports
// ---------------------------------------------------------------------------

/// User record returned by repository queries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserRecord {
    /// Unique user identifier.
    pub id: UserId,
    /// Login name.
    pub username: String,
    /// Argon2id password hash.
    pub password_hash: String,
    /// Whether the user is an administrator.
    pub is_administrator: bool,
    /// Registration time.
    pub created_at: DateTime<Utc>,
}

/// Repository port for user persistence.
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Finds a user by username.
    async fn find_by_username(&self, username: &str) -> AppResult<Option<UserRecord>>;

    /// Finds a user by their unique identifier.
    async fn find_by_id(&self, user_id: UserId) -> AppResult<Option<UserRecord>>;

    /// Creates a new user record. Returns `Conflict` when the username is taken.
    async fn create(&self, username: &Username, password_hash: &str) -> AppResult<UserRecord>;

    /// Lists the groups the user belongs to.
    async fn list_groups(&self, user_id: UserId) -> AppResult<Vec<GroupName>>;

    /// Replaces every group membership of the user.
    async fn replace_groups(&self, user_id: UserId, groups: &[GroupName]) -> AppResult<()>;

    /// Sets or clears the administrator flag.
    async fn set_administrator(&self, user_id: UserId, is_administrator: bool) -> AppResult<()>;
}

/// Port for password hashing operations. Keeps domain/application free of
/// direct cryptographic library coupling.
pub trait PasswordHasher: Send + Sync {
    /// Hashes a plaintext password using Argon2id.
    fn hash_password(&self, password: &str) -> AppResult<String>;

    /// Verifies a plaintext password against a stored hash.
    fn verify_password(&self, password: &str, hash: &str) -> AppResult<bool>;
}

// ---------------------------------------------------------------------------
// Authentication outcome
// ---------------------------------------------------------------------------

/// Result of a login attempt.
#[derive(Debug)]
pub enum AuthOutcome {
    /// Authentication succeeded. Session can be established.
    Authenticated(UserRecord),
    /// Authentication failed. Generic message prevents enumeration.
    Failed,
}

// ---------------------------------------------------------------------------
// Request types
// ---------------------------------------------------------------------------

/// Parameters for user registration.
pub struct RegisterParams {
    /// Requested login name.
    pub username: String,
    /// Plaintext password (validated against strength rules).
    pub password: String,
}

// ---------------------------------------------------------------------------
// Service
// ---------------------------------------------------------------------------

/// Application service for user authentication and administration.
#[derive(Clone)]
pub struct UserService {
    user_repository: Arc<dyn UserRepository>,
    password_hasher: Arc<dyn PasswordHasher>,
}

impl UserService {
    /// Creates a new user service.
    #[must_use]
    pub fn new(
        user_repository: Arc<dyn UserRepository>,
        password_hasher: Arc<dyn PasswordHasher>,
    ) -> Self {
        Self {
            user_repository,
            password_hasher,
        }
    }
}
