use serde::Serialize;
use taskboard_application::UserRecord;
use taskboard_domain::GroupName;
use ts_rs::TS;

/// Health response payload.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/health-response.ts"
)]
pub struct HealthResponse {
    pub status: &'static str,
    pub postgres: &'static str,
}

/// API representation of the authenticated user.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/user-identity-response.ts"
)]
pub struct UserIdentityResponse {
    pub user_id: String,
    pub username: String,
    pub is_administrator: bool,
    pub groups: Vec<String>,
}

impl UserIdentityResponse {
    /// Creates a response from the stored user and their memberships.
    #[must_use]
    pub fn from_record(record: UserRecord, groups: Vec<GroupName>) -> Self {
        Self {
            user_id: record.id.to_string(),
            username: record.username,
            is_administrator: record.is_administrator,
            groups: groups
                .into_iter()
                .map(|group| group.as_str().to_owned())
                .collect(),
        }
    }
}
