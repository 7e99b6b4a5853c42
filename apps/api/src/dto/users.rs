use serde::{Deserialize, Serialize};
use taskboard_domain::{GroupName, UserId};
use ts_rs::TS;

/// Incoming payload replacing a user's group memberships.
#[derive(Debug, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/replace-groups-request.ts"
)]
pub struct ReplaceGroupsRequest {
    pub groups: Vec<String>,
}

/// A user's group memberships after a change.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/user-groups-response.ts"
)]
pub struct UserGroupsResponse {
    pub user_id: String,
    pub groups: Vec<String>,
}

impl UserGroupsResponse {
    #[must_use]
    pub fn new(user_id: UserId, groups: Vec<GroupName>) -> Self {
        Self {
            user_id: user_id.to_string(),
            groups: groups
                .into_iter()
                .map(|group| group.as_str().to_owned())
                .collect(),
        }
    }
}
