use subtle::ConstantTimeEq;
use taskboard_core::AppError;
use taskboard_domain::Actor;
use tracing::{info, warn};

use super::*;

impl UserService {
    /// Replaces a user's group memberships. Administrators only.
    pub async fn replace_groups(
        &self,
        actor: &Actor,
        user_id: UserId,
        groups: Vec<String>,
    ) -> AppResult<Vec<GroupName>> {
        if !actor.is_administrator() {
            warn!(user_id = %actor.user_id(), "group change refused for non-administrator");
            return Err(AppError::Forbidden(
                "only administrators can change group memberships".to_owned(),
            ));
        }

        if self.user_repository.find_by_id(user_id).await?.is_none() {
            return Err(AppError::NotFound(format!("user '{user_id}' does not exist")));
        }

        let mut groups = groups
            .into_iter()
            .map(GroupName::new)
            .collect::<AppResult<Vec<_>>>()?;
        groups.sort();
        groups.dedup();

        self.user_repository.replace_groups(user_id, &groups).await?;
        info!(
            user_id = %user_id,
            changed_by = %actor.user_id(),
            group_count = groups.len(),
            "group memberships replaced"
        );
        Ok(groups)
    }

    /// Promotes a user to administrator when `presented` matches the
    /// configured bootstrap token.
    pub async fn bootstrap_administrator(
        &self,
        user_id: UserId,
        expected: &str,
        presented: &str,
    ) -> AppResult<()> {
        if expected.is_empty() || !bool::from(expected.as_bytes().ct_eq(presented.as_bytes())) {
            warn!(user_id = %user_id, "administrator bootstrap rejected");
            return Err(AppError::Unauthorized("invalid bootstrap token".to_owned()));
        }

        if self.user_repository.find_by_id(user_id).await?.is_none() {
            return Err(AppError::NotFound(format!("user '{user_id}' does not exist")));
        }

        self.user_repository.set_administrator(user_id, true).await?;
        info!(user_id = %user_id, "user promoted to administrator");
        Ok(())
    }
}
