use std::collections::BTreeSet;

use taskboard_core::{AppError, AppResult};
use taskboard_domain::access::{
    FieldPolicy, Role, TouchedFields, authorize, can_comment, can_modify_comment,
    project_field_policy, resolve_role, task_field_policy,
};
use taskboard_domain::{
    Actor, Comment, GroupName, Project, ProjectField, ProjectPatch, TaskField, TaskFile, TaskPatch,
};
use tracing::warn;

/// Group names that gate creation and commenting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessGroups {
    /// Members may create projects.
    pub author_group: GroupName,
    /// Members may comment on any project or task.
    pub commenter_group: GroupName,
}

/// Application service for per-request authorization checks.
///
/// Holds only configuration. Every decision is computed from the actor
/// and the entity state handed in by the caller.
#[derive(Clone)]
pub struct AuthorizationService {
    groups: AccessGroups,
    project_policy: FieldPolicy<ProjectField>,
    task_policy: FieldPolicy<TaskField>,
}

impl AuthorizationService {
    /// Creates the service with the standard field policies.
    #[must_use]
    pub fn new(groups: AccessGroups) -> Self {
        Self {
            groups,
            project_policy: project_field_policy(),
            task_policy: task_field_policy(),
        }
    }

    /// Ensures the actor may create projects.
    pub fn require_project_creation(&self, actor: &Actor) -> AppResult<()> {
        if actor.belongs_to(&self.groups.author_group) {
            return Ok(());
        }

        warn!(
            user_id = %actor.user_id(),
            group = %self.groups.author_group,
            "project creation refused"
        );
        Err(AppError::Forbidden(format!(
            "only members of the '{}' group can create projects",
            self.groups.author_group
        )))
    }

    /// Decides whether the actor may apply `patch` to `project`.
    pub fn authorize_project_update(
        &self,
        actor: &Actor,
        project: &Project,
        patch: &ProjectPatch,
    ) -> AppResult<()> {
        self.authorize_project_fields(actor, project, &patch.touched_fields())
    }

    /// Decides whether the actor may change every field in `attempted`.
    pub fn authorize_project_fields(
        &self,
        actor: &Actor,
        project: &Project,
        attempted: &BTreeSet<ProjectField>,
    ) -> AppResult<()> {
        let role = resolve_role(actor, &project.stakeholders());
        let decision = authorize(role, attempted, &self.project_policy);

        if !decision.is_allowed() {
            warn!(
                user_id = %actor.user_id(),
                project_id = %project.id(),
                role = role.as_str(),
                ?decision,
                "project update denied"
            );
        }

        decision.into_result()
    }

    /// Decides whether the actor may apply `patch` to a task of `project`.
    pub fn authorize_task_update(
        &self,
        actor: &Actor,
        project: &Project,
        patch: &TaskPatch,
    ) -> AppResult<()> {
        self.authorize_task_fields(actor, project, &patch.touched_fields())
    }

    /// Task counterpart of [`Self::authorize_project_fields`].
    pub fn authorize_task_fields(
        &self,
        actor: &Actor,
        project: &Project,
        attempted: &BTreeSet<TaskField>,
    ) -> AppResult<()> {
        let role = resolve_role(actor, &project.stakeholders());
        let decision = authorize(role, attempted, &self.task_policy);

        if !decision.is_allowed() {
            warn!(
                user_id = %actor.user_id(),
                project_id = %project.id(),
                role = role.as_str(),
                ?decision,
                "task update denied"
            );
        }

        decision.into_result()
    }

    /// Ensures the actor holds unrestricted rights over `project`.
    ///
    /// Guards project deletion and task creation or deletion.
    pub fn require_project_control(&self, actor: &Actor, project: &Project) -> AppResult<()> {
        let role = resolve_role(actor, &project.stakeholders());
        if self.project_policy.allowance(role).is_all() {
            return Ok(());
        }

        warn!(
            user_id = %actor.user_id(),
            project_id = %project.id(),
            role = role.as_str(),
            "project control refused"
        );
        Err(AppError::Forbidden(
            "only the project author or an administrator can do this".to_owned(),
        ))
    }

    /// Ensures the actor may comment on `project` or one of its tasks.
    pub fn require_comment_creation(&self, actor: &Actor, project: &Project) -> AppResult<()> {
        if can_comment(actor, &project.stakeholders(), &self.groups.commenter_group) {
            return Ok(());
        }

        warn!(
            user_id = %actor.user_id(),
            project_id = %project.id(),
            "comment creation refused"
        );
        Err(AppError::Forbidden(
            "you are not allowed to comment here".to_owned()
        ))
    }

    /// Ensures the actor may edit or delete `comment` under `project`.
    pub fn require_comment_modification(
        &self,
        actor: &Actor,
        project: &Project,
        comment: &Comment,
    ) -> AppResult<()> {
        if can_modify_comment(actor, comment.author(), &project.stakeholders()) {
            return Ok(());
        }

        warn!(
            user_id = %actor.user_id(),
            project_id = %project.id(),
            comment_id = %comment.id(),
            "comment modification refused"
        );
        Err(AppError::Forbidden(
            "you are not allowed to change this comment".to_owned(),
        ))
    }

    /// Ensures the actor may attach files to tasks of `project`.
    pub fn require_attachment_upload(&self, actor: &Actor, project: &Project) -> AppResult<()> {
        let role = resolve_role(actor, &project.stakeholders());
        if role != Role::Other {
            return Ok(());
        }

        warn!(
            user_id = %actor.user_id(),
            project_id = %project.id(),
            "attachment upload refused"
        );
        Err(AppError::Forbidden(
            "only the project author, executor or an administrator can upload files".to_owned(),
        ))
    }

    /// Ensures the actor may remove `task_file` from a task of `project`.
    pub fn require_attachment_removal(
        &self,
        actor: &Actor,
        project: &Project,
        task_file: &TaskFile,
    ) -> AppResult<()> {
        if actor.is_administrator()
            || actor.user_id() == task_file.uploaded_by()
            || actor.user_id() == project.author()
        {
            return Ok(());
        }

        warn!(
            user_id = %actor.user_id(),
            project_id = %project.id(),
            task_file_id = %task_file.id(),
            "attachment removal refused"
        );
        Err(AppError::Forbidden(
            "only the uploader, the project author or an administrator can remove this file"
                .to_owned(),
        ))
    }
}
