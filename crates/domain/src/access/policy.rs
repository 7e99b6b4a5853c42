use std::collections::BTreeSet;

use crate::{ProjectField, TaskField};

use super::{Role, TrackedField};

/// Fields a role may change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AllowedFields<F> {
    /// Every field.
    All,
    /// Exactly these fields. Empty means read-only.
    Only(BTreeSet<F>),
}

impl<F: TrackedField> AllowedFields<F> {
    /// Read-only allowance.
    #[must_use]
    pub fn none() -> Self {
        Self::Only(BTreeSet::new())
    }

    /// Allowance for an explicit field list.
    pub fn only(fields: impl IntoIterator<Item = F>) -> Self {
        Self::Only(fields.into_iter().collect())
    }

    /// Returns whether the allowance covers every field.
    #[must_use]
    pub fn is_all(&self) -> bool {
        matches!(self, Self::All)
    }
}

/// Per-role field allowances for one entity type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldPolicy<F> {
    administrator: AllowedFields<F>,
    author: AllowedFields<F>,
    executor: AllowedFields<F>,
    other: AllowedFields<F>,
}

impl<F: TrackedField> FieldPolicy<F> {
    /// Creates a policy from one allowance per role.
    #[must_use]
    pub fn new(
        administrator: AllowedFields<F>,
        author: AllowedFields<F>,
        executor: AllowedFields<F>,
        other: AllowedFields<F>,
    ) -> Self {
        Self {
            administrator,
            author,
            executor,
            other,
        }
    }

    /// Returns the allowance for `role`.
    #[must_use]
    pub fn allowance(&self, role: Role) -> &AllowedFields<F> {
        match role {
            Role::Administrator => &self.administrator,
            Role::Author => &self.author,
            Role::Executor => &self.executor,
            Role::Other => &self.other,
        }
    }
}

/// Project policy: author and administrator change anything, the executor
/// only the status, everyone else nothing.
#[must_use]
pub fn project_field_policy() -> FieldPolicy<ProjectField> {
    FieldPolicy::new(
        AllowedFields::All,
        AllowedFields::All,
        AllowedFields::only([ProjectField::Status]),
        AllowedFields::none(),
    )
}

/// Task policy, keyed by the parent project's stakeholders.
#[must_use]
pub fn task_field_policy() -> FieldPolicy<TaskField> {
    FieldPolicy::new(
        AllowedFields::All,
        AllowedFields::All,
        AllowedFields::only([TaskField::Status]),
        AllowedFields::none(),
    )
}
