use std::collections::BTreeSet;

use taskboard_core::{AppError, AppResult};

use super::{AllowedFields, FieldPolicy, Role, TrackedField};

/// Outcome of a field-level authorization check.
///
/// There is no partial outcome: a request that touches one disallowed
/// field is denied as a whole.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision<F> {
    /// Every submitted field may be applied.
    AllowAll,
    /// Nothing may be applied. `disallowed` lists the offending fields.
    Deny {
        /// Submitted fields outside the role's allowance.
        disallowed: BTreeSet<F>,
    },
}

impl<F: TrackedField> Decision<F> {
    /// Returns whether the request may proceed.
    #[must_use]
    pub fn is_allowed(&self) -> bool {
        matches!(self, Self::AllowAll)
    }

    /// Converts a denial into [`AppError::DisallowedFields`].
    pub fn into_result(self) -> AppResult<()> {
        match self {
            Self::AllowAll => Ok(()),
            Self::Deny { disallowed } => Err(AppError::DisallowedFields(
                disallowed
                    .iter()
                    .map(|field| field.as_str().to_owned())
                    .collect(),
            )),
        }
    }
}

/// Decides whether `role` may change every field in `attempted`.
#[must_use]
pub fn authorize<F: TrackedField>(
    role: Role,
    attempted: &BTreeSet<F>,
    policy: &FieldPolicy<F>,
) -> Decision<F> {
    if attempted.is_empty() {
        return Decision::AllowAll;
    }

    let allowed = match policy.allowance(role) {
        AllowedFields::All => return Decision::AllowAll,
        AllowedFields::Only(fields) => fields,
    };

    let disallowed: BTreeSet<F> = attempted.difference(allowed).copied().collect();
    if disallowed.is_empty() {
        Decision::AllowAll
    } else {
        Decision::Deny { disallowed }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use proptest::prelude::*;

    use crate::ProjectField;
    use crate::access::{Role, TrackedField, project_field_policy};

    use super::{Decision, authorize};

    fn role_strategy() -> impl Strategy<Value = Role> {
        prop_oneof![
            Just(Role::Administrator),
            Just(Role::Author),
            Just(Role::Executor),
            Just(Role::Other),
        ]
    }

    fn field_set_strategy() -> impl Strategy<Value = BTreeSet<ProjectField>> {
        let fields = ProjectField::ALL.to_vec();
        let max_len = fields.len();
        proptest::collection::btree_set(proptest::sample::select(fields), 0..=max_len)
    }

    #[test]
    fn executor_may_change_status_only() {
        let policy = project_field_policy();
        let status_only = BTreeSet::from([ProjectField::Status]);
        assert_eq!(
            authorize(Role::Executor, &status_only, &policy),
            Decision::AllowAll
        );

        let with_title = BTreeSet::from([ProjectField::Status, ProjectField::Title]);
        assert_eq!(
            authorize(Role::Executor, &with_title, &policy),
            Decision::Deny {
                disallowed: BTreeSet::from([ProjectField::Title]),
            }
        );
    }

    #[test]
    fn executor_may_not_reassign_executor() {
        let policy = project_field_policy();
        let decision = authorize(
            Role::Executor,
            &BTreeSet::from([ProjectField::Executor]),
            &policy,
        );
        assert!(!decision.is_allowed());
    }

    #[test]
    fn denial_reports_field_names() {
        let policy = project_field_policy();
        let decision = authorize(
            Role::Other,
            &BTreeSet::from([ProjectField::Comment, ProjectField::Title]),
            &policy,
        );
        let message = decision
            .into_result()
            .err()
            .map(|error| error.to_string())
            .unwrap_or_default();
        assert_eq!(message, "forbidden: not allowed to change title, comment");
    }

    proptest! {
        #[test]
        fn decisions_are_deterministic(role in role_strategy(), fields in field_set_strategy()) {
            let policy = project_field_policy();
            prop_assert_eq!(
                authorize(role, &fields, &policy),
                authorize(role, &fields, &policy)
            );
        }

        #[test]
        fn author_and_administrator_are_always_allowed(fields in field_set_strategy()) {
            let policy = project_field_policy();
            prop_assert!(authorize(Role::Author, &fields, &policy).is_allowed());
            prop_assert!(authorize(Role::Administrator, &fields, &policy).is_allowed());
        }

        #[test]
        fn unrelated_users_are_denied_unless_empty(fields in field_set_strategy()) {
            let policy = project_field_policy();
            let decision = authorize(Role::Other, &fields, &policy);
            if fields.is_empty() {
                prop_assert_eq!(decision, Decision::AllowAll);
            } else {
                prop_assert_eq!(decision, Decision::Deny { disallowed: fields });
            }
        }

        #[test]
        fn executor_denials_never_list_status(fields in field_set_strategy()) {
            let policy = project_field_policy();
            if let Decision::Deny { disallowed } = authorize(Role::Executor, &fields, &policy) {
                prop_assert!(!disallowed.contains(&ProjectField::Status));
                prop_assert!(!disallowed.is_empty());
            }
        }
    }
}
