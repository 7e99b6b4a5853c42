use crate::{Actor, UserId};

/// Caller's relationship to a project or task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    /// System administrator.
    Administrator,
    /// Creator of the project.
    Author,
    /// User assigned to carry out the project.
    Executor,
    /// Anyone else.
    Other,
}

impl Role {
    /// Returns a stable label for logs and diagnostics.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Administrator => "administrator",
            Self::Author => "author",
            Self::Executor => "executor",
            Self::Other => "other",
        }
    }
}

/// Author and executor of a project. Tasks use their project's pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Stakeholders {
    author: UserId,
    executor: UserId,
}

impl Stakeholders {
    /// Creates a stakeholder pair.
    #[must_use]
    pub fn new(author: UserId, executor: UserId) -> Self {
        Self { author, executor }
    }

    /// Returns the project author.
    #[must_use]
    pub fn author(&self) -> UserId {
        self.author
    }

    /// Returns the project executor.
    #[must_use]
    pub fn executor(&self) -> UserId {
        self.executor
    }

    /// Returns whether `user_id` is the author or the executor.
    #[must_use]
    pub fn includes(&self, user_id: UserId) -> bool {
        self.author == user_id || self.executor == user_id
    }
}

/// Resolves the caller's role.
///
/// Administrator is checked first, then author, then executor. A user who
/// is both author and executor resolves to author.
#[must_use]
pub fn resolve_role(actor: &Actor, stakeholders: &Stakeholders) -> Role {
    if actor.is_administrator() {
        Role::Administrator
    } else if actor.user_id() == stakeholders.author() {
        Role::Author
    } else if actor.user_id() == stakeholders.executor() {
        Role::Executor
    } else {
        Role::Other
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use crate::{Actor, UserId};

    use super::{Role, Stakeholders, resolve_role};

    fn actor(user_id: UserId, is_administrator: bool) -> Actor {
        Actor::new(user_id, "someone", is_administrator, BTreeSet::new())
    }

    #[test]
    fn roles_resolve_in_order() {
        let author = UserId::new();
        let executor = UserId::new();
        let stakeholders = Stakeholders::new(author, executor);

        assert_eq!(resolve_role(&actor(author, false), &stakeholders), Role::Author);
        assert_eq!(
            resolve_role(&actor(executor, false), &stakeholders),
            Role::Executor
        );
        assert_eq!(
            resolve_role(&actor(UserId::new(), false), &stakeholders),
            Role::Other
        );
        assert_eq!(
            resolve_role(&actor(executor, true), &stakeholders),
            Role::Administrator
        );
    }

    #[test]
    fn author_wins_when_also_executor() {
        let user = UserId::new();
        let stakeholders = Stakeholders::new(user, user);
        assert_eq!(resolve_role(&actor(user, false), &stakeholders), Role::Author);
    }
}
