use crate::{Actor, GroupName, UserId};

use super::Stakeholders;

/// Returns whether `actor` may add a comment to a project or one of its
/// tasks.
#[must_use]
pub fn can_comment(
    actor: &Actor,
    stakeholders: &Stakeholders,
    commenting_group: &GroupName,
) -> bool {
    stakeholders.includes(actor.user_id()) || actor.belongs_to(commenting_group)
}

/// Returns whether `actor` may edit or delete a comment.
///
/// The comment's own author always may. The project author may change
/// other people's comments, except those written by the project executor.
#[must_use]
pub fn can_modify_comment(
    actor: &Actor,
    comment_author: UserId,
    stakeholders: &Stakeholders,
) -> bool {
    if actor.user_id() == comment_author {
        return true;
    }

    actor.user_id() == stakeholders.author() && comment_author != stakeholders.executor()
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use crate::access::Stakeholders;
    use crate::{Actor, GroupName, UserId};

    use super::{can_comment, can_modify_comment};

    fn actor(user_id: UserId) -> Actor {
        Actor::new(user_id, "someone", false, BTreeSet::new())
    }

    fn commenters() -> GroupName {
        GroupName::new("author").unwrap_or_else(|_| panic!("test"))
    }

    #[test]
    fn stakeholders_and_group_members_may_comment() {
        let stakeholders = Stakeholders::new(UserId::new(), UserId::new());
        assert!(can_comment(&actor(stakeholders.author()), &stakeholders, &commenters()));
        assert!(can_comment(&actor(stakeholders.executor()), &stakeholders, &commenters()));

        let member = Actor::new(UserId::new(), "member", false, BTreeSet::from([commenters()]));
        assert!(can_comment(&member, &stakeholders, &commenters()));
        assert!(!can_comment(&actor(UserId::new()), &stakeholders, &commenters()));
    }

    #[test]
    fn comment_author_may_always_modify() {
        let stakeholders = Stakeholders::new(UserId::new(), UserId::new());
        let writer = UserId::new();
        assert!(can_modify_comment(&actor(writer), writer, &stakeholders));
        assert!(can_modify_comment(
            &actor(stakeholders.executor()),
            stakeholders.executor(),
            &stakeholders
        ));
    }

    #[test]
    fn project_author_may_modify_third_party_comment() {
        let stakeholders = Stakeholders::new(UserId::new(), UserId::new());
        assert!(can_modify_comment(
            &actor(stakeholders.author()),
            UserId::new(),
            &stakeholders
        ));
    }

    #[test]
    fn project_author_may_not_modify_executor_comment() {
        let stakeholders = Stakeholders::new(UserId::new(), UserId::new());
        assert!(!can_modify_comment(
            &actor(stakeholders.author()),
            stakeholders.executor(),
            &stakeholders
        ));
    }

    #[test]
    fn executor_may_not_modify_author_comment() {
        let stakeholders = Stakeholders::new(UserId::new(), UserId::new());
        assert!(!can_modify_comment(
            &actor(stakeholders.executor()),
            stakeholders.author(),
            &stakeholders
        ));
    }

    #[test]
    fn administrators_get_no_comment_override() {
        let stakeholders = Stakeholders::new(UserId::new(), UserId::new());
        let administrator = Actor::new(UserId::new(), "admin", true, BTreeSet::new());
        assert!(!can_modify_comment(&administrator, UserId::new(), &stakeholders));
    }
}
