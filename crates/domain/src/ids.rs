use serde::{Deserialize, Serialize};
use taskboard_core::{AppError, AppResult};
use uuid::Uuid;

macro_rules! entity_id {
    ($(#[$meta:meta])* $name:ident, $label:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        pub struct $name(Uuid);

        impl $name {
            /// Creates a new random identifier.
            #[must_use]
            pub fn new() -> Self {
                Self(Uuid::new_v4())
            }

            /// Creates an identifier from an existing UUID value.
            #[must_use]
            pub fn from_uuid(value: Uuid) -> Self {
                Self(value)
            }

            /// Parses a path segment into an identifier.
            pub fn parse(value: &str) -> AppResult<Self> {
                Uuid::parse_str(value).map(Self).map_err(|error| {
                    AppError::Validation(format!(
                        concat!("invalid ", $label, " id '{}': {}"),
                        value, error
                    ))
                })
            }

            /// Returns the underlying UUID value.
            #[must_use]
            pub fn as_uuid(&self) -> Uuid {
                self.0
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(formatter, "{}", self.0)
            }
        }
    };
}

entity_id!(
    /// Unique identifier for a project.
    ProjectId,
    "project"
);
entity_id!(
    /// Unique identifier for a task.
    TaskId,
    "task"
);
entity_id!(
    /// Unique identifier for a comment.
    CommentId,
    "comment"
);
entity_id!(
    /// Unique identifier for a task attachment.
    TaskFileId,
    "task file"
);

#[cfg(test)]
mod tests {
    use super::ProjectId;

    #[test]
    fn parse_rejects_garbage() {
        assert!(ProjectId::parse("not-a-uuid").is_err());
    }

    #[test]
    fn parse_accepts_display_output() {
        let id = ProjectId::new();
        assert_eq!(ProjectId::parse(&id.to_string()).ok(), Some(id));
    }
}
