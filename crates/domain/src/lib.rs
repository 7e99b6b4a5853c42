//! Domain entities and invariants.

#![forbid(unsafe_code)]

pub mod access;
mod comment;
mod ids;
mod project;
mod status;
mod task;
mod task_file;
mod user;

pub use comment::{COMMENT_TEXT_MAX_LENGTH, Comment, CommentTarget};
pub use ids::{CommentId, ProjectId, TaskFileId, TaskId};
pub use project::{
    PROJECT_COMMENT_MAX_LENGTH, Project, ProjectDraft, ProjectField, ProjectImage, ProjectParts,
    ProjectPatch, TITLE_MAX_LENGTH,
};
pub use status::{WorkStatus, validate_schedule};
pub use task::{Task, TaskDraft, TaskField, TaskParts, TaskPatch};
pub use task_file::{FILENAME_MAX_LENGTH, TaskFile};
pub use user::{
    Actor, GroupName, PASSWORD_MAX_LENGTH, PASSWORD_MIN_LENGTH, USERNAME_MAX_LENGTH,
    USERNAME_MIN_LENGTH, UserId, Username, validate_password,
};
