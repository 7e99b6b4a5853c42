use chrono::{DateTime, Utc};
use taskboard_core::{AppError, AppResult};

use crate::{CommentId, ProjectId, TaskId, UserId};

/// Maximum comment length.
pub const COMMENT_TEXT_MAX_LENGTH: usize = 10_000;

/// What a comment is attached to. Exactly one of the two.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CommentTarget {
    /// Attached to a project.
    Project(ProjectId),
    /// Attached to a task.
    Task(TaskId),
}

impl CommentTarget {
    /// Returns the project id when attached to a project.
    #[must_use]
    pub fn project_id(&self) -> Option<ProjectId> {
        match self {
            Self::Project(project_id) => Some(*project_id),
            Self::Task(_) => None,
        }
    }

    /// Returns the task id when attached to a task.
    #[must_use]
    pub fn task_id(&self) -> Option<TaskId> {
        match self {
            Self::Project(_) => None,
            Self::Task(task_id) => Some(*task_id),
        }
    }

    /// Rebuilds a target from two nullable storage columns.
    pub fn from_columns(project_id: Option<ProjectId>, task_id: Option<TaskId>) -> AppResult<Self> {
        match (project_id, task_id) {
            (Some(project_id), None) => Ok(Self::Project(project_id)),
            (None, Some(task_id)) => Ok(Self::Task(task_id)),
            _ => Err(AppError::Internal(
                "comment must reference exactly one of project or task".to_owned(),
            )),
        }
    }
}

/// A comment on a project or task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Comment {
    id: CommentId,
    target: CommentTarget,
    author: UserId,
    text: String,
    created_at: DateTime<Utc>,
}

impl Comment {
    /// Creates or restores a comment.
    pub fn new(
        id: CommentId,
        target: CommentTarget,
        author: UserId,
        text: impl Into<String>,
        created_at: DateTime<Utc>,
    ) -> AppResult<Self> {
        let text = validate_comment_text(text.into())?;
        Ok(Self {
            id,
            target,
            author,
            text,
            created_at,
        })
    }

    /// Returns the identifier.
    #[must_use]
    pub fn id(&self) -> CommentId {
        self.id
    }

    /// Returns what the comment is attached to.
    #[must_use]
    pub fn target(&self) -> CommentTarget {
        self.target
    }

    /// Returns the comment author.
    #[must_use]
    pub fn author(&self) -> UserId {
        self.author
    }

    /// Returns the text.
    #[must_use]
    pub fn text(&self) -> &str {
        self.text.as_str()
    }

    /// Returns the creation time.
    #[must_use]
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns a copy with replaced text.
    pub fn with_text(&self, text: impl Into<String>) -> AppResult<Self> {
        Ok(Self {
            text: validate_comment_text(text.into())?,
            ..self.clone()
        })
    }
}

fn validate_comment_text(text: String) -> AppResult<String> {
    if text.trim().is_empty() {
        return Err(AppError::Validation(
            "comment text must not be empty".to_owned(),
        ));
    }

    if text.chars().count() > COMMENT_TEXT_MAX_LENGTH {
        return Err(AppError::Validation(format!(
            "comment text must not exceed {COMMENT_TEXT_MAX_LENGTH} characters"
        )));
    }

    Ok(text)
}
