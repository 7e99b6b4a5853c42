use chrono::{DateTime, Utc};
use taskboard_core::{AppError, AppResult};

use crate::{TaskFileId, TaskId, UserId};

/// Maximum stored filename length.
pub const FILENAME_MAX_LENGTH: usize = 255;

/// A file attached to a task. Immutable once stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskFile {
    id: TaskFileId,
    task_id: TaskId,
    content_ref: String,
    filename: String,
    uploaded_by: UserId,
    uploaded_at: DateTime<Utc>,
}

impl TaskFile {
    /// Creates or restores an attachment record.
    pub fn new(
        id: TaskFileId,
        task_id: TaskId,
        content_ref: impl Into<String>,
        filename: impl Into<String>,
        uploaded_by: UserId,
        uploaded_at: DateTime<Utc>,
    ) -> AppResult<Self> {
        let filename = filename.into();
        if filename.trim().is_empty() {
            return Err(AppError::Validation(
                "attachment filename must not be empty".to_owned(),
            ));
        }

        if filename.chars().count() > FILENAME_MAX_LENGTH {
            return Err(AppError::Validation(format!(
                "attachment filename must not exceed {FILENAME_MAX_LENGTH} characters"
            )));
        }

        Ok(Self {
            id,
            task_id,
            content_ref: content_ref.into(),
            filename,
            uploaded_by,
            uploaded_at,
        })
    }

    /// Returns the identifier.
    #[must_use]
    pub fn id(&self) -> TaskFileId {
        self.id
    }

    /// Returns the owning task.
    #[must_use]
    pub fn task_id(&self) -> TaskId {
        self.task_id
    }

    /// Returns the blob store key.
    #[must_use]
    pub fn content_ref(&self) -> &str {
        self.content_ref.as_str()
    }

    /// Returns the original filename.
    #[must_use]
    pub fn filename(&self) -> &str {
        self.filename.as_str()
    }

    /// Returns the uploader.
    #[must_use]
    pub fn uploaded_by(&self) -> UserId {
        self.uploaded_by
    }

    /// Returns the upload time.
    #[must_use]
    pub fn uploaded_at(&self) -> DateTime<Utc> {
        self.uploaded_at
    }
}
