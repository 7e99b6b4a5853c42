use std::collections::BTreeSet;

use chrono::{DateTime, NaiveDate, Utc};
use taskboard_core::{AppError, AppResult, NonEmptyString, Patch};

use crate::access::{TouchedFields, TrackedField};
use crate::{ProjectId, TITLE_MAX_LENGTH, TaskId, WorkStatus, validate_schedule};

/// Mutable task fields, as named on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum TaskField {
    /// `number`
    Number,
    /// `title`
    Title,
    /// `description`
    Description,
    /// `status`
    Status,
    /// `start_date`
    StartDate,
    /// `end_date`
    EndDate,
}

impl TrackedField for TaskField {
    const ALL: &'static [Self] = &[
        Self::Number,
        Self::Title,
        Self::Description,
        Self::Status,
        Self::StartDate,
        Self::EndDate,
    ];

    fn as_str(&self) -> &'static str {
        match self {
            Self::Number => "number",
            Self::Title => "title",
            Self::Description => "description",
            Self::Status => "status",
            Self::StartDate => "start_date",
            Self::EndDate => "end_date",
        }
    }
}

/// Raw task state, used to build or restore a [`Task`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskParts {
    /// Identifier.
    pub id: TaskId,
    /// Owning project.
    pub project_id: ProjectId,
    /// Position within the project.
    pub number: i32,
    /// Title.
    pub title: String,
    /// Description.
    pub description: String,
    /// Lifecycle status.
    pub status: WorkStatus,
    /// Start date.
    pub start_date: NaiveDate,
    /// End date.
    pub end_date: NaiveDate,
    /// Creation time.
    pub created_at: DateTime<Utc>,
    /// Optimistic concurrency version.
    pub version: i64,
}

/// A unit of work inside a project.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Task {
    parts: TaskParts,
}

impl Task {
    /// Validates and wraps task state.
    pub fn from_parts(parts: TaskParts) -> AppResult<Self> {
        let title = NonEmptyString::new(parts.title.as_str())
            .map_err(|_| AppError::Validation("task title must not be empty".to_owned()))?;
        if title.as_str().chars().count() > TITLE_MAX_LENGTH {
            return Err(AppError::Validation(format!(
                "task title must not exceed {TITLE_MAX_LENGTH} characters"
            )));
        }

        validate_schedule(parts.start_date, Some(parts.end_date))?;

        Ok(Self { parts })
    }

    /// Starts a new task in `project_id`.
    pub fn create(project_id: ProjectId, draft: TaskDraft, now: DateTime<Utc>) -> AppResult<Self> {
        Self::from_parts(TaskParts {
            id: TaskId::new(),
            project_id,
            number: draft.number,
            title: draft.title,
            description: draft.description,
            status: draft.status,
            start_date: draft.start_date,
            end_date: draft.end_date,
            created_at: now,
            version: 1,
        })
    }

    /// Returns the identifier.
    #[must_use]
    pub fn id(&self) -> TaskId {
        self.parts.id
    }

    /// Returns the owning project.
    #[must_use]
    pub fn project_id(&self) -> ProjectId {
        self.parts.project_id
    }

    /// Returns the ordering number.
    #[must_use]
    pub fn number(&self) -> i32 {
        self.parts.number
    }

    /// Returns the title.
    #[must_use]
    pub fn title(&self) -> &str {
        self.parts.title.as_str()
    }

    /// Returns the description.
    #[must_use]
    pub fn description(&self) -> &str {
        self.parts.description.as_str()
    }

    /// Returns the status.
    #[must_use]
    pub fn status(&self) -> WorkStatus {
        self.parts.status
    }

    /// Returns the start date.
    #[must_use]
    pub fn start_date(&self) -> NaiveDate {
        self.parts.start_date
    }

    /// Returns the end date.
    #[must_use]
    pub fn end_date(&self) -> NaiveDate {
        self.parts.end_date
    }

    /// Returns the creation time.
    #[must_use]
    pub fn created_at(&self) -> DateTime<Utc> {
        self.parts.created_at
    }

    /// Returns the stored version.
    #[must_use]
    pub fn version(&self) -> i64 {
        self.parts.version
    }

    /// Returns the raw state.
    #[must_use]
    pub fn parts(&self) -> &TaskParts {
        &self.parts
    }

    /// Applies every submitted field and re-validates the result.
    pub fn with_patch(&self, patch: TaskPatch) -> AppResult<Self> {
        let mut parts = self.parts.clone();
        patch.number.apply_to(&mut parts.number);
        patch.title.apply_to(&mut parts.title);
        patch.description.apply_to(&mut parts.description);
        patch.status.apply_to(&mut parts.status);
        patch.start_date.apply_to(&mut parts.start_date);
        patch.end_date.apply_to(&mut parts.end_date);

        Self::from_parts(parts)
    }
}

/// Input for task creation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskDraft {
    /// Ordering number.
    pub number: i32,
    /// Title.
    pub title: String,
    /// Description.
    pub description: String,
    /// Initial status.
    pub status: WorkStatus,
    /// Start date.
    pub start_date: NaiveDate,
    /// End date.
    pub end_date: NaiveDate,
}

/// Partial task update.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskPatch {
    /// New ordering number.
    pub number: Patch<i32>,
    /// New title.
    pub title: Patch<String>,
    /// New description.
    pub description: Patch<String>,
    /// New status.
    pub status: Patch<WorkStatus>,
    /// New start date.
    pub start_date: Patch<NaiveDate>,
    /// New end date.
    pub end_date: Patch<NaiveDate>,
}

impl TouchedFields for TaskPatch {
    type Field = TaskField;

    fn touched_fields(&self) -> BTreeSet<TaskField> {
        [
            (self.number.is_present(), TaskField::Number),
            (self.title.is_present(), TaskField::Title),
            (self.description.is_present(), TaskField::Description),
            (self.status.is_present(), TaskField::Status),
            (self.start_date.is_present(), TaskField::StartDate),
            (self.end_date.is_present(), TaskField::EndDate),
        ]
        .into_iter()
        .filter_map(|(present, field)| present.then_some(field))
        .collect()
    }
}
