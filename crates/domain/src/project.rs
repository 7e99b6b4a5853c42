use std::collections::BTreeSet;

use chrono::{DateTime, NaiveDate, Utc};
use taskboard_core::{AppError, AppResult, NonEmptyString, Patch};

use crate::access::{Stakeholders, TouchedFields, TrackedField};
use crate::{FILENAME_MAX_LENGTH, ProjectId, UserId, WorkStatus, validate_schedule};

/// Maximum length of project and task titles.
pub const TITLE_MAX_LENGTH: usize = 255;

/// Maximum length of the project executor note.
pub const PROJECT_COMMENT_MAX_LENGTH: usize = 300;

/// Mutable project fields, as named on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ProjectField {
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
    /// `executor`
    Executor,
    /// `comment`
    Comment,
    /// `image`
    Image,
}

impl TrackedField for ProjectField {
    const ALL: &'static [Self] = &[
        Self::Title,
        Self::Description,
        Self::Status,
        Self::StartDate,
        Self::EndDate,
        Self::Executor,
        Self::Comment,
        Self::Image,
    ];

    fn as_str(&self) -> &'static str {
        match self {
            Self::Title => "title",
            Self::Description => "description",
            Self::Status => "status",
            Self::StartDate => "start_date",
            Self::EndDate => "end_date",
            Self::Executor => "executor",
            Self::Comment => "comment",
            Self::Image => "image",
        }
    }
}

/// Raw project state, used to build or restore a [`Project`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectParts {
    /// Identifier.
    pub id: ProjectId,
    /// Title.
    pub title: String,
    /// Free-form description.
    pub description: String,
    /// Lifecycle status.
    pub status: WorkStatus,
    /// First day of work.
    pub start_date: NaiveDate,
    /// Planned last day, if fixed.
    pub end_date: Option<NaiveDate>,
    /// Creator. Never changes.
    pub author: UserId,
    /// Assigned executor.
    pub executor: UserId,
    /// Short note attached to the project.
    pub comment: String,
    /// Uploaded illustration, if any.
    pub image: Option<ProjectImage>,
    /// Creation time.
    pub created_at: DateTime<Utc>,
    /// Last update time.
    pub updated_at: DateTime<Utc>,
    /// Optimistic concurrency version.
    pub version: i64,
}

/// Stored project image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectImage {
    /// Blob store key.
    pub content_ref: String,
    /// Client-supplied filename.
    pub filename: String,
}

/// A tracked project.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Project {
    parts: ProjectParts,
}

impl Project {
    /// Validates and wraps project state.
    pub fn from_parts(parts: ProjectParts) -> AppResult<Self> {
        let title = NonEmptyString::new(parts.title.as_str())
            .map_err(|_| AppError::Validation("project title must not be empty".to_owned()))?;
        if title.as_str().chars().count() > TITLE_MAX_LENGTH {
            return Err(AppError::Validation(format!(
                "project title must not exceed {TITLE_MAX_LENGTH} characters"
            )));
        }

        if parts.comment.chars().count() > PROJECT_COMMENT_MAX_LENGTH {
            return Err(AppError::Validation(format!(
                "project comment must not exceed {PROJECT_COMMENT_MAX_LENGTH} characters"
            )));
        }

        if let Some(image) = &parts.image {
            if image.filename.trim().is_empty() {
                return Err(AppError::Validation(
                    "project image filename must not be empty".to_owned(),
                ));
            }
            if image.filename.chars().count() > FILENAME_MAX_LENGTH {
                return Err(AppError::Validation(format!(
                    "project image filename must not exceed {FILENAME_MAX_LENGTH} characters"
                )));
            }
        }

        validate_schedule(parts.start_date, parts.end_date)?;

        Ok(Self { parts })
    }

    /// Starts a new project authored by `author`.
    pub fn create(draft: ProjectDraft, author: UserId, now: DateTime<Utc>) -> AppResult<Self> {
        Self::from_parts(ProjectParts {
            id: ProjectId::new(),
            title: draft.title,
            description: draft.description,
            status: draft.status,
            start_date: draft.start_date,
            end_date: draft.end_date,
            author,
            executor: draft.executor,
            comment: draft.comment,
            image: None,
            created_at: now,
            updated_at: now,
            version: 1,
        })
    }

    /// Returns the identifier.
    #[must_use]
    pub fn id(&self) -> ProjectId {
        self.parts.id
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

    /// Returns the end date, if set.
    #[must_use]
    pub fn end_date(&self) -> Option<NaiveDate> {
        self.parts.end_date
    }

    /// Returns the author.
    #[must_use]
    pub fn author(&self) -> UserId {
        self.parts.author
    }

    /// Returns the executor.
    #[must_use]
    pub fn executor(&self) -> UserId {
        self.parts.executor
    }

    /// Returns the project note.
    #[must_use]
    pub fn comment(&self) -> &str {
        self.parts.comment.as_str()
    }

    /// Returns the project image, if one was uploaded.
    #[must_use]
    pub fn image(&self) -> Option<&ProjectImage> {
        self.parts.image.as_ref()
    }

    /// Returns the creation time.
    #[must_use]
    pub fn created_at(&self) -> DateTime<Utc> {
        self.parts.created_at
    }

    /// Returns the last update time.
    #[must_use]
    pub fn updated_at(&self) -> DateTime<Utc> {
        self.parts.updated_at
    }

    /// Returns the stored version.
    #[must_use]
    pub fn version(&self) -> i64 {
        self.parts.version
    }

    /// Returns the author and executor pair.
    #[must_use]
    pub fn stakeholders(&self) -> Stakeholders {
        Stakeholders::new(self.parts.author, self.parts.executor)
    }

    /// Returns the raw state.
    #[must_use]
    pub fn parts(&self) -> &ProjectParts {
        &self.parts
    }

    /// Applies every submitted field and re-validates the result.
    ///
    /// The receiver is untouched on error. The version is not bumped here;
    /// the repository does that when it persists.
    pub fn with_patch(&self, patch: ProjectPatch, now: DateTime<Utc>) -> AppResult<Self> {
        let mut parts = self.parts.clone();
        patch.title.apply_to(&mut parts.title);
        patch.description.apply_to(&mut parts.description);
        patch.status.apply_to(&mut parts.status);
        patch.start_date.apply_to(&mut parts.start_date);
        patch.end_date.apply_to(&mut parts.end_date);
        patch.executor.apply_to(&mut parts.executor);
        patch.comment.apply_to(&mut parts.comment);
        parts.updated_at = now;

        Self::from_parts(parts)
    }

    /// Replaces or clears the image and re-validates the result.
    pub fn with_image(&self, image: Option<ProjectImage>, now: DateTime<Utc>) -> AppResult<Self> {
        let mut parts = self.parts.clone();
        parts.image = image;
        parts.updated_at = now;

        Self::from_parts(parts)
    }
}

/// Input for project creation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectDraft {
    /// Title.
    pub title: String,
    /// Description.
    pub description: String,
    /// Initial status.
    pub status: WorkStatus,
    /// Start date.
    pub start_date: NaiveDate,
    /// Optional end date.
    pub end_date: Option<NaiveDate>,
    /// Assigned executor.
    pub executor: UserId,
    /// Project note.
    pub comment: String,
}

/// Partial project update. Each field records whether it was submitted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProjectPatch {
    /// New title.
    pub title: Patch<String>,
    /// New description.
    pub description: Patch<String>,
    /// New status.
    pub status: Patch<WorkStatus>,
    /// New start date.
    pub start_date: Patch<NaiveDate>,
    /// New end date. `Present(None)` clears it.
    pub end_date: Patch<Option<NaiveDate>>,
    /// New executor.
    pub executor: Patch<UserId>,
    /// New project note.
    pub comment: Patch<String>,
}

impl TouchedFields for ProjectPatch {
    type Field = ProjectField;

    fn touched_fields(&self) -> BTreeSet<ProjectField> {
        [
            (self.title.is_present(), ProjectField::Title),
            (self.description.is_present(), ProjectField::Description),
            (self.status.is_present(), ProjectField::Status),
            (self.start_date.is_present(), ProjectField::StartDate),
            (self.end_date.is_present(), ProjectField::EndDate),
            (self.executor.is_present(), ProjectField::Executor),
            (self.comment.is_present(), ProjectField::Comment),
        ]
        .into_iter()
        .filter_map(|(present, field)| present.then_some(field))
        .collect()
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use chrono::{NaiveDate, Utc};
    use taskboard_core::Patch;

    use super::{Project, ProjectDraft, ProjectField, ProjectImage, ProjectPatch};
    use crate::access::{TouchedFields, TrackedField};
    use crate::{UserId, WorkStatus};

    fn date(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 4, day).unwrap_or_else(|| panic!("invalid test date"))
    }

    fn draft() -> ProjectDraft {
        ProjectDraft {
            title: "Warehouse move".to_owned(),
            description: "Move stock to the new site".to_owned(),
            status: WorkStatus::Open,
            start_date: date(1),
            end_date: Some(date(20)),
            executor: UserId::new(),
            comment: String::new(),
        }
    }

    #[test]
    fn create_rejects_end_before_start() {
        let mut draft = draft();
        draft.end_date = Some(date(1).pred_opt().unwrap_or_else(|| panic!("test")));
        assert!(Project::create(draft, UserId::new(), Utc::now()).is_err());
    }

    #[test]
    fn create_rejects_blank_title() {
        let mut draft = draft();
        draft.title = "   ".to_owned();
        assert!(Project::create(draft, UserId::new(), Utc::now()).is_err());
    }

    #[test]
    fn touched_fields_follow_presence_not_value() {
        let project = Project::create(draft(), UserId::new(), Utc::now())
            .unwrap_or_else(|_| panic!("test"));
        let patch = ProjectPatch {
            status: Patch::Present(project.status()),
            end_date: Patch::Present(None),
            ..ProjectPatch::default()
        };
        assert_eq!(
            patch.touched_fields(),
            BTreeSet::from([ProjectField::Status, ProjectField::EndDate])
        );
        assert!(ProjectPatch::default().touched_fields().is_empty());
    }

    #[test]
    fn with_patch_validates_merged_schedule() {
        let project = Project::create(draft(), UserId::new(), Utc::now())
            .unwrap_or_else(|_| panic!("test"));
        let patch = ProjectPatch {
            start_date: Patch::Present(date(25)),
            ..ProjectPatch::default()
        };
        assert!(project.with_patch(patch, Utc::now()).is_err());
        assert_eq!(project.start_date(), date(1));
    }

    #[test]
    fn with_patch_applies_submitted_fields() {
        let project = Project::create(draft(), UserId::new(), Utc::now())
            .unwrap_or_else(|_| panic!("test"));
        let patch = ProjectPatch {
            status: Patch::Present(WorkStatus::Done),
            end_date: Patch::Present(None),
            ..ProjectPatch::default()
        };
        let updated = project
            .with_patch(patch, Utc::now())
            .unwrap_or_else(|_| panic!("test"));
        assert_eq!(updated.status(), WorkStatus::Done);
        assert_eq!(updated.end_date(), None);
        assert_eq!(updated.title(), project.title());
        assert_eq!(updated.author(), project.author());
    }

    #[test]
    fn with_image_sets_and_clears_the_image() {
        let project = Project::create(draft(), UserId::new(), Utc::now())
            .unwrap_or_else(|_| panic!("test"));
        assert!(project.image().is_none());

        let image = ProjectImage {
            content_ref: "0b7c.png".to_owned(),
            filename: "site-plan.png".to_owned(),
        };
        let illustrated = project
            .with_image(Some(image.clone()), Utc::now())
            .unwrap_or_else(|_| panic!("test"));
        assert_eq!(illustrated.image(), Some(&image));
        assert_eq!(illustrated.title(), project.title());

        let cleared = illustrated
            .with_image(None, Utc::now())
            .unwrap_or_else(|_| panic!("test"));
        assert!(cleared.image().is_none());
    }

    #[test]
    fn with_image_rejects_blank_filename() {
        let project = Project::create(draft(), UserId::new(), Utc::now())
            .unwrap_or_else(|_| panic!("test"));
        let image = ProjectImage {
            content_ref: "0b7c".to_owned(),
            filename: "  ".to_owned(),
        };
        assert!(project.with_image(Some(image), Utc::now()).is_err());
    }

    #[test]
    fn fields_resolve_from_transport_names() {
        for field in ProjectField::ALL {
            assert_eq!(ProjectField::from_wire(field.as_str()), Some(*field));
        }
        assert_eq!(ProjectField::from_wire("author"), None);
    }
}
