use async_trait::async_trait;
use chrono::NaiveDate;
use taskboard_core::{AppError, AppResult};
use taskboard_domain::{Project, ProjectId, UserId, WorkStatus};

/// Column used to order project listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ProjectSortField {
    /// Creation time.
    #[default]
    CreatedAt,
    /// Title, alphabetical.
    Title,
    /// Start date.
    StartDate,
    /// End date.
    EndDate,
    /// Status code.
    Status,
}

/// Ordering for project listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProjectSort {
    /// Sort column.
    pub field: ProjectSortField,
    /// Whether to sort in descending order.
    pub descending: bool,
}

impl Default for ProjectSort {
    fn default() -> Self {
        Self {
            field: ProjectSortField::CreatedAt,
            descending: true,
        }
    }
}

impl ProjectSort {
    /// Parses a transport value such as `title` or `-created_at`.
    pub fn parse_transport(value: &str) -> AppResult<Self> {
        let (descending, name) = match value.strip_prefix('-') {
            Some(name) => (true, name),
            None => (false, value),
        };

        let field = match name {
            "created_at" => ProjectSortField::CreatedAt,
            "title" => ProjectSortField::Title,
            "start_date" => ProjectSortField::StartDate,
            "end_date" => ProjectSortField::EndDate,
            "status" => ProjectSortField::Status,
            _ => {
                return Err(AppError::Validation(format!(
                    "unknown project sort '{value}'"
                )));
            }
        };

        Ok(Self { field, descending })
    }
}

/// Filters and ordering for project listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ProjectListQuery {
    /// Only projects in this status.
    pub status: Option<WorkStatus>,
    /// Only projects starting on this date.
    pub start_date: Option<NaiveDate>,
    /// Only projects ending on or before this date.
    pub end_date_until: Option<NaiveDate>,
    /// Only projects assigned to this executor.
    pub executor: Option<UserId>,
    /// Result ordering.
    pub sort: ProjectSort,
}

impl ProjectListQuery {
    /// Returns whether `project` passes every filter.
    #[must_use]
    pub fn matches(&self, project: &Project) -> bool {
        self.status.is_none_or(|status| project.status() == status)
            && self
                .start_date
                .is_none_or(|start_date| project.start_date() == start_date)
            && self.end_date_until.is_none_or(|until| {
                project
                    .end_date()
                    .is_some_and(|end_date| end_date <= until)
            })
            && self
                .executor
                .is_none_or(|executor| project.executor() == executor)
    }
}

/// Repository port for projects.
#[async_trait]
pub trait ProjectRepository: Send + Sync {
    /// Inserts a new project.
    async fn create_project(&self, project: &Project) -> AppResult<()>;

    /// Finds a project by id.
    async fn find_project(&self, project_id: ProjectId) -> AppResult<Option<Project>>;

    /// Lists projects matching the query.
    async fn list_projects(&self, query: &ProjectListQuery) -> AppResult<Vec<Project>>;

    /// Persists `project` when the stored version still equals
    /// `expected_version`, returning the stored row with its new version.
    ///
    /// Returns `Conflict` on a version mismatch and `NotFound` when the row
    /// is gone.
    async fn update_project(&self, project: &Project, expected_version: i64) -> AppResult<Project>;

    /// Deletes a project together with its tasks, comments and attachments.
    async fn delete_project(&self, project_id: ProjectId) -> AppResult<()>;
}

#[cfg(test)]
mod tests {
    use super::{ProjectSort, ProjectSortField};

    #[test]
    fn sort_defaults_to_newest_first() {
        let sort = ProjectSort::default();
        assert_eq!(sort.field, ProjectSortField::CreatedAt);
        assert!(sort.descending);
    }

    #[test]
    fn sort_parses_direction_prefix() {
        let sort = ProjectSort::parse_transport("-end_date").unwrap_or_default();
        assert_eq!(sort.field, ProjectSortField::EndDate);
        assert!(sort.descending);

        let sort = ProjectSort::parse_transport("title").unwrap_or_default();
        assert_eq!(sort.field, ProjectSortField::Title);
        assert!(!sort.descending);
    }

    #[test]
    fn unknown_sort_is_rejected() {
        assert!(ProjectSort::parse_transport("password").is_err());
    }
}
