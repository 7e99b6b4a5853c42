use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use taskboard_application::{CreateProjectInput, ProjectDetails, ProjectListQuery, ProjectSort};
use taskboard_core::{AppError, Patch};
use taskboard_domain::{Project, ProjectPatch, UserId, WorkStatus};
use ts_rs::TS;
use uuid::Uuid;

use super::comments::CommentResponse;

/// Incoming payload for project creation.
#[derive(Debug, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/create-project-request.ts"
)]
pub struct CreateProjectRequest {
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub status: Option<i16>,
    #[ts(type = "string")]
    pub start_date: NaiveDate,
    #[ts(type = "string | null")]
    pub end_date: Option<NaiveDate>,
    #[ts(type = "string | null")]
    pub executor: Option<Uuid>,
    pub comment: Option<String>,
}

impl TryFrom<CreateProjectRequest> for CreateProjectInput {
    type Error = AppError;

    fn try_from(value: CreateProjectRequest) -> Result<Self, Self::Error> {
        Ok(Self {
            title: value.title,
            description: value.description,
            status: value.status.map(WorkStatus::from_code).transpose()?,
            start_date: value.start_date,
            end_date: value.end_date,
            executor: value.executor.map(UserId::from_uuid),
            comment: value.comment,
        })
    }
}

/// Incoming partial update for a project. Only submitted keys are applied.
#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct UpdateProjectRequest {
    pub title: Patch<String>,
    pub description: Patch<String>,
    pub status: Patch<WorkStatus>,
    pub start_date: Patch<NaiveDate>,
    pub end_date: Patch<Option<NaiveDate>>,
    pub executor: Patch<UserId>,
    pub comment: Patch<String>,
}

impl From<UpdateProjectRequest> for ProjectPatch {
    fn from(value: UpdateProjectRequest) -> Self {
        Self {
            title: value.title,
            description: value.description,
            status: value.status,
            start_date: value.start_date,
            end_date: value.end_date,
            executor: value.executor,
            comment: value.comment,
        }
    }
}

/// Query string filters for the project list.
#[derive(Debug, Default, Deserialize)]
pub struct ProjectListParams {
    pub status: Option<i16>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub executor: Option<Uuid>,
    pub sort: Option<String>,
}

impl TryFrom<ProjectListParams> for ProjectListQuery {
    type Error = AppError;

    fn try_from(value: ProjectListParams) -> Result<Self, Self::Error> {
        let sort = match value.sort.as_deref().map(str::trim) {
            None | Some("") => ProjectSort::default(),
            Some(sort) => ProjectSort::parse_transport(sort)?,
        };

        Ok(Self {
            status: value.status.map(WorkStatus::from_code).transpose()?,
            start_date: value.start_date,
            end_date_until: value.end_date,
            executor: value.executor.map(UserId::from_uuid),
            sort,
        })
    }
}

/// API representation of a project.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/project-response.ts"
)]
pub struct ProjectResponse {
    pub id: String,
    pub title: String,
    pub description: String,
    pub status: i16,
    pub start_date: String,
    pub end_date: Option<String>,
    pub author: String,
    pub executor: String,
    pub comment: String,
    pub image_filename: Option<String>,
    pub created_at: String,
    pub updated_at: String,
    pub version: i64,
}

impl From<Project> for ProjectResponse {
    fn from(project: Project) -> Self {
        Self {
            id: project.id().to_string(),
            title: project.title().to_owned(),
            description: project.description().to_owned(),
            status: project.status().code(),
            start_date: project.start_date().to_string(),
            end_date: project.end_date().map(|date| date.to_string()),
            author: project.author().to_string(),
            executor: project.executor().to_string(),
            comment: project.comment().to_owned(),
            image_filename: project.image().map(|image| image.filename.clone()),
            created_at: project.created_at().to_rfc3339(),
            updated_at: project.updated_at().to_rfc3339(),
            version: project.version(),
        }
    }
}

/// A project with its comments.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/project-details-response.ts"
)]
pub struct ProjectDetailsResponse {
    #[serde(flatten)]
    #[ts(flatten)]
    pub project: ProjectResponse,
    pub comments: Vec<CommentResponse>,
}

impl From<ProjectDetails> for ProjectDetailsResponse {
    fn from(value: ProjectDetails) -> Self {
        Self {
            project: ProjectResponse::from(value.project),
            comments: value
                .comments
                .into_iter()
                .map(CommentResponse::from)
                .collect(),
        }
    }
}
