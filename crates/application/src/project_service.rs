use std::collections::BTreeSet;
use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use taskboard_core::{AppError, AppResult, UserIdentity};
use taskboard_domain::access::TouchedFields;
use taskboard_domain::{
    Actor, Comment, CommentTarget, Project, ProjectDraft, ProjectField, ProjectId,
    ProjectImage, ProjectPatch, UserId, WorkStatus,
};
use tracing::{info, warn};

use crate::{
    ActorDirectory, AuthorizationService, BlobStore, CommentRepository, ProjectListQuery,
    ProjectRepository, TaskFileRepository, UploadedFile,
};

/// Input payload for project creation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateProjectInput {
    /// Title.
    pub title: String,
    /// Description.
    pub description: String,
    /// Initial status. Defaults to open.
    pub status: Option<WorkStatus>,
    /// Start date.
    pub start_date: NaiveDate,
    /// Optional end date.
    pub end_date: Option<NaiveDate>,
    /// Assigned executor. Required.
    pub executor: Option<UserId>,
    /// Optional project note.
    pub comment: Option<String>,
}

/// Project together with its comments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectDetails {
    /// The project.
    pub project: Project,
    /// Project comments, oldest first.
    pub comments: Vec<Comment>,
}

/// Project image metadata together with its content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectImageDownload {
    /// Image metadata.
    pub image: ProjectImage,
    /// Stored bytes.
    pub bytes: Vec<u8>,
}

/// Application service for project use-cases.
#[derive(Clone)]
pub struct ProjectService {
    actors: ActorDirectory,
    authorization: AuthorizationService,
    projects: Arc<dyn ProjectRepository>,
    comments: Arc<dyn CommentRepository>,
    task_files: Arc<dyn TaskFileRepository>,
    blobs: Arc<dyn BlobStore>,
}

impl ProjectService {
    /// Creates the service.
    #[must_use]
    pub fn new(
        actors: ActorDirectory,
        authorization: AuthorizationService,
        projects: Arc<dyn ProjectRepository>,
        comments: Arc<dyn CommentRepository>,
        task_files: Arc<dyn TaskFileRepository>,
        blobs: Arc<dyn BlobStore>,
    ) -> Self {
        Self {
            actors,
            authorization,
            projects,
            comments,
            task_files,
            blobs,
        }
    }

    /// Lists projects matching the query.
    pub async fn list_projects(&self, query: &ProjectListQuery) -> AppResult<Vec<Project>> {
        self.projects.list_projects(query).await
    }

    /// Returns a project with its comments.
    pub async fn get_project(&self, project_id: ProjectId) -> AppResult<ProjectDetails> {
        let project = self.load(project_id).await?;
        let comments = self
            .comments
            .list_comments(CommentTarget::Project(project_id))
            .await?;

        Ok(ProjectDetails { project, comments })
    }

    /// Creates a project authored by the caller.
    pub async fn create_project(
        &self,
        identity: &UserIdentity,
        input: CreateProjectInput,
    ) -> AppResult<Project> {
        let actor = self.actors.resolve(identity).await?;
        self.authorization.require_project_creation(&actor)?;

        let executor = input
            .executor
            .ok_or_else(|| AppError::Validation("executor is required".to_owned()))?;
        if !self.actors.user_exists(executor).await? {
            return Err(AppError::NotFound(format!(
                "executor '{executor}' does not exist"
            )));
        }

        let project = Project::create(
            ProjectDraft {
                title: input.title,
                description: input.description,
                status: input.status.unwrap_or_default(),
                start_date: input.start_date,
                end_date: input.end_date,
                executor,
                comment: input.comment.unwrap_or_default(),
            },
            actor.user_id(),
            Utc::now(),
        )?;

        self.projects.create_project(&project).await?;
        info!(
            user_id = %actor.user_id(),
            project_id = %project.id(),
            "project created"
        );
        Ok(project)
    }

    /// Checks the submitted field names before their values are decoded.
    pub async fn check_project_update(
        &self,
        identity: &UserIdentity,
        project_id: ProjectId,
        attempted: &BTreeSet<ProjectField>,
    ) -> AppResult<()> {
        let actor = self.actors.resolve(identity).await?;
        let project = self.load(project_id).await?;
        self.authorization
            .authorize_project_fields(&actor, &project, attempted)
    }

    /// Applies a partial update when every submitted field is allowed.
    ///
    /// An empty patch returns the stored project unchanged.
    pub async fn update_project(
        &self,
        identity: &UserIdentity,
        project_id: ProjectId,
        patch: ProjectPatch,
    ) -> AppResult<Project> {
        let actor = self.actors.resolve(identity).await?;
        let project = self.load(project_id).await?;
        self.authorization
            .authorize_project_update(&actor, &project, &patch)?;

        if patch.touched_fields().is_empty() {
            return Ok(project);
        }

        if let Some(executor) = patch.executor.value()
            && !self.actors.user_exists(*executor).await?
        {
            return Err(AppError::NotFound(format!(
                "executor '{executor}' does not exist"
            )));
        }

        let updated = project.with_patch(patch, Utc::now())?;
        let stored = self
            .projects
            .update_project(&updated, project.version())
            .await?;

        info!(
            user_id = %actor.user_id(),
            project_id = %project_id,
            version = stored.version(),
            "project updated"
        );
        Ok(stored)
    }

    /// Deletes a project with everything under it.
    pub async fn delete_project(
        &self,
        identity: &UserIdentity,
        project_id: ProjectId,
    ) -> AppResult<()> {
        let actor = self.actors.resolve(identity).await?;
        let project = self.load(project_id).await?;
        self.authorization.require_project_control(&actor, &project)?;

        let mut content_refs = self
            .task_files
            .list_content_refs_for_project(project_id)
            .await?;
        content_refs.extend(project.image().map(|image| image.content_ref.clone()));
        self.projects.delete_project(project_id).await?;
        remove_blobs(self.blobs.as_ref(), &content_refs).await;

        info!(
            user_id = %actor.user_id(),
            project_id = %project_id,
            removed_files = content_refs.len(),
            "project deleted"
        );
        Ok(())
    }

    /// Stores an uploaded image and attaches it to the project, replacing
    /// any previous one.
    ///
    /// `file` is `None` when the request carried no image part.
    pub async fn set_project_image(
        &self,
        identity: &UserIdentity,
        project_id: ProjectId,
        file: Option<UploadedFile>,
    ) -> AppResult<Project> {
        let actor = self.actors.resolve(identity).await?;
        let project = self.load(project_id).await?;
        self.authorize_image_change(&actor, &project)?;

        let file = file.ok_or_else(|| AppError::MissingAttachment("image".to_owned()))?;
        let content_ref = self.blobs.store(&file.filename, file.bytes).await?;
        let image = ProjectImage {
            content_ref: content_ref.clone(),
            filename: file.filename,
        };

        let stored = match self.replace_image(&project, Some(image)).await {
            Ok(stored) => stored,
            Err(error) => {
                remove_blobs(self.blobs.as_ref(), &[content_ref]).await;
                return Err(error);
            }
        };

        info!(
            user_id = %actor.user_id(),
            project_id = %project_id,
            version = stored.version(),
            "project image uploaded"
        );
        Ok(stored)
    }

    /// Detaches the project image. A project without one is returned as is.
    pub async fn remove_project_image(
        &self,
        identity: &UserIdentity,
        project_id: ProjectId,
    ) -> AppResult<Project> {
        let actor = self.actors.resolve(identity).await?;
        let project = self.load(project_id).await?;
        self.authorize_image_change(&actor, &project)?;

        if project.image().is_none() {
            return Ok(project);
        }

        let stored = self.replace_image(&project, None).await?;
        info!(
            user_id = %actor.user_id(),
            project_id = %project_id,
            version = stored.version(),
            "project image removed"
        );
        Ok(stored)
    }

    /// Returns the project image with its content.
    pub async fn download_project_image(
        &self,
        project_id: ProjectId,
    ) -> AppResult<ProjectImageDownload> {
        let project = self.load(project_id).await?;
        let image = project.image().cloned().ok_or_else(|| {
            AppError::NotFound(format!("project '{project_id}' has no image"))
        })?;
        let bytes = self.blobs.load(&image.content_ref).await?;

        Ok(ProjectImageDownload { image, bytes })
    }

    fn authorize_image_change(
        &self,
        actor: &Actor,
        project: &Project,
    ) -> AppResult<()> {
        self.authorization.authorize_project_fields(
            actor,
            project,
            &BTreeSet::from([ProjectField::Image]),
        )
    }

    /// Persists the new image and drops the previous blob.
    async fn replace_image(
        &self,
        project: &Project,
        image: Option<ProjectImage>,
    ) -> AppResult<Project> {
        let updated = project.with_image(image, Utc::now())?;
        let stored = self
            .projects
            .update_project(&updated, project.version())
            .await?;

        if let Some(previous) = project.image() {
            remove_blobs(self.blobs.as_ref(), &[previous.content_ref.clone()]).await;
        }
        Ok(stored)
    }

    async fn load(&self, project_id: ProjectId) -> AppResult<Project> {
        load_project(self.projects.as_ref(), project_id).await
    }
}

pub(crate) async fn load_project(
    projects: &dyn ProjectRepository,
    project_id: ProjectId,
) -> AppResult<Project> {
    projects
        .find_project(project_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("project '{project_id}' does not exist")))
}

/// Removes stored blobs after their records are gone. Failures are logged.
pub(crate) async fn remove_blobs(blobs: &dyn BlobStore, content_refs: &[String]) {
    for content_ref in content_refs {
        if let Err(error) = blobs.remove(content_ref).await {
            warn!(content_ref = %content_ref, %error, "failed to remove stored blob");
        }
    }
}
