use std::sync::Arc;

use chrono::Utc;
use taskboard_core::{AppError, AppResult, UserIdentity};
use taskboard_domain::{Comment, CommentId, CommentTarget, Project, ProjectId, TaskId};
use tracing::info;

use crate::project_service::load_project;
use crate::task_service::load_task;
use crate::{
    ActorDirectory, AuthorizationService, CommentRepository, ProjectRepository, TaskRepository,
};

/// Where a comment lives, as addressed by a request path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommentScope {
    /// Comments on the project itself.
    Project(ProjectId),
    /// Comments on one task of the project.
    Task {
        /// Owning project.
        project_id: ProjectId,
        /// Commented task.
        task_id: TaskId,
    },
}

impl CommentScope {
    /// Returns the project that governs comment permissions.
    #[must_use]
    pub fn project_id(&self) -> ProjectId {
        match self {
            Self::Project(project_id) | Self::Task { project_id, .. } => *project_id,
        }
    }
}

/// Application service for project and task comments.
#[derive(Clone)]
pub struct CommentService {
    actors: ActorDirectory,
    authorization: AuthorizationService,
    projects: Arc<dyn ProjectRepository>,
    tasks: Arc<dyn TaskRepository>,
    comments: Arc<dyn CommentRepository>,
}

impl CommentService {
    /// Creates the service.
    #[must_use]
    pub fn new(
        actors: ActorDirectory,
        authorization: AuthorizationService,
        projects: Arc<dyn ProjectRepository>,
        tasks: Arc<dyn TaskRepository>,
        comments: Arc<dyn CommentRepository>,
    ) -> Self {
        Self {
            actors,
            authorization,
            projects,
            tasks,
            comments,
        }
    }

    /// Lists comments in a scope, oldest first.
    pub async fn list_comments(&self, scope: CommentScope) -> AppResult<Vec<Comment>> {
        let (_, target) = self.resolve_scope(scope).await?;
        self.comments.list_comments(target).await
    }

    /// Adds a comment written by the caller.
    pub async fn create_comment(
        &self,
        identity: &UserIdentity,
        scope: CommentScope,
        text: String,
    ) -> AppResult<Comment> {
        let actor = self.actors.resolve(identity).await?;
        let (project, target) = self.resolve_scope(scope).await?;
        self.authorization
            .require_comment_creation(&actor, &project)?;

        let comment = Comment::new(CommentId::new(), target, actor.user_id(), text, Utc::now())?;
        self.comments.create_comment(&comment).await?;

        info!(
            user_id = %actor.user_id(),
            project_id = %project.id(),
            comment_id = %comment.id(),
            "comment created"
        );
        Ok(comment)
    }

    /// Replaces the text of a comment.
    pub async fn update_comment(
        &self,
        identity: &UserIdentity,
        scope: CommentScope,
        comment_id: CommentId,
        text: String,
    ) -> AppResult<Comment> {
        let actor = self.actors.resolve(identity).await?;
        let (project, target) = self.resolve_scope(scope).await?;
        let comment = self.load(target, comment_id).await?;
        self.authorization
            .require_comment_modification(&actor, &project, &comment)?;

        let updated = comment.with_text(text)?;
        self.comments.update_comment(&updated).await?;

        info!(
            user_id = %actor.user_id(),
            project_id = %project.id(),
            comment_id = %comment_id,
            "comment updated"
        );
        Ok(updated)
    }

    /// Deletes a comment.
    pub async fn delete_comment(
        &self,
        identity: &UserIdentity,
        scope: CommentScope,
        comment_id: CommentId,
    ) -> AppResult<()> {
        let actor = self.actors.resolve(identity).await?;
        let (project, target) = self.resolve_scope(scope).await?;
        let comment = self.load(target, comment_id).await?;
        self.authorization
            .require_comment_modification(&actor, &project, &comment)?;

        self.comments.delete_comment(comment_id).await?;

        info!(
            user_id = %actor.user_id(),
            project_id = %project.id(),
            comment_id = %comment_id,
            "comment deleted"
        );
        Ok(())
    }

    async fn resolve_scope(&self, scope: CommentScope) -> AppResult<(Project, CommentTarget)> {
        let project = load_project(self.projects.as_ref(), scope.project_id()).await?;
        let target = match scope {
            CommentScope::Project(project_id) => CommentTarget::Project(project_id),
            CommentScope::Task {
                project_id,
                task_id,
            } => {
                load_task(self.tasks.as_ref(), project_id, task_id).await?;
                CommentTarget::Task(task_id)
            }
        };

        Ok((project, target))
    }

    async fn load(&self, target: CommentTarget, comment_id: CommentId) -> AppResult<Comment> {
        self.comments
            .find_comment(target, comment_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("comment '{comment_id}' does not exist")))
    }
}
