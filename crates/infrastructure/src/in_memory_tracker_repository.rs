use std::cmp::Ordering;
use std::collections::HashMap;

use async_trait::async_trait;
use taskboard_application::{
    CommentRepository, ProjectListQuery, ProjectRepository, ProjectSort, ProjectSortField,
    TaskFileRepository, TaskRepository,
};
use taskboard_core::{AppError, AppResult};
use taskboard_domain::{
    Comment, CommentId, CommentTarget, Project, ProjectId, ProjectParts, Task, TaskFile,
    TaskFileId, TaskId, TaskParts,
};
use tokio::sync::RwLock;

/// In-memory tracker repository implementation.
///
/// Deletes cascade the way the Postgres foreign keys do.
#[derive(Debug, Default)]
pub struct InMemoryTrackerRepository {
    projects: RwLock<HashMap<ProjectId, Project>>,
    tasks: RwLock<HashMap<TaskId, Task>>,
    comments: RwLock<HashMap<CommentId, Comment>>,
    task_files: RwLock<HashMap<TaskFileId, TaskFile>>,
}

impl InMemoryTrackerRepository {
    /// Creates an empty in-memory repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    async fn remove_task_children(&self, task_ids: &[TaskId]) {
        self.comments.write().await.retain(|_, comment| {
            comment
                .target()
                .task_id()
                .is_none_or(|task_id| !task_ids.contains(&task_id))
        });
        self.task_files
            .write()
            .await
            .retain(|_, task_file| !task_ids.contains(&task_file.task_id()));
    }
}

fn compare_projects(sort: ProjectSort, left: &Project, right: &Project) -> Ordering {
    let ordering = match sort.field {
        ProjectSortField::CreatedAt => left.created_at().cmp(&right.created_at()),
        ProjectSortField::Title => left.title().cmp(right.title()),
        ProjectSortField::StartDate => left.start_date().cmp(&right.start_date()),
        ProjectSortField::Status => left.status().code().cmp(&right.status().code()),
        ProjectSortField::EndDate => {
            // Missing end dates sort last in either direction.
            match (left.end_date(), right.end_date()) {
                (Some(left_end), Some(right_end)) => {
                    let ordering = left_end.cmp(&right_end);
                    if sort.descending {
                        ordering.reverse()
                    } else {
                        ordering
                    }
                }
                (Some(_), None) => Ordering::Less,
                (None, Some(_)) => Ordering::Greater,
                (None, None) => Ordering::Equal,
            }
        }
    };

    let ordering = if sort.descending && sort.field != ProjectSortField::EndDate {
        ordering.reverse()
    } else {
        ordering
    };

    ordering.then_with(|| left.id().as_uuid().cmp(&right.id().as_uuid()))
}

#[async_trait]
impl ProjectRepository for InMemoryTrackerRepository {
    async fn create_project(&self, project: &Project) -> AppResult<()> {
        let mut projects = self.projects.write().await;
        if projects.contains_key(&project.id()) {
            return Err(AppError::Conflict(format!(
                "project '{}' already exists",
                project.id()
            )));
        }

        projects.insert(project.id(), project.clone());
        Ok(())
    }

    async fn find_project(&self, project_id: ProjectId) -> AppResult<Option<Project>> {
        Ok(self.projects.read().await.get(&project_id).cloned())
    }

    async fn list_projects(&self, query: &ProjectListQuery) -> AppResult<Vec<Project>> {
        let mut listed: Vec<Project> = self
            .projects
            .read()
            .await
            .values()
            .filter(|project| query.matches(project))
            .cloned()
            .collect();
        listed.sort_by(|left, right| compare_projects(query.sort, left, right));

        Ok(listed)
    }

    async fn update_project(&self, project: &Project, expected_version: i64) -> AppResult<Project> {
        let mut projects = self.projects.write().await;
        let Some(stored) = projects.get(&project.id()) else {
            return Err(AppError::NotFound(format!(
                "project '{}' does not exist",
                project.id()
            )));
        };

        if stored.version() != expected_version {
            return Err(AppError::Conflict(format!(
                "project '{}' was modified concurrently, reload and retry",
                project.id()
            )));
        }

        let updated = Project::from_parts(ProjectParts {
            version: expected_version + 1,
            ..project.parts().clone()
        })?;
        projects.insert(updated.id(), updated.clone());

        Ok(updated)
    }

    async fn delete_project(&self, project_id: ProjectId) -> AppResult<()> {
        if self.projects.write().await.remove(&project_id).is_none() {
            return Err(AppError::NotFound(format!(
                "project '{project_id}' does not exist"
            )));
        }

        let task_ids: Vec<TaskId> = {
            let mut tasks = self.tasks.write().await;
            let task_ids = tasks
                .values()
                .filter(|task| task.project_id() == project_id)
                .map(Task::id)
                .collect::<Vec<_>>();
            tasks.retain(|_, task| task.project_id() != project_id);
            task_ids
        };

        self.comments
            .write()
            .await
            .retain(|_, comment| comment.target().project_id() != Some(project_id));
        self.remove_task_children(&task_ids).await;

        Ok(())
    }
}

#[async_trait]
impl TaskRepository for InMemoryTrackerRepository {
    async fn create_task(&self, task: &Task) -> AppResult<()> {
        if !self.projects.read().await.contains_key(&task.project_id()) {
            return Err(AppError::NotFound(format!(
                "project '{}' does not exist",
                task.project_id()
            )));
        }

        self.tasks.write().await.insert(task.id(), task.clone());
        Ok(())
    }

    async fn find_task(&self, project_id: ProjectId, task_id: TaskId) -> AppResult<Option<Task>> {
        Ok(self
            .tasks
            .read()
            .await
            .get(&task_id)
            .filter(|task| task.project_id() == project_id)
            .cloned())
    }

    async fn list_tasks(&self, project_id: ProjectId) -> AppResult<Vec<Task>> {
        let mut listed: Vec<Task> = self
            .tasks
            .read()
            .await
            .values()
            .filter(|task| task.project_id() == project_id)
            .cloned()
            .collect();
        listed.sort_by(|left, right| {
            left.number()
                .cmp(&right.number())
                .then_with(|| left.created_at().cmp(&right.created_at()))
        });

        Ok(listed)
    }

    async fn update_task(&self, task: &Task, expected_version: i64) -> AppResult<Task> {
        let mut tasks = self.tasks.write().await;
        let Some(stored) = tasks.get(&task.id()) else {
            return Err(AppError::NotFound(format!(
                "task '{}' does not exist",
                task.id()
            )));
        };

        if stored.version() != expected_version {
            return Err(AppError::Conflict(format!(
                "task '{}' was modified concurrently, reload and retry",
                task.id()
            )));
        }

        let updated = Task::from_parts(TaskParts {
            version: expected_version + 1,
            ..task.parts().clone()
        })?;
        tasks.insert(updated.id(), updated.clone());

        Ok(updated)
    }

    async fn delete_task(&self, project_id: ProjectId, task_id: TaskId) -> AppResult<()> {
        {
            let mut tasks = self.tasks.write().await;
            if !tasks
                .get(&task_id)
                .is_some_and(|task| task.project_id() == project_id)
            {
                return Err(AppError::NotFound(format!("task '{task_id}' does not exist")));
            }
            tasks.remove(&task_id);
        }

        self.remove_task_children(&[task_id]).await;
        Ok(())
    }
}

#[async_trait]
impl CommentRepository for InMemoryTrackerRepository {
    async fn create_comment(&self, comment: &Comment) -> AppResult<()> {
        self.comments
            .write()
            .await
            .insert(comment.id(), comment.clone());
        Ok(())
    }

    async fn find_comment(
        &self,
        target: CommentTarget,
        comment_id: CommentId,
    ) -> AppResult<Option<Comment>> {
        Ok(self
            .comments
            .read()
            .await
            .get(&comment_id)
            .filter(|comment| comment.target() == target)
            .cloned())
    }

    async fn list_comments(&self, target: CommentTarget) -> AppResult<Vec<Comment>> {
        let mut listed: Vec<Comment> = self
            .comments
            .read()
            .await
            .values()
            .filter(|comment| comment.target() == target)
            .cloned()
            .collect();
        listed.sort_by(|left, right| {
            left.created_at()
                .cmp(&right.created_at())
                .then_with(|| left.id().as_uuid().cmp(&right.id().as_uuid()))
        });

        Ok(listed)
    }

    async fn update_comment(&self, comment: &Comment) -> AppResult<()> {
        let mut comments = self.comments.write().await;
        let Some(stored) = comments.get_mut(&comment.id()) else {
            return Err(AppError::NotFound(format!(
                "comment '{}' does not exist",
                comment.id()
            )));
        };

        *stored = comment.clone();
        Ok(())
    }

    async fn delete_comment(&self, comment_id: CommentId) -> AppResult<()> {
        if self.comments.write().await.remove(&comment_id).is_none() {
            return Err(AppError::NotFound(format!(
                "comment '{comment_id}' does not exist"
            )));
        }

        Ok(())
    }
}

#[async_trait]
impl TaskFileRepository for InMemoryTrackerRepository {
    async fn create_task_file(&self, task_file: &TaskFile) -> AppResult<()> {
        self.task_files
            .write()
            .await
            .insert(task_file.id(), task_file.clone());
        Ok(())
    }

    async fn find_task_file(
        &self,
        task_id: TaskId,
        task_file_id: TaskFileId,
    ) -> AppResult<Option<TaskFile>> {
        Ok(self
            .task_files
            .read()
            .await
            .get(&task_file_id)
            .filter(|task_file| task_file.task_id() == task_id)
            .cloned())
    }

    async fn list_task_files(&self, task_id: TaskId) -> AppResult<Vec<TaskFile>> {
        let mut listed: Vec<TaskFile> = self
            .task_files
            .read()
            .await
            .values()
            .filter(|task_file| task_file.task_id() == task_id)
            .cloned()
            .collect();
        listed.sort_by(|left, right| {
            left.uploaded_at()
                .cmp(&right.uploaded_at())
                .then_with(|| left.id().as_uuid().cmp(&right.id().as_uuid()))
        });

        Ok(listed)
    }

    async fn delete_task_file(&self, task_file_id: TaskFileId) -> AppResult<()> {
        if self.task_files.write().await.remove(&task_file_id).is_none() {
            return Err(AppError::NotFound(format!(
                "attachment '{task_file_id}' does not exist"
            )));
        }

        Ok(())
    }

    async fn list_content_refs_for_project(&self, project_id: ProjectId) -> AppResult<Vec<String>> {
        let task_ids: Vec<TaskId> = self
            .tasks
            .read()
            .await
            .values()
            .filter(|task| task.project_id() == project_id)
            .map(Task::id)
            .collect();

        Ok(self
            .task_files
            .read()
            .await
            .values()
            .filter(|task_file| task_ids.contains(&task_file.task_id()))
            .map(|task_file| task_file.content_ref().to_owned())
            .collect())
    }

    async fn list_content_refs_for_task(&self, task_id: TaskId) -> AppResult<Vec<String>> {
        Ok(self
            .task_files
            .read()
            .await
            .values()
            .filter(|task_file| task_file.task_id() == task_id)
            .map(|task_file| task_file.content_ref().to_owned())
            .collect())
    }
}
