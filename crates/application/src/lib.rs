//! Application services and ports.

#![forbid(unsafe_code)]

mod actor_directory;
mod authorization_service;
mod comment_service;
mod project_service;
mod task_file_service;
mod task_service;
mod tracker_ports;
mod user_service;

pub use actor_directory::ActorDirectory;
pub use authorization_service::{AccessGroups, AuthorizationService};
pub use comment_service::{CommentScope, CommentService};
pub use project_service::{
    CreateProjectInput, ProjectDetails, ProjectImageDownload, ProjectService,
};
pub use task_file_service::{TaskFileDownload, TaskFileService, UploadedFile};
pub use task_service::{TaskDetails, TaskService};
pub use tracker_ports::{
    BlobStore, CommentRepository, ProjectListQuery, ProjectRepository, ProjectSort,
    ProjectSortField, TaskFileRepository, TaskRepository,
};
pub use user_service::{
    AuthOutcome, PasswordHasher, RegisterParams, UserRecord, UserRepository, UserService,
};
