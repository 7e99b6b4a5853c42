mod comments;
mod files;
mod projects;
mod tasks;

pub use comments::CommentRepository;
pub use files::{BlobStore, TaskFileRepository};
pub use projects::{ProjectListQuery, ProjectRepository, ProjectSort, ProjectSortField};
pub use tasks::TaskRepository;
