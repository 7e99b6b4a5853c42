//! Infrastructure adapters for application ports.

#![forbid(unsafe_code)]

mod argon2_password_hasher;
mod in_memory_blob_store;
mod in_memory_tracker_repository;
mod in_memory_user_repository;
mod local_file_blob_store;
mod postgres_tracker_repository;
mod postgres_user_repository;

pub use argon2_password_hasher::Argon2PasswordHasher;
pub use in_memory_blob_store::InMemoryBlobStore;
pub use in_memory_tracker_repository::InMemoryTrackerRepository;
pub use in_memory_user_repository::InMemoryUserRepository;
pub use local_file_blob_store::LocalFileBlobStore;
pub use postgres_tracker_repository::PostgresTrackerRepository;
pub use postgres_user_repository::PostgresUserRepository;

#[cfg(test)]
mod service_tests;
