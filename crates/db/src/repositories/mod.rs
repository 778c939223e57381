//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async methods that
//! accept `&PgPool` as the first argument. Every read-modify-write on a
//! project is a single SQL statement so concurrent requests never lose
//! updates.

pub mod admin_repo;
pub mod comment_repo;
pub mod project_repo;

pub use admin_repo::AdminRepo;
pub use comment_repo::CommentRepo;
pub use project_repo::ProjectRepo;
