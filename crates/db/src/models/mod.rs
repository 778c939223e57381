//! Row models and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` entity struct matching the database row
//! - `Create*` / `Update*` DTOs consumed by the matching repository

pub mod admin;
pub mod comment;
pub mod project;
