//! Domain types and pure logic for the project archive.
//!
//! Nothing in this crate performs I/O, so it is shared by the repository
//! layer, the HTTP server, and their tests without pulling in a runtime.

pub mod error;
pub mod lookup;
pub mod pagination;
pub mod project;
pub mod rating;
pub mod roles;
pub mod sanitize;
pub mod types;
pub mod upload;
pub mod validation;
