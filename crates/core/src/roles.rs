//! Well-known admin role names.
//!
//! These must match the CHECK constraint on `admins.role`.

pub const ROLE_ADMIN: &str = "admin";
pub const ROLE_SUPERADMIN: &str = "superadmin";
