//! Request guards.
//!
//! - [`auth::AuthAdmin`] -- Extracts the authenticated admin from a JWT Bearer token.
//! - [`rate_limit`] -- Fixed-window per-IP request ceiling for `/api`.

pub mod auth;
pub mod rate_limit;
