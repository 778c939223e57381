//! Dual-identifier project resolution.
//!
//! Public endpoints accept either the numeric primary key or the generated
//! `project_id` string. A [`ProjectLookup`] carries both interpretations so a
//! single SQL predicate (`id = $1 OR project_id = $2`) resolves either form.

use crate::types::DbId;

/// A caller-supplied project identifier, resolvable against both id columns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectLookup {
    raw: String,
    primary_key: Option<DbId>,
}

impl ProjectLookup {
    pub fn parse(raw: &str) -> Self {
        let raw = raw.trim();
        let primary_key = raw.parse::<DbId>().ok().filter(|id| *id > 0);
        Self {
            raw: raw.to_string(),
            primary_key,
        }
    }

    /// The primary-key interpretation, if the identifier is a positive integer.
    pub fn primary_key(&self) -> Option<DbId> {
        self.primary_key
    }

    /// The identifier as given, matched against `project_id`.
    pub fn project_code(&self) -> &str {
        &self.raw
    }
}

impl std::fmt::Display for ProjectLookup {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.raw)
    }
}
