//! Project lifecycle constants, the status state machine, and identifiers.

use std::fmt;
use std::str::FromStr;

use chrono::Datelike;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::CoreError;

// ---------------------------------------------------------------------------
// Field constraints
// ---------------------------------------------------------------------------

/// Earliest accepted project year.
pub const MIN_YEAR: i32 = 2000;

/// Latest accepted project year (the current UTC year).
pub fn max_year() -> i32 {
    chrono::Utc::now().year()
}

/// The fixed set of departments a project may belong to.
pub const DEPARTMENTS: &[&str] = &[
    "Surveying & Geoinformatics",
    "Geoinformatics",
    "Surveying",
    "Cadastral Survey",
    "Other",
];

/// Check whether `department` is one of [`DEPARTMENTS`] (exact match).
pub fn is_valid_department(department: &str) -> bool {
    DEPARTMENTS.contains(&department)
}

// ---------------------------------------------------------------------------
// Status state machine
// ---------------------------------------------------------------------------

/// Moderation status of a project.
///
/// ```text
/// pending --approve--> approved
/// pending --reject---> rejected
/// ```
///
/// Hard deletion is possible from any state and is not modelled here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProjectStatus {
    Pending,
    Approved,
    Rejected,
}

impl ProjectStatus {
    pub const ALL: [ProjectStatus; 3] = [
        ProjectStatus::Pending,
        ProjectStatus::Approved,
        ProjectStatus::Rejected,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ProjectStatus::Pending => "pending",
            ProjectStatus::Approved => "approved",
            ProjectStatus::Rejected => "rejected",
        }
    }

    /// Whether moderation may move a project from `self` to `next`.
    pub fn can_transition_to(&self, next: ProjectStatus) -> bool {
        matches!(
            (self, next),
            (ProjectStatus::Pending, ProjectStatus::Approved)
                | (ProjectStatus::Pending, ProjectStatus::Rejected)
        )
    }

    /// Validate a moderation transition, naming both states on failure.
    pub fn check_transition(&self, next: ProjectStatus) -> Result<(), CoreError> {
        if self.can_transition_to(next) {
            Ok(())
        } else {
            Err(CoreError::Conflict(format!(
                "Project is already {} and cannot be {}",
                self.as_str(),
                next.as_str()
            )))
        }
    }
}

impl fmt::Display for ProjectStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProjectStatus {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(ProjectStatus::Pending),
            "approved" => Ok(ProjectStatus::Approved),
            "rejected" => Ok(ProjectStatus::Rejected),
            other => Err(CoreError::Validation(format!(
                "Unknown project status '{other}'"
            ))),
        }
    }
}

// Lets sqlx decode the TEXT column via `#[sqlx(try_from = "String")]`.
impl TryFrom<String> for ProjectStatus {
    type Error = CoreError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

// ---------------------------------------------------------------------------
// Public identifiers
// ---------------------------------------------------------------------------

const BASE36: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";

fn to_base36(mut n: u64) -> String {
    if n == 0 {
        return "0".to_string();
    }
    let mut digits = Vec::new();
    while n > 0 {
        digits.push(BASE36[(n % 36) as usize]);
        n /= 36;
    }
    digits.reverse();
    String::from_utf8(digits).unwrap_or_default()
}

/// Generate an opaque public project identifier.
///
/// Format: `PROJ_<base36 epoch millis>_<6 random base36 chars>`, upper-cased.
/// Uniqueness is ultimately enforced by the `uq_projects_project_id` index.
pub fn generate_project_id() -> String {
    let millis = chrono::Utc::now().timestamp_millis().max(0) as u64;
    let mut rng = rand::rng();
    let suffix: String = (0..6)
        .map(|_| BASE36[rng.random_range(0..BASE36.len())] as char)
        .collect();
    format!("proj_{}_{suffix}", to_base36(millis)).to_uppercase()
}
