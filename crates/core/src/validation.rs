//! Field validation for project submissions and admin edits.
//!
//! Rules are declared with `validator` derives and run on the sanitized text,
//! so the length bounds hold for what is stored. Because `ValidationErrors` is
//! unordered, [`first_error_message`] reports the first failure in a fixed
//! field order so clients always see the same message for the same input.

use std::borrow::Cow;

use validator::{Validate, ValidationError, ValidationErrors};

use crate::error::CoreError;
use crate::project::{is_valid_department, max_year, MIN_YEAR};
use crate::sanitize::sanitize_optional;

/// Field order used when picking the message to report.
const PROJECT_FIELD_ORDER: &[&str] = &[
    "title",
    "author",
    "department",
    "year",
    "abstract_text",
    "supervisor",
];

/// Pick the first validation message following `order`, falling back to the
/// aggregated error text for fields outside it.
pub fn first_error_message(errors: &ValidationErrors, order: &[&str]) -> String {
    let field_errors = errors.field_errors();
    order
        .iter()
        .filter_map(|field| field_errors.get(*field))
        .chain(field_errors.values())
        .flat_map(|errs| errs.iter())
        .find_map(|e| e.message.as_ref().map(|m| m.to_string()))
        .unwrap_or_else(|| errors.to_string())
}

/// Map a `validator` failure into the domain error, keeping the first message.
pub fn into_core_error(errors: &ValidationErrors, order: &[&str]) -> CoreError {
    CoreError::Validation(first_error_message(errors, order))
}

fn validation_error(code: &'static str, message: String) -> ValidationError {
    ValidationError::new(code).with_message(Cow::Owned(message))
}

fn validate_department(department: &str) -> Result<(), ValidationError> {
    if is_valid_department(department) {
        Ok(())
    } else {
        Err(validation_error(
            "department",
            "Department must be one of the listed departments".to_string(),
        ))
    }
}

/// Parse a submitted year, enforcing `MIN_YEAR..=current year`.
pub fn parse_year(raw: &str) -> Result<i32, ValidationError> {
    let year: i32 = raw
        .trim()
        .parse()
        .map_err(|_| validation_error("year", "Year must be a whole number".to_string()))?;
    if year < MIN_YEAR {
        return Err(validation_error(
            "year",
            format!("Year must be {MIN_YEAR} or later"),
        ));
    }
    if year > max_year() {
        return Err(validation_error(
            "year",
            "Year cannot be in the future".to_string(),
        ));
    }
    Ok(year)
}

fn validate_year(raw: &str) -> Result<(), ValidationError> {
    parse_year(raw).map(|_| ())
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

// ---------------------------------------------------------------------------
// New submissions
// ---------------------------------------------------------------------------

/// Metadata of a new submission, filled from the upload form.
///
/// Free text is sanitized as it is set. Blank values (including text that
/// sanitizes to nothing) are treated as missing so the "is required" message
/// wins.
#[derive(Debug, Clone, Default, Validate)]
pub struct NewProjectFields {
    #[validate(
        required(message = "Title is required"),
        length(min = 5, max = 200, message = "Title must be between 5 and 200 characters")
    )]
    pub title: Option<String>,

    #[validate(
        required(message = "Author is required"),
        length(min = 3, max = 100, message = "Author name must be between 3 and 100 characters")
    )]
    pub author: Option<String>,

    #[validate(
        required(message = "Department is required"),
        custom(function = "validate_department")
    )]
    pub department: Option<String>,

    #[validate(required(message = "Year is required"), custom(function = "validate_year"))]
    pub year: Option<String>,

    #[validate(
        required(message = "Abstract is required"),
        length(min = 50, max = 5000, message = "Abstract must be between 50 and 5000 characters")
    )]
    pub abstract_text: Option<String>,

    #[validate(
        required(message = "Supervisor is required"),
        length(min = 3, max = 100, message = "Supervisor name must be between 3 and 100 characters")
    )]
    pub supervisor: Option<String>,
}

/// Validated, sanitized metadata ready to persist.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectDetails {
    pub title: String,
    pub author: String,
    pub department: String,
    pub year: i32,
    pub abstract_text: String,
    pub supervisor: String,
}

impl NewProjectFields {
    /// Set a field by its form name. Unknown names are ignored.
    pub fn set(&mut self, name: &str, value: String) {
        match name {
            "title" => self.title = sanitize_optional(Some(value.as_str())),
            "author" => self.author = sanitize_optional(Some(value.as_str())),
            "department" => self.department = non_blank(Some(value)),
            "year" => self.year = non_blank(Some(value)),
            "abstract" => self.abstract_text = sanitize_optional(Some(value.as_str())),
            "supervisor" => self.supervisor = sanitize_optional(Some(value.as_str())),
            _ => {}
        }
    }

    /// Validate every field. The department is checked against the fixed
    /// list and stored verbatim.
    pub fn into_details(self) -> Result<ProjectDetails, CoreError> {
        self.validate()
            .map_err(|e| into_core_error(&e, PROJECT_FIELD_ORDER))?;

        let year = self
            .year
            .as_deref()
            .map(parse_year)
            .transpose()
            .map_err(|e| CoreError::Validation(e.to_string()))?
            .ok_or_else(|| CoreError::Validation("Year is required".into()))?;

        Ok(ProjectDetails {
            title: self.title.unwrap_or_default(),
            author: self.author.unwrap_or_default(),
            department: self.department.unwrap_or_default(),
            year,
            abstract_text: self.abstract_text.unwrap_or_default(),
            supervisor: self.supervisor.unwrap_or_default(),
        })
    }
}

// ---------------------------------------------------------------------------
// Admin edits
// ---------------------------------------------------------------------------

/// Partial admin edit. Only title, abstract, and supervisor are editable.
#[derive(Debug, Clone, Default, Validate)]
pub struct ProjectEditFields {
    #[validate(length(min = 5, max = 200, message = "Title must be between 5 and 200 characters"))]
    pub title: Option<String>,

    #[validate(length(min = 50, max = 5000, message = "Abstract must be between 50 and 5000 characters"))]
    pub abstract_text: Option<String>,

    #[validate(length(min = 3, max = 100, message = "Supervisor name must be between 3 and 100 characters"))]
    pub supervisor: Option<String>,
}

/// Sanitized edit; `None` fields are left unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProjectChanges {
    pub title: Option<String>,
    pub abstract_text: Option<String>,
    pub supervisor: Option<String>,
}

impl ProjectChanges {
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.abstract_text.is_none() && self.supervisor.is_none()
    }
}

impl ProjectEditFields {
    pub fn new(
        title: Option<String>,
        abstract_text: Option<String>,
        supervisor: Option<String>,
    ) -> Self {
        Self {
            title: sanitize_optional(title.as_deref()),
            abstract_text: sanitize_optional(abstract_text.as_deref()),
            supervisor: sanitize_optional(supervisor.as_deref()),
        }
    }

    pub fn into_changes(self) -> Result<ProjectChanges, CoreError> {
        self.validate()
            .map_err(|e| into_core_error(&e, PROJECT_FIELD_ORDER))?;
        Ok(ProjectChanges {
            title: self.title,
            abstract_text: self.abstract_text,
            supervisor: self.supervisor,
        })
    }
}
