/// Domain-level error shared by the repository and HTTP layers.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CoreError {
    /// The id does not resolve, or resolves to a record the caller may not see.
    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: String },

    /// The record exists but its backing file is missing from the upload store.
    #[error("File not found on server: {0}")]
    FileNotFound(String),

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Unknown email and wrong password are deliberately indistinguishable.
    #[error("Invalid email or password")]
    InvalidCredentials,

    #[error("Internal error: {0}")]
    Internal(String),
}

impl CoreError {
    /// Shorthand for a project lookup miss.
    pub fn project_not_found(id: impl Into<String>) -> Self {
        CoreError::NotFound {
            entity: "Project",
            id: id.into(),
        }
    }
}
