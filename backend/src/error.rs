use thiserror::Error;

/// Typed failure surface of the domain layer.
///
/// Storage failures are wrapped rather than swallowed so the REST layer can
/// map them to the right status without inspecting message text.
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("{resource} not found: {id}")]
    NotFound { resource: &'static str, id: String },

    #[error("{resource} already exists with name: {name}")]
    AlreadyExists { resource: &'static str, name: String },

    #[error("{0}")]
    Validation(String),

    #[error("storage error: {0}")]
    Storage(#[from] anyhow::Error),
}

impl DomainError {
    pub fn not_found(resource: &'static str, id: impl Into<String>) -> Self {
        Self::NotFound {
            resource,
            id: id.into(),
        }
    }

    pub fn already_exists(resource: &'static str, name: impl Into<String>) -> Self {
        Self::AlreadyExists {
            resource,
            name: name.into(),
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Stable machine-readable code for the error envelope.
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::NotFound { .. } => "RESOURCE_NOT_FOUND",
            Self::AlreadyExists { .. } => "RESOURCE_ALREADY_EXISTS",
            Self::Validation(_) => "VALIDATION_FAILED",
            Self::Storage(_) => "DATABASE_ERROR",
        }
    }
}

pub type DomainResult<T> = Result<T, DomainError>;
