//! Post-specific error types.

use crate::domain::foundation::{DomainError, ErrorCode, PostId, ValidationError};

/// Post-specific errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PostError {
    /// Post was not found.
    NotFound(PostId),
    /// Caller does not own the post.
    Forbidden,
    /// Validation failed.
    ValidationFailed { field: String, message: String },
    /// Infrastructure error.
    Infrastructure(String),
}

impl PostError {
    pub fn not_found(id: PostId) -> Self {
        PostError::NotFound(id)
    }
    pub fn forbidden() -> Self {
        PostError::Forbidden
    }
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        PostError::ValidationFailed {
            field: field.into(),
            message: message.into(),
        }
    }
    pub fn infrastructure(message: impl Into<String>) -> Self {
        PostError::Infrastructure(message.into())
    }
    pub fn code(&self) -> ErrorCode {
        match self {
            PostError::NotFound(_) => ErrorCode::PostNotFound,
            PostError::Forbidden => ErrorCode::Forbidden,
            PostError::ValidationFailed { .. } => ErrorCode::ValidationFailed,
            PostError::Infrastructure(_) => ErrorCode::DatabaseError,
        }
    }
    pub fn message(&self) -> String {
        match self {
            PostError::NotFound(id) => format!("Post not found: {}", id),
            PostError::Forbidden => "Permission denied".to_string(),
            PostError::ValidationFailed { field, message } => {
                format!("Validation failed for '{}': {}", field, message)
            }
            PostError::Infrastructure(msg) => format!("Error: {}", msg),
        }
    }
}

impl std::fmt::Display for PostError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message())
    }
}

impl std::error::Error for PostError {}

impl From<ValidationError> for PostError {
    fn from(err: ValidationError) -> Self {
        PostError::ValidationFailed {
            field: err.field().to_string(),
            message: err.to_string(),
        }
    }
}

impl From<DomainError> for PostError {
    fn from(err: DomainError) -> Self {
        match err.code {
            ErrorCode::Forbidden => PostError::Forbidden,
            ErrorCode::ValidationFailed => PostError::ValidationFailed {
                field: err
                    .details
                    .get("field")
                    .cloned()
                    .unwrap_or_else(|| "unknown".to_string()),
                message: err.message,
            },
            _ => PostError::Infrastructure(err.to_string()),
        }
    }
}
