//! Contract error types for the theme engine
//!
//! These errors are transport-agnostic and used for inter-module communication.

/// Theme engine domain errors
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ThemeEngineError {
    /// Store, template, section, backup, theme or package entry not found
    NotFound {
        /// Resource type (template, section, backup, ...)
        resource: String,
        /// Resource identifier
        id: String,
    },
    /// Duplicate default, deleting a default template, name collision, corrupted backup
    Conflict {
        /// Conflict reason
        reason: String,
    },
    /// Malformed input rejected before any write
    Validation {
        /// Validation error message
        message: String,
    },
    /// Internal error
    Internal,
}

impl ThemeEngineError {
    pub fn not_found(resource: &str, id: impl ToString) -> Self {
        Self::NotFound {
            resource: resource.to_string(),
            id: id.to_string(),
        }
    }

    pub fn conflict(reason: impl Into<String>) -> Self {
        Self::Conflict {
            reason: reason.into(),
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }
}

impl std::fmt::Display for ThemeEngineError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotFound { resource, id } => {
                write!(f, "{} not found: {}", resource, id)
            }
            Self::Conflict { reason } => {
                write!(f, "Conflict: {}", reason)
            }
            Self::Validation { message } => {
                write!(f, "Validation error: {}", message)
            }
            Self::Internal => {
                write!(f, "Internal error")
            }
        }
    }
}

impl std::error::Error for ThemeEngineError {}
