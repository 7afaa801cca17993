//! Domain error model.

use thiserror::Error;

/// Result type used across the domain layer.
pub type DomainResult<T> = Result<T, DomainError>;

/// Domain-level error.
///
/// Keep this focused on deterministic, business/domain failures (validation,
/// missing entities, conflicts). Collaborator and transport failures belong elsewhere.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// A value failed validation (e.g. blank product name).
    #[error("validation failed: {0}")]
    Validation(String),

    /// An identifier was invalid (e.g. empty entity id).
    #[error("invalid identifier: {0}")]
    InvalidId(String),

    /// A requested entity was not found.
    #[error("not found: {0}")]
    NotFound(String),

    /// A conflict occurred (e.g. duplicate entity id).
    #[error("conflict: {0}")]
    Conflict(String),
}

impl DomainError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn invalid_id(msg: impl Into<String>) -> Self {
        Self::InvalidId(msg.into())
    }

    pub fn not_found(what: impl Into<String>) -> Self {
        Self::NotFound(what.into())
    }

    pub fn conflict(msg: impl Into<String>) -> Self {
        Self::Conflict(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_includes_detail() {
        assert_eq!(
            DomainError::validation("name cannot be empty").to_string(),
            "validation failed: name cannot be empty"
        );
        assert_eq!(DomainError::not_found("product P1").to_string(), "not found: product P1");
    }
}
