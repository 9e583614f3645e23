//! Domain-level error types.

use std::fmt::Display;

use thiserror::Error;

/// Domain errors - business logic failures.
#[derive(Debug, Error)]
pub enum DomainError {
    /// `id` is kept as the caller wrote it, so unparseable path segments report verbatim.
    #[error("Could not find post with id {id}")]
    NotFound { id: String },

    /// Write payload rejected by the post schema. Carries the violation text verbatim.
    #[error("{0}")]
    Validation(String),
}

impl DomainError {
    pub fn post_not_found(id: impl Display) -> Self {
        DomainError::NotFound { id: id.to_string() }
    }
}

/// Repository-level errors.
#[derive(Debug, Error)]
pub enum RepoError {
    #[error("Database connection failed: {0}")]
    Connection(String),

    #[error("Query execution failed: {0}")]
    Query(String),

    #[error("Entity not found")]
    NotFound,

    #[error("Constraint violation: {0}")]
    Constraint(String),
}
