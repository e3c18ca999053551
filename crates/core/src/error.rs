//! Domain error model.

use thiserror::Error;

/// Result type used across the domain layer.
pub type DomainResult<T> = Result<T, DomainError>;

/// Domain-level error.
///
/// Keep this focused on deterministic, business/domain failures (validation,
/// uniqueness, integrity). Infrastructure concerns belong elsewhere; the
/// transport boundary owns the mapping to user-visible statuses
/// (`DuplicateName`/`AlreadyAssigned` → 400, `NotFound` → 404,
/// `Conflict` → 409).
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// A value failed validation (e.g. malformed name or credentials).
    #[error("validation failed: {0}")]
    Validation(String),

    /// A requested member, role, or authority does not exist.
    #[error("not found: {0}")]
    NotFound(String),

    /// A catalog creation collided with an existing case-normalized name.
    #[error("duplicate name: {0}")]
    DuplicateName(String),

    /// The (member, role) pair already has an active assignment.
    #[error("already assigned: {0}")]
    AlreadyAssigned(String),

    /// A referential-integrity violation (e.g. deleting a referenced authority).
    #[error("conflict: {0}")]
    Conflict(String),
}

impl DomainError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    pub fn duplicate_name(msg: impl Into<String>) -> Self {
        Self::DuplicateName(msg.into())
    }

    pub fn already_assigned(msg: impl Into<String>) -> Self {
        Self::AlreadyAssigned(msg.into())
    }

    pub fn conflict(msg: impl Into<String>) -> Self {
        Self::Conflict(msg.into())
    }
}
