//! Domain error model.

use thiserror::Error;

/// Result type used across the domain layer.
pub type DomainResult<T> = Result<T, DomainError>;

/// Kind of entity a lookup failed for.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum EntityKind {
    User,
    Employee,
    Manager,
    Department,
    Project,
    LeaveRequest,
    Feedback,
}

impl core::fmt::Display for EntityKind {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let name = match self {
            EntityKind::User => "user",
            EntityKind::Employee => "employee",
            EntityKind::Manager => "manager",
            EntityKind::Department => "department",
            EntityKind::Project => "project",
            EntityKind::LeaveRequest => "leave request",
            EntityKind::Feedback => "feedback",
        };
        f.write_str(name)
    }
}

/// Domain-level error.
///
/// Every variant is a distinct, typed failure surfaced to the caller. Storage
/// failures are folded into [`DomainError::Store`] at the infra boundary.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// A value failed validation (e.g. malformed input).
    #[error("validation failed: {0}")]
    Validation(String),

    /// A domain invariant was violated.
    #[error("invariant violated: {0}")]
    InvariantViolation(String),

    /// An explicitly referenced entity does not exist.
    #[error("{0} not found")]
    NotFound(EntityKind),

    /// Unique constraint violation or a blocked delete.
    #[error("conflict: {0}")]
    Conflict(String),

    /// Role string outside the recognized enumeration.
    #[error("invalid role: {0}")]
    InvalidRole(String),

    /// The principal's role or ownership scope does not cover the target.
    #[error("forbidden: {0}")]
    Forbidden(String),

    /// The authenticated user has no employee profile.
    #[error("no employee profile for user '{0}'")]
    UnresolvedPrincipal(String),

    /// Storage failure.
    #[error("store error: {0}")]
    Store(String),
}

impl DomainError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn invariant(msg: impl Into<String>) -> Self {
        Self::InvariantViolation(msg.into())
    }

    pub fn conflict(msg: impl Into<String>) -> Self {
        Self::Conflict(msg.into())
    }

    pub fn forbidden(msg: impl Into<String>) -> Self {
        Self::Forbidden(msg.into())
    }

    pub fn not_found(kind: EntityKind) -> Self {
        Self::NotFound(kind)
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}
