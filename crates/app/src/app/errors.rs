use serde::Serialize;

use worksphere_core::DomainError;

/// Stable, serializable error body for callers that surface failures over a
/// wire protocol.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorBody {
    pub error: &'static str,
    pub message: String,
}

pub fn error_code(err: &DomainError) -> &'static str {
    match err {
        DomainError::Validation(_) => "validation_error",
        DomainError::InvariantViolation(_) => "invariant_violation",
        DomainError::NotFound(_) => "not_found",
        DomainError::Conflict(_) => "conflict",
        DomainError::InvalidRole(_) => "invalid_role",
        DomainError::Forbidden(_) => "forbidden",
        DomainError::UnresolvedPrincipal(_) => "unresolved_principal",
        DomainError::Store(_) => "store_error",
    }
}

impl From<&DomainError> for ErrorBody {
    fn from(err: &DomainError) -> Self {
        Self {
            error: error_code(err),
            message: err.to_string(),
        }
    }
}
