//! Error types for the payment service.

/// Domain-level errors (malformed payment input).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DomainError {
    #[error("{0} is required")]
    MissingField(&'static str),

    #[error("Card number must be exactly 16 digits")]
    InvalidCardNumber,

    #[error("Card security code must be exactly 3 digits, got {0}")]
    InvalidSecurityCode(u16),

    #[error("Price is required and cannot be zero")]
    ZeroAmount,

    #[error("{field} must not contain '#'")]
    ReservedCharacter { field: &'static str },

    /// More than one field failed; one entry per failing field.
    #[error("{}", join_errors(.0))]
    Invalid(Vec<DomainError>),
}

impl DomainError {
    /// Every single-field error this error carries.
    pub fn field_errors(&self) -> Vec<&DomainError> {
        match self {
            DomainError::Invalid(errors) => errors.iter().collect(),
            other => vec![other],
        }
    }
}

fn join_errors(errors: &[DomainError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// Errors reported by the bank collaborator.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BankError {
    #[error("Card rejected: {0}")]
    CardRejected(String),

    #[error("Transaction declined: {0}")]
    TransactionDeclined(String),

    #[error("Revert rejected: {0}")]
    RevertRejected(String),

    #[error("Bank unavailable: {0}")]
    Unavailable(String),
}

/// Repository-level errors (data access failures).
#[derive(Debug, thiserror::Error)]
pub enum RepoError {
    #[error("Entity not found")]
    NotFound,

    #[error("Database error: {0}")]
    Database(String),

    #[error("Invalid record: {0}")]
    InvalidRecord(String),

    #[error("Conflict: {0}")]
    Conflict(String),
}

/// Application-level errors returned by the payment service.
///
/// Each variant is one error kind a caller can tell apart.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Validation failed: {0}")]
    Validation(#[from] DomainError),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error(transparent)]
    Bank(#[from] BankError),

    #[error("Backend error: {0}")]
    Backend(String),
}

impl AppError {
    /// True when the caller sent bad input; every other kind is a server-side failure.
    pub fn is_client_error(&self) -> bool {
        matches!(self, AppError::Validation(_))
    }
}

impl From<RepoError> for AppError {
    fn from(err: RepoError) -> Self {
        match err {
            RepoError::NotFound => AppError::NotFound("Resource not found".into()),
            RepoError::Database(e) => AppError::Backend(e),
            RepoError::InvalidRecord(e) => AppError::Backend(format!("invalid record: {}", e)),
            RepoError::Conflict(e) => AppError::Backend(format!("conflict: {}", e)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repo_errors_map_to_kinds() {
        assert!(matches!(
            AppError::from(RepoError::NotFound),
            AppError::NotFound(_)
        ));
        assert!(matches!(
            AppError::from(RepoError::Database("down".into())),
            AppError::Backend(_)
        ));
        assert!(matches!(
            AppError::from(RepoError::InvalidRecord("DATA".into())),
            AppError::Backend(_)
        ));
    }

    #[test]
    fn test_invalid_lists_every_field() {
        let err = DomainError::Invalid(vec![
            DomainError::MissingField("CustomerID"),
            DomainError::ZeroAmount,
        ]);

        assert_eq!(
            err.to_string(),
            "CustomerID is required; Price is required and cannot be zero"
        );
        assert_eq!(err.field_errors().len(), 2);
        assert_eq!(DomainError::ZeroAmount.field_errors().len(), 1);
    }

    #[test]
    fn test_only_validation_is_client_error() {
        assert!(AppError::from(DomainError::InvalidCardNumber).is_client_error());
        assert!(!AppError::from(BankError::CardRejected("expired".into())).is_client_error());
        assert!(!AppError::NotFound("payment".into()).is_client_error());
        assert!(!AppError::Backend("down".into()).is_client_error());
    }
}
