//! Engine error types.

use rpglife_core::economy::EconomyError;
use rpglife_core::gating::GateError;
use rpglife_storage::StorageError;

/// Errors returned by engine operations.
///
/// Everything except [`EngineError::Storage`] is a rejection: the request
/// was understood and refused, and no state changed.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error(transparent)]
    Economy(#[from] EconomyError),

    #[error(transparent)]
    Gate(#[from] GateError),

    /// The task was already completed (non-recurring) or deleted.
    #[error("task {0} is no longer active")]
    InactiveTask(i64),
}

/// Convenience alias used throughout the engine crate.
pub type Result<T> = std::result::Result<T, EngineError>;

impl EngineError {
    /// Returns `true` for refusals that left state untouched.
    pub fn is_rejection(&self) -> bool {
        !matches!(self, Self::Storage(_))
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::Storage(e) if e.is_not_found())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn economy_rejection_keeps_message() {
        let err: EngineError = EconomyError::InsufficientPoints {
            needed: 10,
            available: 3,
        }
        .into();
        assert!(err.is_rejection());
        assert_eq!(err.to_string(), "not enough points: need 10, have 3");
    }

    #[test]
    fn storage_errors_are_not_rejections() {
        let err: EngineError = StorageError::not_found("task", 4).into();
        assert!(!err.is_rejection());
        assert!(err.is_not_found());
    }
}
