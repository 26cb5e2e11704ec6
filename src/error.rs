//! Error types for task validation.

use thiserror::Error;

/// Raised when a task field would break one of the task invariants.
///
/// These are never fatal: the terminal layers report them and let the user retry.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TaskError {
    #[error("title cannot be empty")]
    EmptyTitle,

    #[error("interval must be at least one day")]
    NonPositiveInterval,

    #[error("field only applies to {expected} tasks")]
    KindMismatch { expected: &'static str },
}
