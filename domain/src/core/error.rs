//! Domain error types

use thiserror::Error;

/// Domain-level errors
///
/// All variants describe rejected input; none of them is transient.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("Invalid problem description: {0}")]
    InvalidProblem(String),

    #[error("Invalid consultation id: {0}")]
    InvalidConsultationId(String),

    #[error("Unknown sender type: {0}")]
    UnknownSenderType(String),

    #[error("Unknown consultation status: {0}")]
    UnknownStatus(String),
}
