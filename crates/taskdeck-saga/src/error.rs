use std::fmt::Debug;

use thiserror::Error;

/// Error from a compensation that failed during rollback.
///
/// Collected by the coordinator and exposed through
/// [`Coordinator::compensation_failures`](crate::Coordinator::compensation_failures);
/// never escalated past the saga's original failure.
#[derive(Debug, Error)]
#[error("compensation for step '{step}' failed")]
pub struct CompensationError<E> {
    /// Name of the step whose compensation failed.
    pub step: String,
    /// The underlying error.
    #[source]
    pub error: E,
}

/// Error surfaced by [`Coordinator::finish`](crate::Coordinator::finish)
/// when a saga step failed.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SagaError<E: Debug> {
    /// A step's forward action failed; the previously completed steps were
    /// compensated.
    #[error("step '{step}' failed")]
    StepFailed {
        /// Name of the step that failed.
        step: String,
        /// The error that caused the step to fail.
        #[source]
        source: E,
    },
}
