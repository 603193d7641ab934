use std::fmt::Debug;

use thiserror::Error;

/// Error from a failed compensation action.
#[derive(Debug, thiserror::Error)]
#[error("compensation failed for step '{step}': {description}")]
pub struct CompensationError<E> {
    /// Name of the step whose compensation failed.
    pub step: String,
    /// Description of what the compensation was trying to do.
    pub description: String,
    /// The underlying error.
    #[source]
    pub error: E,
}

/// Error from saga execution.
///
/// Together with `Ok(())` for a fully successful run this forms the three
/// observable outcomes of a saga: success, failed and rolled back, or
/// failed during rollback.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SagaError<E: Debug> {
    /// A step failed and every compensation that ran succeeded.
    #[error("step '{step}' failed")]
    StepFailed {
        /// Name of the step that failed.
        step: String,
        /// The error that caused the step to fail.
        #[source]
        source: E,
    },

    /// A step failed and a compensation failed as well.
    ///
    /// Compensation stops at the first failure, so steps before the failing
    /// compensation were left untouched and the resulting state is
    /// indeterminate.
    #[error("step '{failed_step}' failed, and compensation of step '{}' also failed", compensation.step)]
    CompensationFailed {
        /// Name of the step that originally failed.
        failed_step: String,
        /// The error from the failed step.
        step_error: E,
        /// The compensation that failed.
        compensation: CompensationError<E>,
        /// Operator-facing message configured on the saga.
        message: String,
    },
}

impl<E: Debug> SagaError<E> {
    /// Name of the step whose forward action failed.
    #[must_use]
    pub fn failed_step(&self) -> &str {
        match self {
            Self::StepFailed { step, .. } => step,
            Self::CompensationFailed { failed_step, .. } => failed_step,
        }
    }

    /// Whether the rollback itself failed.
    #[must_use]
    pub fn is_indeterminate(&self) -> bool {
        matches!(self, Self::CompensationFailed { .. })
    }
}
