use std::fmt::Debug;

use crate::saga::{DEFAULT_ROLLBACK_FAILURE_MESSAGE, Saga};
use crate::step::Step;

/// Builder for a [`Saga`].
///
/// Steps run in the order they are added. Steps that only apply in some
/// situations are added with [`step_if`](Self::step_if), which keeps the
/// ordering of the remaining steps intact.
pub struct SagaBuilder<Ctx, Err> {
    steps: Vec<Step<Ctx, Err>>,
    rollback_failure_message: String,
}

impl<Ctx, Err> SagaBuilder<Ctx, Err> {
    /// Create an empty saga builder.
    #[must_use]
    pub fn new() -> Self {
        Self {
            steps: Vec::new(),
            rollback_failure_message: DEFAULT_ROLLBACK_FAILURE_MESSAGE.to_string(),
        }
    }

    /// Append a step.
    #[must_use]
    pub fn step(mut self, step: Step<Ctx, Err>) -> Self {
        self.steps.push(step);
        self
    }

    /// Append a step only when `condition` holds.
    #[must_use]
    pub fn step_if<F>(self, condition: bool, step: F) -> Self
    where
        F: FnOnce() -> Step<Ctx, Err>,
    {
        if condition { self.step(step()) } else { self }
    }

    /// Append every step from an iterator.
    #[must_use]
    pub fn steps<I>(mut self, steps: I) -> Self
    where
        I: IntoIterator<Item = Step<Ctx, Err>>,
    {
        self.steps.extend(steps);
        self
    }

    /// Message surfaced to the operator when a compensation fails.
    #[must_use]
    pub fn rollback_failure_message(mut self, message: impl Into<String>) -> Self {
        self.rollback_failure_message = message.into();
        self
    }

    /// Build the saga from the accumulated steps.
    #[must_use]
    pub fn build(self) -> Saga<Ctx, Err>
    where
        Err: Debug,
    {
        Saga::from_steps(self.steps, self.rollback_failure_message)
    }
}

impl<Ctx, Err> Default for SagaBuilder<Ctx, Err> {
    fn default() -> Self {
        Self::new()
    }
}
