use std::fmt::Debug;

use tracing::{debug, warn};

use crate::audit::SagaAuditLog;
use crate::error::{CompensationError, SagaError};
use crate::step::Step;

pub(crate) const DEFAULT_ROLLBACK_FAILURE_MESSAGE: &str =
    "rollback did not complete; the system may be in an inconsistent state";

/// A compiled saga ready for execution.
///
/// Sagas execute their steps strictly in order, one at a time, each action
/// exactly once. If a step fails, the compensations of previously completed
/// steps run in reverse order (LIFO). The first compensation that fails
/// stops the rollback: no further compensation is attempted once the state
/// is unknown.
///
/// The saga performs no retries and no timeouts of its own.
pub struct Saga<Ctx, Err> {
    steps: Vec<Step<Ctx, Err>>,
    rollback_failure_message: String,
}

impl<Ctx, Err> Saga<Ctx, Err>
where
    Err: Debug,
{
    pub(crate) fn from_steps(steps: Vec<Step<Ctx, Err>>, rollback_failure_message: String) -> Self {
        Self {
            steps,
            rollback_failure_message,
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    #[must_use]
    pub fn step_names(&self) -> Vec<&'static str> {
        self.steps.iter().map(Step::name).collect()
    }

    #[must_use]
    pub fn steps(&self) -> &[Step<Ctx, Err>] {
        &self.steps
    }

    #[must_use]
    pub fn rollback_failure_message(&self) -> &str {
        &self.rollback_failure_message
    }

    /// Execute the saga.
    ///
    /// On failure, compensates previously completed steps in reverse order.
    ///
    /// # Errors
    ///
    /// Returns `SagaError::StepFailed` if a step fails and every compensation succeeds.
    /// Returns `SagaError::CompensationFailed` if a step fails and a compensation fails too.
    pub fn execute(&self, ctx: &Ctx) -> Result<(), SagaError<Err>> {
        let (result, _audit_log) = self.execute_internal(ctx);
        result
    }

    /// Execute the saga and return both the result and an audit log.
    ///
    /// The audit log tracks all step executions and compensations.
    pub fn execute_with_audit(&self, ctx: &Ctx) -> (Result<(), SagaError<Err>>, SagaAuditLog) {
        self.execute_internal(ctx)
    }

    fn execute_internal(&self, ctx: &Ctx) -> (Result<(), SagaError<Err>>, SagaAuditLog) {
        let mut audit_log = SagaAuditLog::new();
        let mut compensation_stack: Vec<usize> = Vec::new();

        for step in &self.steps {
            let index = audit_log.record_start(step.name());
            debug!(step = step.name(), index, "executing step");

            match step.run_forward(ctx) {
                Ok(()) => {
                    audit_log.record_success(index, step.compensation_description());

                    if step.is_pivot() {
                        debug!(
                            step = step.name(),
                            discarded = compensation_stack.len(),
                            "pivot reached, earlier compensations discarded"
                        );
                        compensation_stack.clear();
                    } else if step.has_compensation() {
                        compensation_stack.push(index);
                    }
                }
                Err(error) => {
                    audit_log.record_failure(index);
                    warn!(
                        step = step.name(),
                        pending = compensation_stack.len(),
                        "step failed, rolling back"
                    );
                    let saga_error = self.compensate(
                        ctx,
                        &mut audit_log,
                        compensation_stack,
                        step.name(),
                        error,
                    );
                    return (Err(saga_error), audit_log);
                }
            }
        }

        (Ok(()), audit_log)
    }

    fn compensate(
        &self,
        ctx: &Ctx,
        audit_log: &mut SagaAuditLog,
        mut compensation_stack: Vec<usize>,
        failed_step: &str,
        step_error: Err,
    ) -> SagaError<Err> {
        while let Some(index) = compensation_stack.pop() {
            let step = &self.steps[index];
            let Some(result) = step.run_compensation(ctx) else {
                continue;
            };

            match result {
                Ok(()) => {
                    debug!(step = step.name(), "compensated");
                    audit_log.record_compensated(index);
                }
                Err(error) => {
                    warn!(step = step.name(), "compensation failed, stopping rollback");
                    audit_log.record_compensation_failed(index);
                    for skipped in compensation_stack.drain(..) {
                        audit_log.record_compensation_skipped(skipped);
                    }
                    return SagaError::CompensationFailed {
                        failed_step: failed_step.to_string(),
                        step_error,
                        compensation: CompensationError {
                            step: step.name().to_string(),
                            description: step.compensation_description().unwrap_or_default(),
                            error,
                        },
                        message: self.rollback_failure_message.clone(),
                    };
                }
            }
        }

        SagaError::StepFailed {
            step: failed_step.to_string(),
            source: step_error,
        }
    }
}

impl<Ctx, Err> Debug for Saga<Ctx, Err> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Saga")
            .field("steps", &self.steps)
            .field("rollback_failure_message", &self.rollback_failure_message)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use super::*;
    use crate::action::Action;
    use crate::audit::StepStatus;
    use crate::builder::SagaBuilder;

    #[derive(Default)]
    struct TestContext {
        log: RefCell<Vec<String>>,
    }

    #[derive(Debug, PartialEq, thiserror::Error)]
    #[error("{0}")]
    struct TestError(String);

    struct Record {
        label: &'static str,
        fail: bool,
    }

    impl Record {
        fn ok(label: &'static str) -> Self {
            Self { label, fail: false }
        }

        fn failing(label: &'static str) -> Self {
            Self { label, fail: true }
        }
    }

    impl Action for Record {
        type Context = TestContext;
        type Error = TestError;

        fn execute(&self, ctx: &Self::Context) -> Result<(), Self::Error> {
            ctx.log.borrow_mut().push(self.label.to_string());
            if self.fail {
                Err(TestError(format!("{} failed", self.label)))
            } else {
                Ok(())
            }
        }

        fn describe(&self) -> String {
            self.label.to_string()
        }
    }

    fn reversible(name: &'static str, forward: &'static str, undo: &'static str) -> Step<TestContext, TestError> {
        Step::new(name, Record::ok(forward)).with_compensation(Record::ok(undo))
    }

    #[test]
    fn successful_saga_runs_every_step_and_no_compensation() -> anyhow::Result<()> {
        let ctx = TestContext::default();
        let saga = SagaBuilder::new()
            .step(reversible("a", "do a", "undo a"))
            .step(reversible("b", "do b", "undo b"))
            .build();

        saga.execute(&ctx)?;

        assert_eq!(*ctx.log.borrow(), vec!["do a", "do b"]);
        Ok(())
    }

    #[test]
    fn empty_saga_succeeds() -> anyhow::Result<()> {
        let ctx = TestContext::default();
        let saga: Saga<TestContext, TestError> = SagaBuilder::new().build();

        saga.execute(&ctx)?;

        assert!(ctx.log.borrow().is_empty());
        Ok(())
    }

    #[test]
    fn compensation_happens_in_lifo_order() {
        let ctx = TestContext::default();
        let saga = SagaBuilder::new()
            .step(reversible("a", "do a", "undo a"))
            .step(reversible("b", "do b", "undo b"))
            .step(Step::new("c", Record::failing("do c")))
            .build();

        let err = saga.execute(&ctx).expect_err("should fail");

        assert!(matches!(err, SagaError::StepFailed { ref step, .. } if step == "c"));
        assert_eq!(
            *ctx.log.borrow(),
            vec!["do a", "do b", "do c", "undo b", "undo a"]
        );
    }

    #[test]
    fn failing_step_does_not_run_its_own_compensation() {
        let ctx = TestContext::default();
        let saga = SagaBuilder::new()
            .step(Step::new("a", Record::failing("do a")).with_compensation(Record::ok("undo a")))
            .build();

        let result = saga.execute(&ctx);

        assert!(result.is_err());
        assert_eq!(*ctx.log.borrow(), vec!["do a"]);
    }

    #[test]
    fn steps_after_failure_are_not_executed() {
        let ctx = TestContext::default();
        let saga = SagaBuilder::new()
            .step(Step::new("a", Record::failing("do a")))
            .step(Step::new("b", Record::ok("do b")))
            .build();

        let result = saga.execute(&ctx);

        assert!(result.is_err());
        assert_eq!(*ctx.log.borrow(), vec!["do a"]);
    }

    #[test]
    fn compensation_failure_stops_rollback() {
        let ctx = TestContext::default();
        let saga = SagaBuilder::new()
            .step(reversible("a", "do a", "undo a"))
            .step(Step::new("b", Record::ok("do b")).with_compensation(Record::failing("undo b")))
            .step(Step::new("c", Record::failing("do c")))
            .rollback_failure_message("look at it")
            .build();

        let err = saga.execute(&ctx).expect_err("should fail");

        match err {
            SagaError::CompensationFailed {
                failed_step,
                step_error,
                compensation,
                message,
            } => {
                assert_eq!(failed_step, "c");
                assert_eq!(step_error, TestError("do c failed".to_string()));
                assert_eq!(compensation.step, "b");
                assert_eq!(compensation.description, "undo b");
                assert_eq!(compensation.error, TestError("undo b failed".to_string()));
                assert_eq!(message, "look at it");
            }
            SagaError::StepFailed { .. } => panic!("expected CompensationFailed"),
        }
        assert_eq!(*ctx.log.borrow(), vec!["do a", "do b", "do c", "undo b"]);
    }

    #[test]
    fn pivot_discards_earlier_compensations() {
        let ctx = TestContext::default();
        let saga = SagaBuilder::new()
            .step(reversible("a", "do a", "undo a"))
            .step(Step::new("pivot", Record::ok("do pivot")).as_pivot())
            .step(Step::new("c", Record::failing("do c")))
            .build();

        let err = saga.execute(&ctx).expect_err("should fail");

        assert!(matches!(err, SagaError::StepFailed { ref step, .. } if step == "c"));
        assert_eq!(*ctx.log.borrow(), vec!["do a", "do pivot", "do c"]);
    }

    #[test]
    fn failing_pivot_still_rolls_back_earlier_steps() {
        let ctx = TestContext::default();
        let saga = SagaBuilder::new()
            .step(reversible("a", "do a", "undo a"))
            .step(Step::new("pivot", Record::failing("do pivot")).as_pivot())
            .build();

        let result = saga.execute(&ctx);

        assert!(result.is_err());
        assert_eq!(*ctx.log.borrow(), vec!["do a", "do pivot", "undo a"]);
    }

    #[test]
    fn audit_log_tracks_compensation_status() {
        let ctx = TestContext::default();
        let saga = SagaBuilder::new()
            .step(reversible("a", "do a", "undo a"))
            .step(Step::new("b", Record::ok("do b")).with_compensation(Record::failing("undo b")))
            .step(Step::new("c", Record::failing("do c")))
            .build();

        let (result, audit_log) = saga.execute_with_audit(&ctx);

        assert!(result.is_err());
        let records = audit_log.records();
        assert_eq!(records.len(), 3);
        assert_eq!(records[0].status, StepStatus::CompensationSkipped);
        assert_eq!(records[1].status, StepStatus::CompensationFailed);
        assert_eq!(records[2].status, StepStatus::Failed);
    }

    #[test]
    fn audit_log_records_compensation_descriptions() -> anyhow::Result<()> {
        let ctx = TestContext::default();
        let saga = SagaBuilder::new()
            .step(reversible("a", "do a", "undo a"))
            .step(Step::new("b", Record::ok("do b")))
            .build();

        let (result, audit_log) = saga.execute_with_audit(&ctx);
        result?;

        let records = audit_log.records();
        assert_eq!(records[0].compensation_description.as_deref(), Some("undo a"));
        assert!(records[1].compensation_description.is_none());
        Ok(())
    }
}
