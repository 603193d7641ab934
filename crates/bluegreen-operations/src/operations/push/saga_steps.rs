use std::marker::PhantomData;

use bluegreen_saga::{Action, Saga, SagaBuilder, Step};
use tracing::{debug, warn};

use super::operation::ROLLBACK_FAILURE_MESSAGE;
use crate::OperationError;
use crate::planner::{CommandSpec, DeploymentPlan, OnError, PlannedStep};
use crate::traits::Platform;

/// Runs the commands of one side of a planned step, in order.
pub struct CommandSequence<P> {
    commands: Vec<CommandSpec>,
    _marker: PhantomData<fn(&P)>,
}

impl<P> CommandSequence<P> {
    #[must_use]
    pub fn new(commands: Vec<CommandSpec>) -> Self {
        Self {
            commands,
            _marker: PhantomData,
        }
    }

    #[must_use]
    pub fn commands(&self) -> &[CommandSpec] {
        &self.commands
    }
}

impl<P> Action for CommandSequence<P>
where
    P: Platform,
{
    type Context = P;
    type Error = OperationError;

    fn execute(&self, ctx: &Self::Context) -> Result<(), Self::Error> {
        for spec in &self.commands {
            debug!(command = %spec.command, "applying");
            match spec.command.apply(ctx) {
                Ok(()) => {}
                Err(error) if spec.on_error == OnError::Warn => {
                    warn!(command = %spec.command, error = %error, "command failed, continuing");
                }
                Err(error) => return Err(error),
            }
        }
        Ok(())
    }

    fn describe(&self) -> String {
        self.commands
            .iter()
            .map(|spec| format!("cf {}", spec.command))
            .collect::<Vec<_>>()
            .join(", then ")
    }
}

fn saga_step<P>(planned: &PlannedStep) -> Step<P, OperationError>
where
    P: Platform + 'static,
{
    let mut step = Step::new(
        planned.kind.name(),
        CommandSequence::<P>::new(planned.forward.clone()),
    );
    if let Some(compensate) = &planned.compensate {
        step = step.with_compensation(CommandSequence::<P>::new(compensate.clone()));
    }
    if planned.pivot {
        step = step.as_pivot();
    }
    step
}

/// Turn a plan into an executable saga against platform `P`.
#[must_use]
pub fn build_saga<P>(plan: &DeploymentPlan) -> Saga<P, OperationError>
where
    P: Platform + 'static,
{
    SagaBuilder::new()
        .steps(plan.steps().iter().map(saga_step::<P>))
        .rollback_failure_message(ROLLBACK_FAILURE_MESSAGE)
        .build()
}
