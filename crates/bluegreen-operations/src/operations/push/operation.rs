use bluegreen_saga::SagaAuditLog;
use tracing::{info, warn};

use super::saga_steps::build_saga;
use crate::Result;
use crate::error::OperationError;
use crate::planner::{DeploymentPlan, plan};
use crate::request::DeploymentRequest;
use crate::slots::{SlotNames, SlotState};
use crate::traits::Platform;

pub const ROLLBACK_FAILURE_MESSAGE: &str = "Something went wrong while rolling back. \
     Check the state of your applications manually before retrying.";

pub struct PushInput {
    pub request: DeploymentRequest,
    pub dry_run: bool,
}

#[derive(Debug, Clone)]
pub struct DeploymentReport {
    pub plan: DeploymentPlan,
    pub audit: SagaAuditLog,
}

#[derive(Debug)]
pub enum PushOutcome {
    Deployed(DeploymentReport),
    DryRun(DeploymentPlan),
}

pub struct PushOperation<P> {
    platform: P,
}

impl<P> PushOperation<P>
where
    P: Platform + 'static,
{
    pub fn new(platform: P) -> Self {
        Self { platform }
    }

    pub fn platform(&self) -> &P {
        &self.platform
    }

    /// Probe the three slots, once each, in live, previous, two-back order.
    ///
    /// # Errors
    ///
    /// Returns [`OperationError::Probe`] naming the first slot whose check failed.
    pub fn probe(&self, slots: &SlotNames) -> Result<SlotState> {
        let check = |name: &str| {
            self.platform
                .exists(name)
                .map_err(|source| OperationError::Probe {
                    app: name.to_string(),
                    source: Box::new(source),
                })
        };

        let state = SlotState::new(
            check(&slots.live)?,
            check(&slots.previous)?,
            check(&slots.two_back)?,
        );
        info!(app = %slots.live, %state, "probed slots");
        Ok(state)
    }

    /// Validate, probe and plan without changing anything.
    ///
    /// # Errors
    ///
    /// Returns an error if the request is invalid or probing fails.
    pub fn plan(&self, request: &DeploymentRequest) -> Result<DeploymentPlan> {
        let validated = request.validate()?;
        let state = self.probe(validated.slots())?;
        Ok(plan(&validated, state))
    }

    /// Run a push end to end.
    ///
    /// # Errors
    ///
    /// Returns a configuration or probe error before anything is changed,
    /// [`OperationError::DeploymentFailed`] when a step failed and every
    /// compensation succeeded, and [`OperationError::RollbackFailed`] when a
    /// compensation failed too.
    pub fn execute(&self, input: &PushInput) -> Result<PushOutcome> {
        let plan = self.plan(&input.request)?;

        if input.dry_run {
            return Ok(PushOutcome::DryRun(plan));
        }

        info!(app = %plan.slots().live, steps = plan.steps().len(), "starting deployment");
        let saga = build_saga::<P>(&plan);
        let (result, audit) = saga.execute_with_audit(&self.platform);
        result.map_err(|err| OperationError::from_saga(err, audit.clone()))?;

        Ok(PushOutcome::Deployed(DeploymentReport { plan, audit }))
    }

    /// Show the platform's application listing.
    ///
    /// Meant for after a successful run; a failure here is logged and
    /// otherwise ignored since the deployment itself already succeeded.
    pub fn list_applications(&self) {
        if let Err(error) = self.platform.list_applications() {
            warn!(error = %error, "failed to list applications");
        }
    }
}
