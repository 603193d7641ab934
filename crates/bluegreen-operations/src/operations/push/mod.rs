mod operation;
mod saga_steps;

pub use operation::{DeploymentReport, PushInput, PushOperation, PushOutcome, ROLLBACK_FAILURE_MESSAGE};
pub use saga_steps::{CommandSequence, build_saga};
