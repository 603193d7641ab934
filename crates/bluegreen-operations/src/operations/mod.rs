mod push;

pub use push::{
    CommandSequence, DeploymentReport, PushInput, PushOperation, PushOutcome,
    ROLLBACK_FAILURE_MESSAGE, build_saga,
};
