use bluegreen_saga::{SagaAuditLog, SagaError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum OperationError {
    #[error("a manifest is required to push this application")]
    MissingManifest,

    #[error("an application name is required")]
    EmptyAppName,

    #[error("failed to check whether application '{app}' exists")]
    Probe {
        app: String,
        #[source]
        source: Box<OperationError>,
    },

    #[error("{0}")]
    Saga(String),

    #[error(transparent)]
    Cf(#[from] bluegreen_cf::CfError),

    #[error("deployment failed at step '{step}'")]
    DeploymentFailed {
        step: String,
        #[source]
        source: Box<OperationError>,
        audit: SagaAuditLog,
    },

    #[error("deployment failed at step '{step}', and rolling back step '{compensation_step}' also failed")]
    RollbackFailed {
        step: String,
        #[source]
        source: Box<OperationError>,
        compensation_step: String,
        compensation_error: Box<OperationError>,
        message: String,
        audit: SagaAuditLog,
    },
}

pub type Result<T> = std::result::Result<T, OperationError>;

impl OperationError {
    /// Whether the error was detected before any remote call was made.
    #[must_use]
    pub fn is_configuration_error(&self) -> bool {
        matches!(self, Self::MissingManifest | Self::EmptyAppName)
    }

    /// Audit log of the deployment run, when the error came from one.
    #[must_use]
    pub fn audit(&self) -> Option<&SagaAuditLog> {
        match self {
            Self::DeploymentFailed { audit, .. } | Self::RollbackFailed { audit, .. } => Some(audit),
            _ => None,
        }
    }

    pub(crate) fn from_saga(err: SagaError<OperationError>, audit: SagaAuditLog) -> Self {
        match err {
            SagaError::StepFailed { step, source } => Self::DeploymentFailed {
                step,
                source: Box::new(source),
                audit,
            },
            SagaError::CompensationFailed {
                failed_step,
                step_error,
                compensation,
                message,
            } => Self::RollbackFailed {
                step: failed_step,
                source: Box::new(step_error),
                compensation_step: compensation.step,
                compensation_error: Box::new(compensation.error),
                message,
                audit,
            },
            other => Self::DeploymentFailed {
                step: other.failed_step().to_string(),
                source: Box::new(Self::Saga(other.to_string())),
                audit,
            },
        }
    }
}
