use std::time::Instant;

/// Status of a step in the audit log.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum StepStatus {
    /// Forward action completed successfully.
    Executed,
    /// Forward action failed.
    Failed,
    /// Step was compensated successfully.
    Compensated,
    /// Step compensation failed.
    CompensationFailed,
    /// Compensation was not attempted because an earlier compensation failed.
    CompensationSkipped,
}

impl StepStatus {
    fn marker(self) -> &'static str {
        match self {
            Self::Executed => "✓",
            Self::Failed => "✗",
            Self::Compensated => "↩",
            Self::CompensationFailed => "⚠",
            Self::CompensationSkipped => "…",
        }
    }
}

/// Record of a step's execution in the saga.
#[derive(Debug, Clone)]
pub struct StepRecord {
    /// Name of the step.
    pub name: String,
    /// Current status.
    pub status: StepStatus,
    /// When the step started executing.
    pub started_at: Instant,
    /// When the step completed (execution or compensation).
    pub completed_at: Option<Instant>,
    /// Description of compensation (if the step has one).
    pub compensation_description: Option<String>,
}

/// Audit log tracking all step executions in a saga.
///
/// Records are kept in execution order, one per attempted step, and are
/// updated in place when a step is later compensated.
#[derive(Debug, Clone, Default)]
pub struct SagaAuditLog {
    records: Vec<StepRecord>,
}

impl SagaAuditLog {
    /// Create a new empty audit log.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn record_start(&mut self, name: &str) -> usize {
        self.records.push(StepRecord {
            name: name.to_string(),
            status: StepStatus::Executed,
            started_at: Instant::now(),
            completed_at: None,
            compensation_description: None,
        });
        self.records.len() - 1
    }

    pub(crate) fn record_failure(&mut self, index: usize) {
        self.set_status(index, StepStatus::Failed);
    }

    pub(crate) fn record_success(&mut self, index: usize, compensation_description: Option<String>) {
        if let Some(record) = self.records.get_mut(index) {
            record.status = StepStatus::Executed;
            record.completed_at = Some(Instant::now());
            record.compensation_description = compensation_description;
        }
    }

    pub(crate) fn record_compensated(&mut self, index: usize) {
        self.set_status(index, StepStatus::Compensated);
    }

    pub(crate) fn record_compensation_failed(&mut self, index: usize) {
        self.set_status(index, StepStatus::CompensationFailed);
    }

    pub(crate) fn record_compensation_skipped(&mut self, index: usize) {
        if let Some(record) = self.records.get_mut(index) {
            record.status = StepStatus::CompensationSkipped;
        }
    }

    fn set_status(&mut self, index: usize, status: StepStatus) {
        if let Some(record) = self.records.get_mut(index) {
            record.status = status;
            record.completed_at = Some(Instant::now());
        }
    }

    /// Get all records in the audit log.
    #[must_use]
    pub fn records(&self) -> &[StepRecord] {
        &self.records
    }

    /// Names of the steps that ended with the given status, in execution order.
    #[must_use]
    pub fn steps_with_status(&self, status: StepStatus) -> Vec<&str> {
        self.records
            .iter()
            .filter(|record| record.status == status)
            .map(|record| record.name.as_str())
            .collect()
    }

    /// Get a summary of the saga execution for display.
    #[must_use]
    pub fn summary(&self) -> String {
        self.records
            .iter()
            .map(|record| format!("{} {}", record.status.marker(), record.name))
            .collect::<Vec<_>>()
            .join("\n")
    }
}
