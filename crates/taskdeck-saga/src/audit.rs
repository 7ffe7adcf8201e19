use std::time::Instant;

/// Status of a step in the audit log.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum StepStatus {
    /// Step executed successfully.
    Executed,
    /// Step failed during execution.
    Failed,
    /// Step was never executed because the saga had already failed.
    Skipped,
    /// Step was compensated successfully.
    Compensated,
    /// Step compensation failed.
    CompensationFailed,
}

/// Record of a step's execution in the saga.
#[derive(Debug)]
pub struct StepRecord {
    /// Name of the step.
    pub name: String,
    /// Current status.
    pub status: StepStatus,
    /// When the step started executing (or was skipped).
    pub started_at: Instant,
    /// When the step completed (execution, skip, or compensation).
    pub completed_at: Option<Instant>,
}

/// Audit log tracking all step runs in a saga.
#[derive(Debug, Default)]
pub struct SagaAuditLog {
    records: Vec<StepRecord>,
}

impl SagaAuditLog {
    /// Create a new empty audit log.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a step execution starting.
    pub(crate) fn record_start(&mut self, name: &str) {
        self.records.push(StepRecord {
            name: name.to_string(),
            status: StepStatus::Executed,
            started_at: Instant::now(),
            completed_at: None,
        });
    }

    /// Mark the last step as completed successfully.
    pub(crate) fn record_success(&mut self) {
        if let Some(record) = self.records.last_mut() {
            record.status = StepStatus::Executed;
            record.completed_at = Some(Instant::now());
        }
    }

    /// Mark the last step as failed.
    pub(crate) fn record_failure(&mut self) {
        if let Some(record) = self.records.last_mut() {
            record.status = StepStatus::Failed;
            record.completed_at = Some(Instant::now());
        }
    }

    /// Record a step that was skipped because the saga had already failed.
    pub(crate) fn record_skipped(&mut self, name: &str) {
        let now = Instant::now();
        self.records.push(StepRecord {
            name: name.to_string(),
            status: StepStatus::Skipped,
            started_at: now,
            completed_at: Some(now),
        });
    }

    /// Record that a step was compensated.
    pub(crate) fn record_compensated(&mut self, step_name: &str) {
        for record in &mut self.records {
            if record.name == step_name {
                record.status = StepStatus::Compensated;
                record.completed_at = Some(Instant::now());
            }
        }
    }

    /// Record that a step's compensation failed.
    pub(crate) fn record_compensation_failed(&mut self, step_name: &str) {
        for record in &mut self.records {
            if record.name == step_name {
                record.status = StepStatus::CompensationFailed;
                record.completed_at = Some(Instant::now());
            }
        }
    }

    /// Get all records in the audit log.
    #[must_use]
    pub fn records(&self) -> &[StepRecord] {
        &self.records
    }

    /// Get a summary of the saga execution for display.
    #[must_use]
    pub fn summary(&self) -> String {
        let mut lines = Vec::new();
        for record in &self.records {
            let status = match record.status {
                StepStatus::Executed => "✓",
                StepStatus::Failed => "✗",
                StepStatus::Skipped => "↷",
                StepStatus::Compensated => "↩",
                StepStatus::CompensationFailed => "⚠",
            };
            lines.push(format!("{status} {}", record.name));
        }
        lines.join("\n")
    }
}
