use meetspace_core::{AppError, AppResult, ErrorMetadata, LateWritePolicy, LogLevel};
use serde::Serialize;

/// Result of a wizard step that did not fail outright.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum StepOutcome {
    /// The step completed and its results were merged.
    Advanced,
    /// The step moved on but an optional write failed.
    Degraded { reason: String },
    /// The step was superseded while in flight; its results were dropped.
    Abandoned,
}

impl StepOutcome {
    pub fn degraded(reason: impl Into<String>) -> Self {
        StepOutcome::Degraded {
            reason: reason.into(),
        }
    }

    /// Whether the wizard may move to the next step.
    pub fn can_advance(&self) -> bool {
        !matches!(self, StepOutcome::Abandoned)
    }

    pub fn is_degraded(&self) -> bool {
        matches!(self, StepOutcome::Degraded { .. })
    }
}

/// Decide the outcome of a late optional write.
pub(crate) fn late_write_outcome<T>(
    policy: LateWritePolicy,
    step: &'static str,
    result: AppResult<T>,
) -> AppResult<StepOutcome> {
    match result {
        Ok(_) => Ok(StepOutcome::Advanced),
        Err(e) => {
            log_late_write_failure(policy, step, &e);
            match policy {
                LateWritePolicy::BestEffort => Ok(StepOutcome::degraded(e.client_message())),
                LateWritePolicy::Blocking => Err(e),
            }
        }
    }
}

/// Best-effort failures are logged one level below the error's own level.
fn log_late_write_failure(policy: LateWritePolicy, step: &'static str, e: &AppError) {
    let level = match (policy, e.log_level()) {
        (LateWritePolicy::BestEffort, LogLevel::Error) => LogLevel::Warn,
        (LateWritePolicy::BestEffort, _) => LogLevel::Debug,
        (LateWritePolicy::Blocking, level) => level,
    };
    let code = e.error_code();
    match level {
        LogLevel::Debug => tracing::debug!(step, code, error = %e, ?policy, "Optional write failed"),
        LogLevel::Warn => tracing::warn!(step, code, error = %e, ?policy, "Optional write failed"),
        LogLevel::Error => tracing::error!(step, code, error = %e, ?policy, "Optional write failed"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn failure() -> AppResult<()> {
        Err(AppError::Api {
            status: 500,
            body: "boom".to_string(),
        })
    }

    #[test]
    fn best_effort_degrades() {
        let outcome = late_write_outcome(LateWritePolicy::BestEffort, "social", failure()).unwrap();
        assert!(outcome.is_degraded());
        assert!(outcome.can_advance());
        assert_eq!(
            outcome,
            StepOutcome::degraded("The server failed to process the request")
        );
    }

    #[test]
    fn blocking_propagates() {
        let err = late_write_outcome(LateWritePolicy::Blocking, "social", failure()).unwrap_err();
        assert_eq!(err.status(), Some(500));
        assert_eq!(
            late_write_outcome(LateWritePolicy::Blocking, "social", Ok(())).unwrap(),
            StepOutcome::Advanced
        );
    }
}
