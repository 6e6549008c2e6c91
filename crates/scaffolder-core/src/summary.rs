//! End-of-run summary
//!
//! Every step a command attempts is recorded here, so a run that "finished"
//! with failed sub-steps never looks like a clean success.

use crate::exit_codes;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepOutcome {
    Done,
    Failed(String),
    Skipped(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Step {
    pub label: String,
    pub outcome: StepOutcome,
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.outcome {
            StepOutcome::Done => write!(f, "{}", self.label),
            StepOutcome::Failed(reason) => write!(f, "{}: {}", self.label, reason),
            StepOutcome::Skipped(reason) => write!(f, "{} (skipped: {})", self.label, reason),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    steps: Vec<Step>,
}

impl RunSummary {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn done(&mut self, label: impl Into<String>) {
        self.push(label, StepOutcome::Done);
    }

    pub fn failed(&mut self, label: impl Into<String>, reason: impl Into<String>) {
        self.push(label, StepOutcome::Failed(reason.into()));
    }

    pub fn skipped(&mut self, label: impl Into<String>, reason: impl Into<String>) {
        self.push(label, StepOutcome::Skipped(reason.into()));
    }

    fn push(&mut self, label: impl Into<String>, outcome: StepOutcome) {
        self.steps.push(Step {
            label: label.into(),
            outcome,
        });
    }

    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    pub fn failures(&self) -> impl Iterator<Item = &Step> {
        self.steps
            .iter()
            .filter(|s| matches!(s.outcome, StepOutcome::Failed(_)))
    }

    pub fn has_failures(&self) -> bool {
        self.failures().next().is_some()
    }

    pub fn exit_code(&self) -> i32 {
        if self.has_failures() {
            exit_codes::COMPLETED_WITH_FAILURES
        } else {
            exit_codes::SUCCESS
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_run_exits_zero() {
        let mut summary = RunSummary::new();
        summary.done("Wrote 8 files");
        summary.skipped("npm install", "--skip-install");
        assert!(!summary.has_failures());
        assert_eq!(summary.exit_code(), exit_codes::SUCCESS);
    }

    #[test]
    fn test_failed_step_changes_exit_code() {
        let mut summary = RunSummary::new();
        summary.done("Wrote 8 files");
        summary.failed("npm install", "exit code 1");

        assert_eq!(summary.exit_code(), exit_codes::COMPLETED_WITH_FAILURES);
        assert_eq!(summary.failures().count(), 1);
        assert_eq!(summary.steps()[1].to_string(), "npm install: exit code 1");
    }
}
