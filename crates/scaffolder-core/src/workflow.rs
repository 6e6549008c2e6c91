//! Scaffolding pipeline: resolve, write, run follow-up commands
//!
//! Fatal errors (bad template paths, an occupied project root, a root that
//! can't be created) are returned as `Err`. Failed template writes and failed
//! follow-up commands are recorded in the [`RunSummary`] instead, and
//! [`RunPolicy`] decides whether later steps still run.

use crate::error::{Result, ScaffoldError};
use crate::request::ScaffoldRequest;
use crate::runtime::invoker::{
    CommandStatus, FailurePolicy, FollowUpCommand, Invoker, DEFAULT_COMMAND_TIMEOUT,
};
use crate::summary::RunSummary;
use crate::templates::{materialize, resolve_commands, resolve_templates, WriteReport};
use std::path::Path;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct RunPolicy {
    /// Whether follow-up commands still run after some template writes failed
    pub on_write_failure: FailurePolicy,
    /// Whether later commands still run after one failed
    pub on_command_failure: FailurePolicy,
    pub command_timeout: Option<Duration>,
    pub run_commands: bool,
    /// Stream command output to the terminal
    pub echo: bool,
}

impl Default for RunPolicy {
    fn default() -> Self {
        Self {
            on_write_failure: FailurePolicy::Continue,
            on_command_failure: FailurePolicy::Continue,
            command_timeout: Some(DEFAULT_COMMAND_TIMEOUT),
            run_commands: true,
            echo: true,
        }
    }
}

impl RunPolicy {
    /// Abort on the first failed write or command
    pub fn fail_fast(mut self) -> Self {
        self.on_write_failure = FailurePolicy::Abort;
        self.on_command_failure = FailurePolicy::Abort;
        self
    }
}

/// Hooks for showing progress while [`scaffold_with`] runs
pub trait Progress {
    /// About to write `count` files under `root`
    fn writing(&mut self, _root: &Path, _count: usize) {}

    /// [`materialize`] finished, successfully or not
    fn written(&mut self, _result: &Result<WriteReport>) {}
}

/// Reports nothing
pub struct Silent;

impl Progress for Silent {}

/// Run the whole pipeline for `request` under `root`
pub async fn scaffold(
    request: &ScaffoldRequest,
    root: &Path,
    policy: &RunPolicy,
) -> Result<RunSummary> {
    scaffold_with(request, root, policy, &mut Silent).await
}

/// Like [`scaffold`], reporting the write step through `progress`
pub async fn scaffold_with(
    request: &ScaffoldRequest,
    root: &Path,
    policy: &RunPolicy,
    progress: &mut dyn Progress,
) -> Result<RunSummary> {
    let files = resolve_templates(request)?;
    let mut summary = RunSummary::new();

    progress.writing(root, files.len());
    let written = materialize(root, &files).await;
    progress.written(&written);
    let writes_ok = record_writes(&mut summary, written)?;

    let commands = resolve_commands(request, root);
    if policy.run_commands {
        run_follow_ups(&mut summary, &commands, policy, writes_ok).await;
    } else if !commands.is_empty() {
        summary.skipped("Install dependencies", "--skip-install");
    }

    Ok(summary)
}

/// Record the outcome of [`materialize`]; returns whether every write succeeded.
///
/// Partial failures become a failed step, anything else is passed back as fatal.
pub fn record_writes(
    summary: &mut RunSummary,
    result: Result<WriteReport>,
) -> Result<bool> {
    match result {
        Ok(report) => {
            summary.done(format!(
                "Wrote {} files to {}",
                report.written.len(),
                report.root.display()
            ));
            Ok(true)
        }
        Err(ScaffoldError::PartialFailure { written, failed }) => {
            summary.done(format!("Wrote {} files", written.len()));
            for failure in &failed {
                summary.failed(format!("Write {}", failure.path), failure.reason.clone());
            }
            Ok(false)
        }
        Err(err) => Err(err),
    }
}

/// Run `commands` and record one step per command
pub async fn run_follow_ups(
    summary: &mut RunSummary,
    commands: &[FollowUpCommand],
    policy: &RunPolicy,
    writes_ok: bool,
) {
    if commands.is_empty() {
        return;
    }

    if !writes_ok && policy.on_write_failure == FailurePolicy::Abort {
        for command in commands {
            summary.skipped(command.to_string(), "template files were not all written");
        }
        return;
    }

    let invoker = Invoker::new()
        .with_timeout(policy.command_timeout)
        .with_policy(policy.on_command_failure)
        .with_echo(policy.echo);

    for result in invoker.run(commands).await {
        let label = result.command.to_string();
        match result.status {
            CommandStatus::Skipped => summary.skipped(label, "an earlier command failed"),
            _ => match result.check() {
                Ok(_) => summary.done(label),
                Err(err) => summary.failed(label, err.to_string()),
            },
        }
    }
}
