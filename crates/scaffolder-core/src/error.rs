//! Error types for scaffolding operations
//!
//! Every variant maps to one of the process exit codes in [`crate::exit_codes`], so the
//! binary can tell a cancelled prompt apart from a hard failure.

use crate::exit_codes;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// A single template write that did not make it to disk
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WriteFailure {
    /// Path relative to the project root
    pub path: String,
    /// Underlying I/O error, rendered
    pub reason: String,
}

/// Main error type for scaffolding operations
#[derive(Error, Debug)]
pub enum ScaffoldError {
    /// The user aborted a prompt (Esc or Ctrl+C)
    #[error("Operation cancelled")]
    UserCancelled,

    #[error("Invalid project name '{name}': {reason}")]
    InvalidProjectName { name: String, reason: String },

    #[error("{feature} is not available for {stack} projects")]
    UnsupportedFeature { stack: String, feature: String },

    /// A template path is absolute or tries to leave the project root
    #[error("Invalid template path '{path}': {reason}")]
    InvalidPath { path: String, reason: String },

    #[error("{} already exists and is not an empty directory", .root.display())]
    PathConflict { root: PathBuf },

    #[error("Failed to create directory {}: {source}", .path.display())]
    CreateDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Some template writes failed; the rest were attempted anyway
    #[error("{}", partial_failure_message(.written, .failed))]
    PartialFailure {
        written: Vec<String>,
        failed: Vec<WriteFailure>,
    },

    #[error("`{command}` failed: {status}")]
    ExternalCommandFailed { command: String, status: String },

    #[error(transparent)]
    Clone(#[from] CloneError),

    #[error("Prompt failed: {0}")]
    Prompt(#[source] io::Error),

    #[error("Configuration error: {0:#}")]
    Config(anyhow::Error),
}

impl ScaffoldError {
    /// Returns the process exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            ScaffoldError::UserCancelled => exit_codes::CANCELLED,
            ScaffoldError::PartialFailure { .. } | ScaffoldError::ExternalCommandFailed { .. } => {
                exit_codes::COMPLETED_WITH_FAILURES
            }
            ScaffoldError::InvalidProjectName { .. }
            | ScaffoldError::UnsupportedFeature { .. }
            | ScaffoldError::InvalidPath { .. }
            | ScaffoldError::PathConflict { .. }
            | ScaffoldError::CreateDir { .. }
            | ScaffoldError::Clone(_)
            | ScaffoldError::Prompt(_)
            | ScaffoldError::Config(_) => exit_codes::FAILURE,
        }
    }

    /// Convert a prompt I/O error, treating interrupts as user cancellation
    pub fn from_prompt(err: io::Error) -> Self {
        if err.kind() == io::ErrorKind::Interrupted {
            ScaffoldError::UserCancelled
        } else {
            ScaffoldError::Prompt(err)
        }
    }
}

/// Failure modes of cloning a repository
#[derive(Error, Debug)]
pub enum CloneError {
    #[error("Invalid repository URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("Destination {} already exists", .0.display())]
    DestinationExists(PathBuf),

    #[error("Could not run git: {0}")]
    GitUnavailable(#[source] io::Error),

    #[error("git clone exited with {}", describe_exit(.code))]
    GitFailed { code: Option<i32> },

    #[error("git clone timed out after {0} seconds")]
    TimedOut(u64),
}

fn partial_failure_message(written: &[String], failed: &[WriteFailure]) -> String {
    let paths: Vec<&str> = failed.iter().map(|f| f.path.as_str()).collect();
    format!(
        "{} of {} files could not be written: {}",
        failed.len(),
        failed.len() + written.len(),
        paths.join(", ")
    )
}

fn describe_exit(code: &Option<i32>) -> String {
    match code {
        Some(code) => code.to_string(),
        None => "a signal".to_string(),
    }
}

/// Result type alias for scaffolding operations
pub type Result<T> = std::result::Result<T, ScaffoldError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_interrupted_prompt_is_cancellation() {
        let err = ScaffoldError::from_prompt(io::Error::new(io::ErrorKind::Interrupted, "esc"));
        assert!(matches!(err, ScaffoldError::UserCancelled));
        assert_eq!(err.exit_code(), exit_codes::CANCELLED);
    }

    #[test]
    fn test_other_prompt_errors_are_hard_failures() {
        let err = ScaffoldError::from_prompt(io::Error::new(io::ErrorKind::BrokenPipe, "tty"));
        assert!(matches!(err, ScaffoldError::Prompt(_)));
        assert_eq!(err.exit_code(), exit_codes::FAILURE);
    }

    #[test]
    fn test_partial_failure_message_lists_paths() {
        let err = ScaffoldError::PartialFailure {
            written: vec!["a.txt".to_string()],
            failed: vec![WriteFailure {
                path: "b/c.txt".to_string(),
                reason: "denied".to_string(),
            }],
        };
        assert_eq!(
            err.to_string(),
            "1 of 2 files could not be written: b/c.txt"
        );
        assert_eq!(err.exit_code(), exit_codes::COMPLETED_WITH_FAILURES);
    }

    #[test]
    fn test_clone_errors_are_fatal() {
        let err: ScaffoldError = CloneError::GitFailed { code: Some(128) }.into();
        assert_eq!(err.exit_code(), exit_codes::FAILURE);
        assert_eq!(err.to_string(), "git clone exited with 128");
    }
}
