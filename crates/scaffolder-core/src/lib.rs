//! Scaffolder Core - Shared library for project skeleton CLIs
//!
//! This library turns a validated request (project name, stack, features) into
//! a directory of starter files, then runs the stack's follow-up commands and
//! reports every step in a [`RunSummary`]. It also clones repositories from a
//! small catalog.
//!
//! # Architecture
//!
//! The library is organized into layers:
//!
//! - **Layer 1: Core Operations** - Template registry, scaffold writer, external process invoker, git clone
//! - **Layer 2: Workflow Orchestration** - `ProductConfig` trait, `RunPolicy` and `workflow::scaffold`
//! - **Layer 3: CLI/TUI Interface** - Optional cliclack-based prompts (feature-gated)
//!
//! # Feature Flags
//!
//! - `tui` (default): Enables the cliclack-based TUI prompts module
//!
//! # Example Usage (without TUI)
//!
//! ```ignore
//! use scaffolder_core::{Feature, ProjectName, RunPolicy, ScaffoldRequest, StackKind, TestFramework};
//!
//! let request = ScaffoldRequest::new(
//!     ProjectName::parse("api")?,
//!     StackKind::FlaskApp,
//!     [Feature::TestFramework(TestFramework::Pytest)],
//! )?;
//! let summary = scaffolder_core::workflow::scaffold(&request, "api".as_ref(), &RunPolicy::default()).await?;
//! std::process::exit(summary.exit_code());
//! ```

pub mod config;
pub mod error;
pub mod exit_codes;
pub mod product;
pub mod request;
pub mod runtime;
pub mod summary;
pub mod templates;
pub mod workflow;

#[cfg(feature = "tui")]
pub mod tui;

// Re-export main types for convenience
pub use error::{CloneError, Result, ScaffoldError};
pub use product::ProductConfig;
pub use request::{Feature, ProjectName, ScaffoldRequest, StackKind, TestFramework};
pub use runtime::{clone_repository, FollowUpCommand, Invoker};
pub use summary::RunSummary;
pub use templates::{materialize, resolve_commands, resolve_templates, TemplateFile};
pub use workflow::RunPolicy;

#[cfg(feature = "tui")]
pub use tui::{run_clone, run_create};
