//! External processes
//!
//! This module provides:
//! - Follow-up command execution with output capture and timeouts
//! - Repository cloning through git
//! - Detection of the tools those commands need

pub mod check;
pub mod clone;
pub mod invoker;

pub use check::{check_tool, check_tools, required_tools, ToolInfo};
pub use clone::{clone_repository, validate_url};
pub use invoker::{
    CommandResult, CommandStatus, FailurePolicy, FollowUpCommand, Invoker,
    DEFAULT_COMMAND_TIMEOUT,
};
