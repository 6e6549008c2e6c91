//! Product configuration trait for CLI binaries
//!
//! A binary implements this trait to give the shared flows its identity,
//! its repository catalog and its post-setup instructions.

use crate::config::RepoCatalog;
use crate::request::ScaffoldRequest;
use std::path::Path;

/// Configuration trait for CLI products
///
/// Each product defines:
/// - Product identity (name, display name)
/// - The repositories offered by the clone command
/// - Post-setup instructions
pub trait ProductConfig: Clone + Send + Sync + 'static {
    /// Internal product name (used for CLI command, env vars)
    fn name(&self) -> &'static str;

    /// Human-readable display name
    fn display_name(&self) -> &'static str;

    /// CLI description shown in help text
    fn cli_description(&self) -> &'static str;

    /// Environment variable pointing at a YAML repository catalog
    fn repositories_env(&self) -> &'static str;

    /// Repositories offered when no catalog file is configured
    fn default_repositories(&self) -> RepoCatalog;

    /// Generate the "next steps" instructions after project creation
    fn next_steps(&self, dir: &Path, request: &ScaffoldRequest) -> Vec<String>;

    /// Instructions after a repository was cloned
    fn clone_next_steps(&self, dir: &Path) -> Vec<String> {
        vec![format!("cd {}", dir.display())]
    }
}
