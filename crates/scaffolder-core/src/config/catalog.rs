//! Repository catalog for the clone command
//!
//! The catalog is loaded from a YAML file when one is given (flag or
//! environment variable) and falls back to the product's built-in list.
//!
//! ```yaml
//! repositories:
//!   - name: Ollama
//!     url: https://github.com/ollama/ollama.git
//! ```

use crate::product::ProductConfig;
use crate::runtime::clone::validate_url;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepoEntry {
    /// Label shown in the selection menu
    pub name: String,
    pub url: String,
}

impl RepoEntry {
    pub fn new(name: &str, url: &str) -> Self {
        Self {
            name: name.to_string(),
            url: url.to_string(),
        }
    }
}

/// Ordered list of clonable repositories
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepoCatalog {
    pub repositories: Vec<RepoEntry>,
}

impl RepoCatalog {
    /// Build a catalog, rejecting empty lists, duplicate names and bad URLs
    pub fn new(repositories: Vec<RepoEntry>) -> Result<Self> {
        let catalog = Self { repositories };
        catalog.validate()?;
        Ok(catalog)
    }

    /// Check an already-built catalog, e.g. one returned by `ProductConfig::default_repositories`
    pub fn validate(&self) -> Result<()> {
        if self.repositories.is_empty() {
            anyhow::bail!("Repository catalog is empty");
        }
        for (idx, entry) in self.repositories.iter().enumerate() {
            if entry.name.trim().is_empty() {
                anyhow::bail!("Repository #{} has an empty name", idx + 1);
            }
            if self.repositories[..idx]
                .iter()
                .any(|other| other.name.eq_ignore_ascii_case(&entry.name))
            {
                anyhow::bail!("Repository '{}' is listed more than once", entry.name);
            }
            validate_url(&entry.url)
                .with_context(|| format!("Repository '{}' has an invalid URL", entry.name))?;
        }
        Ok(())
    }

    /// Case-insensitive lookup by name
    pub fn find(&self, name: &str) -> Option<&RepoEntry> {
        self.repositories
            .iter()
            .find(|entry| entry.name.eq_ignore_ascii_case(name.trim()))
    }

    pub fn names(&self) -> Vec<&str> {
        self.repositories.iter().map(|e| e.name.as_str()).collect()
    }

    pub fn from_yaml(content: &str) -> Result<Self> {
        let catalog: RepoCatalog =
            serde_yaml::from_str(content).context("Failed to parse repository catalog")?;
        catalog.validate()?;
        Ok(catalog)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        Self::from_yaml(&content).with_context(|| format!("In {}", path.display()))
    }

    /// Resolve the catalog: explicit file, then the product's env var, then built-ins
    pub fn load<C: ProductConfig>(config: &C, explicit: Option<&Path>) -> Result<Self> {
        let from_env = std::env::var_os(config.repositories_env())
            .filter(|v| !v.is_empty())
            .map(PathBuf::from);

        match explicit.map(Path::to_path_buf).or(from_env) {
            Some(path) => Self::from_file(&path),
            None => {
                let catalog = config.default_repositories();
                catalog.validate()?;
                Ok(catalog)
            }
        }
    }
}
