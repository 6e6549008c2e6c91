//! Detection of the external tools a run depends on (git, npm, ...)

use crate::runtime::invoker::FollowUpCommand;
use std::process::Command;

/// Tool detection result
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolInfo {
    pub name: String,
    pub version: Option<String>,
    pub available: bool,
}

impl ToolInfo {
    /// "npm (10.2.0)" or "npm (not installed)"
    pub fn describe(&self) -> String {
        if self.available {
            format!("{} ({})", self.name, self.version.as_deref().unwrap_or("unknown"))
        } else {
            format!("{} (not installed)", self.name)
        }
    }
}

/// Check whether `name --version` runs successfully
pub fn check_tool(name: &str) -> ToolInfo {
    let output = Command::new(name).arg("--version").output();

    match output {
        Ok(out) if out.status.success() => {
            let version = String::from_utf8_lossy(&out.stdout)
                .lines()
                .next()
                .unwrap_or_default()
                .trim()
                .to_string();
            ToolInfo {
                name: name.to_string(),
                version: Some(version).filter(|v| !v.is_empty()),
                available: true,
            }
        }
        _ => ToolInfo {
            name: name.to_string(),
            version: None,
            available: false,
        },
    }
}

/// Distinct programs needed by `commands`, in first-use order
pub fn required_tools(commands: &[FollowUpCommand]) -> Vec<&str> {
    let mut tools: Vec<&str> = Vec::new();
    for command in commands {
        if !tools.contains(&command.program.as_str()) {
            tools.push(command.program.as_str());
        }
    }
    tools
}

/// Probe every tool in `names`; nothing here fails, missing tools are reported
pub fn check_tools(names: &[&str]) -> Vec<ToolInfo> {
    names.iter().map(|name| check_tool(name)).collect()
}

/// Names of tools from `infos` that were not found
pub fn missing(infos: &[ToolInfo]) -> Vec<&str> {
    infos
        .iter()
        .filter(|info| !info.available)
        .map(|info| info.name.as_str())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    #[test]
    fn test_required_tools_are_deduplicated_in_order() {
        let root = Path::new(".");
        let commands = vec![
            FollowUpCommand::new("npm", &["install"], root),
            FollowUpCommand::new("npx", &["thing"], root),
            FollowUpCommand::new("npm", &["install", "-D", "eslint"], root),
        ];
        assert_eq!(required_tools(&commands), vec!["npm", "npx"]);
    }

    #[test]
    fn test_unknown_tool_is_unavailable() {
        let info = check_tool("definitely-not-a-real-binary-xyz");
        assert!(!info.available);
        assert_eq!(info.describe(), "definitely-not-a-real-binary-xyz (not installed)");
        assert_eq!(missing(&[info]), vec!["definitely-not-a-real-binary-xyz"]);
    }

    #[test]
    fn test_describe_available_tool() {
        let info = ToolInfo {
            name: "git".to_string(),
            version: Some("git version 2.43.0".to_string()),
            available: true,
        };
        assert_eq!(info.describe(), "git (git version 2.43.0)");
    }
}
