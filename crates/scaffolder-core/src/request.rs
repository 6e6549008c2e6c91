//! Scaffold request types
//!
//! A [`ScaffoldRequest`] is built once from prompt answers or CLI flags and is
//! immutable afterwards. All raw strings are turned into typed values here so
//! nothing downstream compares free-text answers.

use crate::error::{Result, ScaffoldError};
use std::collections::BTreeSet;
use std::fmt;

const MAX_NAME_LEN: usize = 100;

/// A project name that is safe to use as a single directory component
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ProjectName(String);

impl ProjectName {
    pub fn parse(raw: &str) -> Result<Self> {
        let name = raw.trim();
        let invalid = |reason: &str| ScaffoldError::InvalidProjectName {
            name: name.to_string(),
            reason: reason.to_string(),
        };

        if name.is_empty() {
            return Err(invalid("name must not be empty"));
        }
        if name.len() > MAX_NAME_LEN {
            return Err(invalid("name must be at most 100 characters"));
        }
        if name.starts_with('.') || name.starts_with('-') {
            return Err(invalid("name must not start with '.' or '-'"));
        }
        if let Some(c) = name
            .chars()
            .find(|c| !(c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.')))
        {
            return Err(invalid(&format!("character '{}' is not allowed", c)));
        }

        Ok(Self(name.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Lowercased form, as npm requires for package names
    pub fn package_name(&self) -> String {
        self.0.to_ascii_lowercase()
    }
}

impl fmt::Display for ProjectName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Target framework for the generated project
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StackKind {
    ReactApp,
    FlaskApp,
    FastApiApp,
}

impl StackKind {
    pub const ALL: [StackKind; 3] = [StackKind::ReactApp, StackKind::FlaskApp, StackKind::FastApiApp];

    pub fn display_name(&self) -> &'static str {
        match self {
            StackKind::ReactApp => "React",
            StackKind::FlaskApp => "Flask",
            StackKind::FastApiApp => "FastAPI",
        }
    }

    /// Test frameworks that make sense for this stack, in menu order
    pub fn test_frameworks(&self) -> &'static [TestFramework] {
        match self {
            StackKind::ReactApp => &[TestFramework::Jest, TestFramework::Mocha],
            StackKind::FlaskApp | StackKind::FastApiApp => {
                &[TestFramework::Unittest, TestFramework::Pytest]
            }
        }
    }

    pub fn is_python(&self) -> bool {
        matches!(self, StackKind::FlaskApp | StackKind::FastApiApp)
    }
}

impl fmt::Display for StackKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, clap::ValueEnum)]
pub enum TestFramework {
    Jest,
    Mocha,
    Pytest,
    Unittest,
}

impl TestFramework {
    pub fn display_name(&self) -> &'static str {
        match self {
            TestFramework::Jest => "Jest",
            TestFramework::Mocha => "Mocha",
            TestFramework::Pytest => "pytest",
            TestFramework::Unittest => "unittest",
        }
    }
}

impl fmt::Display for TestFramework {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// Optional project features
///
/// The derived ordering is the order features are applied in; when two
/// features register the same file, the one that sorts later wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Feature {
    TypeScript,
    Tailwind,
    Linting,
    TestFramework(TestFramework),
}

impl Feature {
    pub fn display_name(&self) -> String {
        match self {
            Feature::TypeScript => "TypeScript".to_string(),
            Feature::Tailwind => "Tailwind CSS".to_string(),
            Feature::Linting => "Linting (ESLint)".to_string(),
            Feature::TestFramework(fw) => format!("{} tests", fw.display_name()),
        }
    }

    fn supported_by(&self, stack: StackKind) -> bool {
        match self {
            Feature::TypeScript | Feature::Tailwind | Feature::Linting => {
                stack == StackKind::ReactApp
            }
            Feature::TestFramework(fw) => stack.test_frameworks().contains(fw),
        }
    }
}

impl fmt::Display for Feature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.display_name())
    }
}

/// Everything needed to resolve templates and follow-up commands
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScaffoldRequest {
    name: ProjectName,
    stack: StackKind,
    features: BTreeSet<Feature>,
}

impl ScaffoldRequest {
    /// Build a request, rejecting features that don't apply to the stack
    pub fn new(
        name: ProjectName,
        stack: StackKind,
        features: impl IntoIterator<Item = Feature>,
    ) -> Result<Self> {
        let features: BTreeSet<Feature> = features.into_iter().collect();

        for feature in &features {
            if !feature.supported_by(stack) {
                return Err(ScaffoldError::UnsupportedFeature {
                    stack: stack.display_name().to_string(),
                    feature: feature.display_name(),
                });
            }
        }

        let frameworks: Vec<_> = features
            .iter()
            .filter(|f| matches!(f, Feature::TestFramework(_)))
            .collect();
        if frameworks.len() > 1 {
            return Err(ScaffoldError::UnsupportedFeature {
                stack: stack.display_name().to_string(),
                feature: "more than one test framework".to_string(),
            });
        }

        Ok(Self {
            name,
            stack,
            features,
        })
    }

    pub fn name(&self) -> &ProjectName {
        &self.name
    }

    pub fn stack(&self) -> StackKind {
        self.stack
    }

    /// Features in application order
    pub fn features(&self) -> impl Iterator<Item = Feature> + '_ {
        self.features.iter().copied()
    }

    pub fn has(&self, feature: Feature) -> bool {
        self.features.contains(&feature)
    }

    pub fn test_framework(&self) -> Option<TestFramework> {
        self.features.iter().find_map(|f| match f {
            Feature::TestFramework(fw) => Some(*fw),
            _ => None,
        })
    }

    pub fn uses_typescript(&self) -> bool {
        self.has(Feature::TypeScript)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn name(s: &str) -> ProjectName {
        ProjectName::parse(s).unwrap()
    }

    #[test]
    fn test_project_name_accepts_common_names() {
        assert_eq!(name("my-app").as_str(), "my-app");
        assert_eq!(name("  api_v2.service ").as_str(), "api_v2.service");
    }

    #[test]
    fn test_project_name_rejects_unsafe_names() {
        for bad in ["", "   ", "..", ".hidden", "-flag", "a/b", "a\\b", "my app", "ünï"] {
            assert!(ProjectName::parse(bad).is_err(), "accepted {:?}", bad);
        }
        assert!(ProjectName::parse(&"a".repeat(101)).is_err());
    }

    #[test]
    fn test_package_name_is_lowercase() {
        assert_eq!(name("MyApp").package_name(), "myapp");
    }

    #[test]
    fn test_react_only_features_rejected_for_python() {
        let err = ScaffoldRequest::new(name("svc"), StackKind::FlaskApp, [Feature::Tailwind])
            .unwrap_err();
        assert!(matches!(err, ScaffoldError::UnsupportedFeature { .. }));
    }

    #[test]
    fn test_mismatched_test_framework_rejected() {
        let jest = Feature::TestFramework(TestFramework::Jest);
        assert!(ScaffoldRequest::new(name("svc"), StackKind::FastApiApp, [jest]).is_err());

        let pytest = Feature::TestFramework(TestFramework::Pytest);
        assert!(ScaffoldRequest::new(name("web"), StackKind::ReactApp, [pytest]).is_err());
    }

    #[test]
    fn test_only_one_test_framework() {
        let result = ScaffoldRequest::new(
            name("web"),
            StackKind::ReactApp,
            [
                Feature::TestFramework(TestFramework::Jest),
                Feature::TestFramework(TestFramework::Mocha),
            ],
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_features_are_ordered_regardless_of_input() {
        let request = ScaffoldRequest::new(
            name("web"),
            StackKind::ReactApp,
            [
                Feature::TestFramework(TestFramework::Jest),
                Feature::Linting,
                Feature::TypeScript,
                Feature::Tailwind,
            ],
        )
        .unwrap();

        let order: Vec<Feature> = request.features().collect();
        assert_eq!(
            order,
            vec![
                Feature::TypeScript,
                Feature::Tailwind,
                Feature::Linting,
                Feature::TestFramework(TestFramework::Jest),
            ]
        );
        assert_eq!(request.test_framework(), Some(TestFramework::Jest));
        assert!(request.uses_typescript());
    }
}
