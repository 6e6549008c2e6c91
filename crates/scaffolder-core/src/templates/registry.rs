//! Template registry: maps a scaffold request to the files it produces
//!
//! Each stack contributes a base [`Layer`] and one layer per selected feature.
//! Layers are applied in feature order on top of each other:
//! - `files` insert a file, or replace an earlier entry with the same path in place
//! - `removes` drop an earlier entry
//! - `appends` add a line to a file unless that exact line is already there
//!
//! Resolution is a pure function of the request, so it can be tested without
//! touching the filesystem.

use crate::error::{Result, ScaffoldError};
use crate::request::{Feature, ScaffoldRequest, StackKind};
use crate::runtime::invoker::FollowUpCommand;
use crate::templates::stacks::{FastApiBlueprint, FlaskBlueprint, ReactBlueprint};
use std::fmt;
use std::path::{Component, Path};

/// A path relative to the project root that cannot escape it
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TemplatePath(String);

impl TemplatePath {
    pub fn parse(raw: &str) -> Result<Self> {
        let invalid = |reason: &str| ScaffoldError::InvalidPath {
            path: raw.to_string(),
            reason: reason.to_string(),
        };

        if raw.is_empty() {
            return Err(invalid("path is empty"));
        }
        if raw.contains('\\') {
            return Err(invalid("use '/' as the separator"));
        }
        if raw.starts_with('/') || Path::new(raw).is_absolute() || raw.contains(':') {
            return Err(invalid("path must be relative to the project root"));
        }
        for segment in raw.split('/') {
            match segment {
                "" => return Err(invalid("path has an empty segment")),
                "." => return Err(invalid("path has a '.' segment")),
                ".." => return Err(invalid("path must not contain '..'")),
                _ => {}
            }
        }
        // Platform-specific prefixes (e.g. `C:`) show up as non-normal components
        if Path::new(raw)
            .components()
            .any(|c| !matches!(c, Component::Normal(_)))
        {
            return Err(invalid("path must only contain normal components"));
        }

        Ok(Self(raw.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TemplatePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// How a registered template produces its content
#[derive(Clone, Copy)]
pub enum TemplateBody {
    Literal(&'static str),
    Render(fn(&ScaffoldRequest) -> String),
}

impl TemplateBody {
    fn render(&self, request: &ScaffoldRequest) -> String {
        match self {
            TemplateBody::Literal(text) => (*text).to_string(),
            TemplateBody::Render(render) => render(request),
        }
    }
}

impl fmt::Debug for TemplateBody {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TemplateBody::Literal(text) => write!(f, "Literal({} bytes)", text.len()),
            TemplateBody::Render(_) => f.write_str("Render(..)"),
        }
    }
}

/// A statically registered template entry
#[derive(Debug, Clone, Copy)]
pub struct TemplateSpec {
    pub path: &'static str,
    pub body: TemplateBody,
}

impl TemplateSpec {
    pub const fn literal(path: &'static str, text: &'static str) -> Self {
        Self {
            path,
            body: TemplateBody::Literal(text),
        }
    }

    pub const fn render(path: &'static str, render: fn(&ScaffoldRequest) -> String) -> Self {
        Self {
            path,
            body: TemplateBody::Render(render),
        }
    }
}

/// What one stack base or one feature contributes
#[derive(Debug, Clone, Default)]
pub struct Layer {
    pub files: Vec<TemplateSpec>,
    pub removes: Vec<&'static str>,
    pub appends: Vec<(&'static str, &'static str)>,
}

impl Layer {
    pub fn files(files: impl IntoIterator<Item = TemplateSpec>) -> Self {
        Self {
            files: files.into_iter().collect(),
            ..Self::default()
        }
    }

    pub fn removing(mut self, paths: impl IntoIterator<Item = &'static str>) -> Self {
        self.removes.extend(paths);
        self
    }

    pub fn appending(mut self, path: &'static str, line: &'static str) -> Self {
        self.appends.push((path, line));
        self
    }
}

/// A resolved file ready to be written
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateFile {
    pub path: TemplatePath,
    pub content: String,
}

/// Ordered set of template files keyed by path
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TemplateSet {
    files: Vec<TemplateFile>,
}

impl TemplateSet {
    pub fn new() -> Self {
        Self::default()
    }

    fn position(&self, path: &TemplatePath) -> Option<usize> {
        self.files.iter().position(|f| &f.path == path)
    }

    /// Insert a file; an existing entry at the same path is replaced in place
    pub fn put(&mut self, path: TemplatePath, content: String) {
        match self.position(&path) {
            Some(idx) => self.files[idx].content = content,
            None => self.files.push(TemplateFile { path, content }),
        }
    }

    pub fn remove(&mut self, path: &TemplatePath) -> bool {
        match self.position(path) {
            Some(idx) => {
                self.files.remove(idx);
                true
            }
            None => false,
        }
    }

    /// Append `line` to the file at `path` unless it already has that line.
    /// Creates the file when it isn't registered yet.
    pub fn append_line(&mut self, path: TemplatePath, line: &str) {
        let Some(idx) = self.position(&path) else {
            self.files.push(TemplateFile {
                path,
                content: format!("{}\n", line),
            });
            return;
        };

        let file = &mut self.files[idx];
        if file.content.lines().any(|existing| existing.trim() == line) {
            return;
        }
        if !file.content.is_empty() && !file.content.ends_with('\n') {
            file.content.push('\n');
        }
        file.content.push_str(line);
        file.content.push('\n');
    }

    pub fn apply(&mut self, layer: &Layer, request: &ScaffoldRequest) -> Result<()> {
        for path in &layer.removes {
            self.remove(&TemplatePath::parse(path)?);
        }
        for spec in &layer.files {
            self.put(TemplatePath::parse(spec.path)?, spec.body.render(request));
        }
        for (path, line) in &layer.appends {
            self.append_line(TemplatePath::parse(path)?, line);
        }
        Ok(())
    }

    pub fn get(&self, path: &str) -> Option<&TemplateFile> {
        self.files.iter().find(|f| f.path.as_str() == path)
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    pub fn into_files(self) -> Vec<TemplateFile> {
        self.files
    }
}

/// Per-stack template catalog
pub trait StackBlueprint {
    /// Files every project of this stack starts with
    fn base(&self, request: &ScaffoldRequest) -> Layer;

    /// Contribution of a single feature; `None` when the feature adds no files
    fn feature(&self, feature: Feature, request: &ScaffoldRequest) -> Option<Layer>;

    /// Commands to run in the project root after the files are written
    fn commands(&self, request: &ScaffoldRequest, root: &Path) -> Vec<FollowUpCommand>;
}

/// Look up the blueprint for a stack
pub fn blueprint(stack: StackKind) -> &'static dyn StackBlueprint {
    match stack {
        StackKind::ReactApp => &ReactBlueprint,
        StackKind::FlaskApp => &FlaskBlueprint,
        StackKind::FastApiApp => &FastApiBlueprint,
    }
}

/// Resolve the ordered list of files for a request
pub fn resolve_templates(request: &ScaffoldRequest) -> Result<Vec<TemplateFile>> {
    let stack = blueprint(request.stack());
    let mut set = TemplateSet::new();

    set.apply(&stack.base(request), request)?;
    for feature in request.features() {
        if let Some(layer) = stack.feature(feature, request) {
            set.apply(&layer, request)?;
        }
    }

    Ok(set.into_files())
}

/// Resolve the follow-up commands for a request rooted at `root`
pub fn resolve_commands(request: &ScaffoldRequest, root: &Path) -> Vec<FollowUpCommand> {
    blueprint(request.stack()).commands(request, root)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::request::{ProjectName, TestFramework};

    fn request(stack: StackKind, features: &[Feature]) -> ScaffoldRequest {
        ScaffoldRequest::new(
            ProjectName::parse("demo").unwrap(),
            stack,
            features.iter().copied(),
        )
        .unwrap()
    }

    fn paths(files: &[TemplateFile]) -> Vec<&str> {
        files.iter().map(|f| f.path.as_str()).collect()
    }

    fn all_requests() -> Vec<ScaffoldRequest> {
        let mut requests = Vec::new();
        for stack in StackKind::ALL {
            requests.push(request(stack, &[]));
            for fw in stack.test_frameworks() {
                requests.push(request(stack, &[Feature::TestFramework(*fw)]));
            }
        }
        requests.push(request(
            StackKind::ReactApp,
            &[
                Feature::TypeScript,
                Feature::Tailwind,
                Feature::Linting,
                Feature::TestFramework(TestFramework::Jest),
            ],
        ));
        requests
    }

    #[test]
    fn test_template_path_rejects_escapes() {
        for bad in [
            "",
            "../x",
            "a/../b",
            "a/..",
            "/etc/passwd",
            "./a",
            "a//b",
            "a\\b",
            "C:/x",
        ] {
            assert!(TemplatePath::parse(bad).is_err(), "accepted {:?}", bad);
        }
        assert_eq!(TemplatePath::parse("app/main.py").unwrap().as_str(), "app/main.py");
        assert!(TemplatePath::parse(".gitignore").is_ok());
    }

    #[test]
    fn test_every_stack_resolves_non_empty_and_deterministic() {
        for req in all_requests() {
            let first = resolve_templates(&req).unwrap();
            let second = resolve_templates(&req).unwrap();
            assert!(!first.is_empty(), "{} resolved no files", req.stack());
            assert_eq!(first, second);
        }
    }

    #[test]
    fn test_no_resolved_path_escapes_root() {
        for req in all_requests() {
            for file in resolve_templates(&req).unwrap() {
                assert!(
                    !file.path.as_str().split('/').any(|s| s == ".."),
                    "{} escapes the root",
                    file.path
                );
                assert!(!file.path.as_str().starts_with('/'));
            }
        }
    }

    #[test]
    fn test_resolved_paths_are_unique() {
        for req in all_requests() {
            let files = resolve_templates(&req).unwrap();
            let mut seen = std::collections::HashSet::new();
            for file in &files {
                assert!(seen.insert(file.path.clone()), "duplicate {}", file.path);
            }
        }
    }

    #[test]
    fn test_later_layer_replaces_in_place() {
        let req = request(StackKind::FlaskApp, &[]);
        let mut set = TemplateSet::new();
        set.apply(
            &Layer::files([
                TemplateSpec::literal("a.txt", "first"),
                TemplateSpec::literal("b.txt", "b"),
            ]),
            &req,
        )
        .unwrap();
        set.apply(&Layer::files([TemplateSpec::literal("a.txt", "second")]), &req)
            .unwrap();

        let files = set.into_files();
        assert_eq!(paths(&files), vec!["a.txt", "b.txt"]);
        assert_eq!(files[0].content, "second");
    }

    #[test]
    fn test_append_line_is_idempotent() {
        let mut set = TemplateSet::new();
        let path = TemplatePath::parse("requirements.txt").unwrap();
        set.put(path.clone(), "flask".to_string());

        set.append_line(path.clone(), "pytest");
        set.append_line(path.clone(), "pytest");

        assert_eq!(set.get("requirements.txt").unwrap().content, "flask\npytest\n");
    }

    #[test]
    fn test_append_line_creates_missing_file() {
        let mut set = TemplateSet::new();
        set.append_line(TemplatePath::parse("notes.txt").unwrap(), "hello");
        assert_eq!(set.get("notes.txt").unwrap().content, "hello\n");
    }

    #[test]
    fn test_layer_with_bad_path_fails_resolution() {
        let req = request(StackKind::FlaskApp, &[]);
        let mut set = TemplateSet::new();
        let err = set
            .apply(&Layer::files([TemplateSpec::literal("../evil", "x")]), &req)
            .unwrap_err();
        assert!(matches!(err, ScaffoldError::InvalidPath { .. }));
        assert!(set.is_empty());
    }

    #[test]
    fn test_flask_pytest_scenario() {
        let req = request(
            StackKind::FlaskApp,
            &[Feature::TestFramework(TestFramework::Pytest)],
        );
        let files = resolve_templates(&req).unwrap();
        let listed = paths(&files);

        for expected in [
            "app/main.py",
            "app/models.py",
            "app/schemas.py",
            "app/routes.py",
            "requirements.txt",
            "tests/test_main.py",
        ] {
            assert!(listed.contains(&expected), "missing {}", expected);
        }

        let requirements = &files
            .iter()
            .find(|f| f.path.as_str() == "requirements.txt")
            .unwrap()
            .content;
        assert!(requirements.lines().any(|l| l == "flask"));
        assert_eq!(requirements.lines().filter(|l| *l == "pytest").count(), 1);
    }

    #[test]
    fn test_test_framework_adds_only_test_entries() {
        for stack in [StackKind::FlaskApp, StackKind::FastApiApp] {
            let base = resolve_templates(&request(stack, &[])).unwrap();
            for fw in [TestFramework::Pytest, TestFramework::Unittest] {
                let with_tests =
                    resolve_templates(&request(stack, &[Feature::TestFramework(fw)])).unwrap();
                let added: Vec<&str> = paths(&with_tests)
                    .into_iter()
                    .filter(|p| !paths(&base).contains(p))
                    .collect();
                assert_eq!(added, vec!["tests/__init__.py", "tests/test_main.py"]);
            }
        }
    }

    #[test]
    fn test_unittest_adds_no_requirement() {
        let base = resolve_templates(&request(StackKind::FastApiApp, &[])).unwrap();
        let with_tests = resolve_templates(&request(
            StackKind::FastApiApp,
            &[Feature::TestFramework(TestFramework::Unittest)],
        ))
        .unwrap();

        let reqs = |files: &[TemplateFile]| {
            files
                .iter()
                .find(|f| f.path.as_str() == "requirements.txt")
                .map(|f| f.content.clone())
        };
        assert_eq!(reqs(&base), reqs(&with_tests));
    }

    #[test]
    fn test_python_stacks_have_no_commands() {
        let root = Path::new("/tmp/demo");
        assert!(resolve_commands(&request(StackKind::FlaskApp, &[]), root).is_empty());
        assert!(resolve_commands(&request(StackKind::FastApiApp, &[]), root).is_empty());
    }
}
