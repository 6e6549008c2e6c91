//! Pieces shared by the Python stacks

use crate::request::TestFramework;
use crate::templates::registry::{Layer, TemplateSpec};

pub(super) const REQUIREMENTS: &str = "requirements.txt";

pub(super) const GITIGNORE: &str = r#".venv/
__pycache__/
*.pyc
"#;

/// Test bodies for one Python stack
pub(super) struct TestBodies {
    pub pytest: &'static str,
    pub unittest: &'static str,
}

/// Layer for a Python test framework: a `tests/` package plus, for pytest, a
/// requirement line. unittest ships with the standard library.
pub(super) fn test_layer(framework: TestFramework, bodies: &TestBodies) -> Option<Layer> {
    let (body, requirement) = match framework {
        TestFramework::Pytest => (bodies.pytest, Some("pytest")),
        TestFramework::Unittest => (bodies.unittest, None),
        TestFramework::Jest | TestFramework::Mocha => return None,
    };

    let layer = Layer::files([
        TemplateSpec::literal("tests/__init__.py", ""),
        TemplateSpec::literal("tests/test_main.py", body),
    ]);

    Some(match requirement {
        Some(line) => layer.appending(REQUIREMENTS, line),
        None => layer,
    })
}
