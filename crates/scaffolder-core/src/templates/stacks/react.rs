//! React project skeleton
//!
//! Writes the same layout create-react-app would produce, then lets npm
//! install the packages. Tool configs (Tailwind, ESLint, Mocha) are written as
//! files instead of running their interactive `init` generators.

use crate::request::{Feature, ScaffoldRequest, TestFramework};
use crate::runtime::invoker::FollowUpCommand;
use crate::templates::registry::{Layer, StackBlueprint, TemplateSpec};
use std::path::Path;

const INDEX_CSS: &str = r#"body {
  margin: 0;
  font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', 'Roboto', sans-serif;
  -webkit-font-smoothing: antialiased;
}
"#;

const TAILWIND_CSS: &str = r#"@tailwind base;
@tailwind components;
@tailwind utilities;
"#;

const TAILWIND_CONFIG: &str = r#"/** @type {import('tailwindcss').Config} */
module.exports = {
  content: ['./src/**/*.{js,jsx,ts,tsx}', './public/index.html'],
  theme: {
    extend: {},
  },
  plugins: [],
};
"#;

const POSTCSS_CONFIG: &str = r#"module.exports = {
  plugins: {
    tailwindcss: {},
    autoprefixer: {},
  },
};
"#;

const ESLINTRC: &str = r#"{
  "root": true,
  "extends": ["react-app", "react-app/jest"],
  "rules": {
    "no-unused-vars": "warn"
  }
}
"#;

const INDEX_JS: &str = r#"import React from 'react';
import ReactDOM from 'react-dom/client';
import './index.css';
import App from './App';

const root = ReactDOM.createRoot(document.getElementById('root'));
root.render(
  <React.StrictMode>
    <App />
  </React.StrictMode>
);
"#;

const INDEX_TSX: &str = r#"import React from 'react';
import ReactDOM from 'react-dom/client';
import './index.css';
import App from './App';

const root = ReactDOM.createRoot(document.getElementById('root') as HTMLElement);
root.render(
  <React.StrictMode>
    <App />
  </React.StrictMode>
);
"#;

const REACT_APP_ENV: &str = "/// <reference types=\"react-scripts\" />\n";

const TSCONFIG: &str = r#"{
  "compilerOptions": {
    "target": "es5",
    "lib": ["dom", "dom.iterable", "esnext"],
    "allowJs": true,
    "skipLibCheck": true,
    "esModuleInterop": true,
    "allowSyntheticDefaultImports": true,
    "strict": true,
    "forceConsistentCasingInFileNames": true,
    "noFallthroughCasesInSwitch": true,
    "module": "esnext",
    "moduleResolution": "node",
    "resolveJsonModule": true,
    "isolatedModules": true,
    "noEmit": true,
    "jsx": "react-jsx"
  },
  "include": ["src"]
}
"#;

const JEST_TEST: &str = r#"import App from './App';

test('App is a component', () => {
  expect(typeof App).toBe('function');
});
"#;

const MOCHARC: &str = r#"{
  "spec": "test/**/*.spec.js"
}
"#;

const MOCHA_TEST: &str = r#"const assert = require('assert');

describe('project', () => {
  it('runs the test suite', () => {
    assert.strictEqual(1 + 1, 2);
  });
});
"#;

const GITIGNORE: &str = r#"/node_modules
/coverage
/build
.DS_Store
.env.local
npm-debug.log*
"#;

fn package_json(request: &ScaffoldRequest) -> String {
    let mut dependencies = vec![
        ("react", "^18.3.1"),
        ("react-dom", "^18.3.1"),
        ("react-scripts", "5.0.1"),
    ];
    if request.uses_typescript() {
        dependencies.extend([
            ("typescript", "^4.9.5"),
            ("@types/react", "^18.3.3"),
            ("@types/react-dom", "^18.3.0"),
        ]);
    }

    let mut scripts = vec![
        ("start", "react-scripts start"),
        ("build", "react-scripts build"),
    ];
    match request.test_framework() {
        Some(TestFramework::Mocha) => scripts.push(("test", "mocha")),
        _ => scripts.push(("test", "react-scripts test")),
    }
    if request.has(Feature::Linting) {
        scripts.push(("lint", "eslint src"));
    }

    let entries = |pairs: &[(&str, &str)]| {
        pairs
            .iter()
            .map(|(k, v)| format!("    \"{}\": \"{}\"", k, v))
            .collect::<Vec<_>>()
            .join(",\n")
    };

    format!(
        r#"{{
  "name": "{name}",
  "version": "0.1.0",
  "private": true,
  "dependencies": {{
{dependencies}
  }},
  "scripts": {{
{scripts}
  }},
  "browserslist": {{
    "production": [">0.2%", "not dead", "not op_mini all"],
    "development": ["last 1 chrome version", "last 1 firefox version", "last 1 safari version"]
  }}
}}
"#,
        name = request.name().package_name(),
        dependencies = entries(&dependencies),
        scripts = entries(&scripts),
    )
}

fn index_html(request: &ScaffoldRequest) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
  <head>
    <meta charset="utf-8" />
    <meta name="viewport" content="width=device-width, initial-scale=1" />
    <title>{}</title>
  </head>
  <body>
    <noscript>You need to enable JavaScript to run this app.</noscript>
    <div id="root"></div>
  </body>
</html>
"#,
        request.name()
    )
}

fn app_component(request: &ScaffoldRequest) -> String {
    let class = if request.has(Feature::Tailwind) {
        r#" className="p-8 text-2xl font-bold""#
    } else {
        ""
    };
    format!(
        r#"function App() {{
  return (
    <main{class}>
      <h1>{name}</h1>
      <p>Edit src/App to get started.</p>
    </main>
  );
}}

export default App;
"#,
        class = class,
        name = request.name()
    )
}

fn readme(request: &ScaffoldRequest) -> String {
    let mut text = format!(
        "# {}\n\nReact app scaffolded by skeleton-tools.\n\n## Scripts\n\n- `npm start` runs the dev server\n- `npm run build` builds for production\n- `npm test` runs the tests\n",
        request.name()
    );
    if request.has(Feature::Linting) {
        text.push_str("- `npm run lint` lints `src/`\n");
    }
    text
}

pub struct ReactBlueprint;

impl StackBlueprint for ReactBlueprint {
    fn base(&self, _request: &ScaffoldRequest) -> Layer {
        Layer::files([
            TemplateSpec::render("package.json", package_json),
            TemplateSpec::render("public/index.html", index_html),
            TemplateSpec::literal("src/index.js", INDEX_JS),
            TemplateSpec::render("src/App.js", app_component),
            TemplateSpec::literal("src/index.css", INDEX_CSS),
            TemplateSpec::literal(".gitignore", GITIGNORE),
            TemplateSpec::render("README.md", readme),
        ])
    }

    fn feature(&self, feature: Feature, request: &ScaffoldRequest) -> Option<Layer> {
        match feature {
            Feature::TypeScript => Some(
                Layer::files([
                    TemplateSpec::literal("src/index.tsx", INDEX_TSX),
                    TemplateSpec::render("src/App.tsx", app_component),
                    TemplateSpec::literal("src/react-app-env.d.ts", REACT_APP_ENV),
                    TemplateSpec::literal("tsconfig.json", TSCONFIG),
                ])
                .removing(["src/index.js", "src/App.js"]),
            ),
            Feature::Tailwind => Some(Layer::files([
                TemplateSpec::literal("tailwind.config.js", TAILWIND_CONFIG),
                TemplateSpec::literal("postcss.config.js", POSTCSS_CONFIG),
                TemplateSpec::literal("src/index.css", TAILWIND_CSS),
            ])),
            Feature::Linting => Some(Layer::files([TemplateSpec::literal(
                ".eslintrc.json",
                ESLINTRC,
            )])),
            Feature::TestFramework(TestFramework::Jest) => {
                let path = if request.uses_typescript() {
                    "src/App.test.tsx"
                } else {
                    "src/App.test.js"
                };
                Some(Layer::files([TemplateSpec::literal(path, JEST_TEST)]))
            }
            Feature::TestFramework(TestFramework::Mocha) => Some(Layer::files([
                TemplateSpec::literal(".mocharc.json", MOCHARC),
                TemplateSpec::literal("test/app.spec.js", MOCHA_TEST),
            ])),
            Feature::TestFramework(_) => None,
        }
    }

    fn commands(&self, request: &ScaffoldRequest, root: &Path) -> Vec<FollowUpCommand> {
        let npm = |args: &[&str]| FollowUpCommand::new("npm", args, root);

        let mut commands = vec![npm(&["install"])];
        for feature in request.features() {
            match feature {
                Feature::Tailwind => {
                    commands.push(npm(&["install", "-D", "tailwindcss@3", "postcss", "autoprefixer"]))
                }
                Feature::Linting => commands.push(npm(&["install", "-D", "eslint@8"])),
                Feature::TestFramework(TestFramework::Jest) => {
                    commands.push(npm(&["install", "--save-dev", "jest"]))
                }
                Feature::TestFramework(TestFramework::Mocha) => {
                    commands.push(npm(&["install", "--save-dev", "mocha"]))
                }
                Feature::TypeScript | Feature::TestFramework(_) => {}
            }
        }
        commands
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::request::{ProjectName, StackKind};
    use crate::templates::registry::{resolve_commands, resolve_templates};

    fn request(features: &[Feature]) -> ScaffoldRequest {
        ScaffoldRequest::new(
            ProjectName::parse("MyWeb").unwrap(),
            StackKind::ReactApp,
            features.iter().copied(),
        )
        .unwrap()
    }

    fn content<'a>(files: &'a [crate::templates::TemplateFile], path: &str) -> Option<&'a str> {
        files
            .iter()
            .find(|f| f.path.as_str() == path)
            .map(|f| f.content.as_str())
    }

    #[test]
    fn test_typescript_replaces_js_entry_points() {
        let files = resolve_templates(&request(&[Feature::TypeScript])).unwrap();

        assert!(content(&files, "src/index.js").is_none());
        assert!(content(&files, "src/App.js").is_none());
        assert!(content(&files, "src/index.tsx").is_some());
        assert!(content(&files, "tsconfig.json").is_some());
        assert!(content(&files, "package.json").unwrap().contains("\"typescript\""));
    }

    #[test]
    fn test_tailwind_overrides_base_stylesheet() {
        let files = resolve_templates(&request(&[Feature::Tailwind])).unwrap();
        let css = content(&files, "src/index.css").unwrap();
        assert!(css.starts_with("@tailwind base;"));
        assert!(content(&files, "tailwind.config.js").is_some());
        assert!(content(&files, "src/App.js").unwrap().contains("className"));
    }

    #[test]
    fn test_package_name_is_lowercased() {
        let files = resolve_templates(&request(&[])).unwrap();
        let pkg = content(&files, "package.json").unwrap();
        assert!(pkg.contains("\"name\": \"myweb\""));
        assert!(content(&files, "public/index.html").unwrap().contains("<title>MyWeb</title>"));
    }

    #[test]
    fn test_jest_test_follows_typescript() {
        let jest = Feature::TestFramework(TestFramework::Jest);
        let js = resolve_templates(&request(&[jest])).unwrap();
        let ts = resolve_templates(&request(&[Feature::TypeScript, jest])).unwrap();
        assert!(content(&js, "src/App.test.js").is_some());
        assert!(content(&ts, "src/App.test.tsx").is_some());
        assert!(content(&ts, "src/App.test.js").is_none());
    }

    #[test]
    fn test_mocha_sets_test_script() {
        let files =
            resolve_templates(&request(&[Feature::TestFramework(TestFramework::Mocha)])).unwrap();
        assert!(content(&files, "package.json").unwrap().contains("\"test\": \"mocha\""));
        assert!(content(&files, "test/app.spec.js").is_some());
    }

    #[test]
    fn test_commands_follow_feature_order() {
        let root = Path::new("/work/myweb");
        let commands = resolve_commands(
            &request(&[
                Feature::TestFramework(TestFramework::Mocha),
                Feature::Linting,
                Feature::Tailwind,
            ]),
            root,
        );

        let rendered: Vec<String> = commands.iter().map(|c| c.to_string()).collect();
        assert_eq!(
            rendered,
            vec![
                "npm install",
                "npm install -D tailwindcss@3 postcss autoprefixer",
                "npm install -D eslint@8",
                "npm install --save-dev mocha",
            ]
        );
        assert!(commands.iter().all(|c| c.working_dir == root));
    }
}
