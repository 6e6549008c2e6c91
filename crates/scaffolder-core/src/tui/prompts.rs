//! Charm-style CLI prompts using cliclack

use crate::config::{RepoCatalog, RepoEntry};
use crate::error::{Result, ScaffoldError};
use crate::product::ProductConfig;
use crate::request::{Feature, ProjectName, ScaffoldRequest, StackKind, TestFramework};
use crate::runtime::{check, clone, invoker::DEFAULT_COMMAND_TIMEOUT};
use crate::summary::{RunSummary, StepOutcome};
use crate::templates::{resolve_commands, WriteReport};
use crate::workflow::{self, Progress, RunPolicy};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Options for the create commands; anything left `None`/`false` is prompted for
#[derive(Debug, Clone)]
pub struct CreateArgs {
    /// Project name (also the directory name)
    pub name: Option<String>,

    /// Parent directory to create the project in (defaults to the current directory)
    pub directory: Option<PathBuf>,

    /// Test framework to set up
    pub test: Option<TestFramework>,

    /// Don't set up a test framework
    pub no_tests: bool,

    pub tailwind: bool,
    pub lint: bool,
    pub typescript: bool,

    /// Write files only, skip follow-up commands
    pub skip_install: bool,

    /// Stop at the first failed write or command
    pub fail_fast: bool,

    /// Bound for each follow-up command; `None` waits forever
    pub timeout: Option<Duration>,

    /// Auto-confirm all prompts (non-interactive mode)
    pub yes: bool,
}

impl Default for CreateArgs {
    fn default() -> Self {
        Self {
            name: None,
            directory: None,
            test: None,
            no_tests: false,
            tailwind: false,
            lint: false,
            typescript: false,
            skip_install: false,
            fail_fast: false,
            timeout: Some(DEFAULT_COMMAND_TIMEOUT),
            yes: false,
        }
    }
}

/// Options for the clone command
#[derive(Debug, Clone)]
pub struct CloneArgs {
    /// Catalog entry to clone
    pub repo: Option<String>,

    /// Clone an arbitrary URL instead of a catalog entry
    pub url: Option<String>,

    /// Destination folder
    pub dest: Option<PathBuf>,

    /// YAML repository catalog
    pub repos_file: Option<PathBuf>,

    pub timeout: Option<Duration>,

    pub yes: bool,
}

impl Default for CloneArgs {
    fn default() -> Self {
        Self {
            repo: None,
            url: None,
            dest: None,
            repos_file: None,
            timeout: Some(DEFAULT_COMMAND_TIMEOUT),
            yes: false,
        }
    }
}

/// What to do when no subcommand was given
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Create(StackKind),
    Clone,
}

/// cliclack returns `io::Result`; Esc/Ctrl+C comes back as `Interrupted`
trait PromptExt<T> {
    fn or_cancel(self) -> Result<T>;
}

impl<T> PromptExt<T> for std::io::Result<T> {
    fn or_cancel(self) -> Result<T> {
        self.map_err(ScaffoldError::from_prompt)
    }
}

/// Ask which command to run
pub fn select_action() -> Result<Action> {
    let mut select = cliclack::select("What would you like to do?");
    for stack in StackKind::ALL {
        select = select.item(
            Action::Create(stack),
            format!("Create a {} skeleton", stack.display_name()),
            "",
        );
    }
    select = select.item(Action::Clone, "Clone a repository", "");

    let action = select.interact().or_cancel();
    if let Err(err) = &action {
        let _ = cliclack::outro_cancel(err.to_string());
    }
    action
}

/// Interactive create flow for one stack
pub async fn run_create<C: ProductConfig>(
    config: &C,
    stack: StackKind,
    args: CreateArgs,
) -> Result<RunSummary> {
    cliclack::intro(format!("{} · {} skeleton", config.display_name(), stack)).or_cancel()?;
    finish(create_flow(config, stack, &args).await)
}

/// Interactive clone flow
pub async fn run_clone<C: ProductConfig>(config: &C, args: CloneArgs) -> Result<RunSummary> {
    cliclack::intro(format!("{} · clone a repository", config.display_name())).or_cancel()?;
    finish(clone_flow(config, &args).await)
}

fn finish(result: Result<RunSummary>) -> Result<RunSummary> {
    match result {
        Ok(summary) => {
            if summary.has_failures() {
                cliclack::outro_cancel("Finished with errors").or_cancel()?;
            } else {
                cliclack::outro("Happy coding!").or_cancel()?;
            }
            Ok(summary)
        }
        Err(err) => {
            let _ = cliclack::outro_cancel(err.to_string());
            Err(err)
        }
    }
}

async fn create_flow<C: ProductConfig>(
    config: &C,
    stack: StackKind,
    args: &CreateArgs,
) -> Result<RunSummary> {
    let name = select_name(args)?;
    let root = project_root(args, &name);
    check_root(&root)?;

    let features = select_features(stack, args)?;
    let request = ScaffoldRequest::new(name, stack, features)?;

    if request.features().next().is_some() {
        let names: Vec<String> = request.features().map(|f| f.display_name()).collect();
        cliclack::log::info(format!("Features: {}", names.join(", "))).or_cancel()?;
    }

    let mut policy = RunPolicy {
        command_timeout: args.timeout,
        run_commands: !args.skip_install,
        ..RunPolicy::default()
    };
    if args.fail_fast {
        policy = policy.fail_fast();
    }

    let commands = if policy.run_commands {
        resolve_commands(&request, &root)
    } else {
        Vec::new()
    };
    preflight(&check::required_tools(&commands))?;

    let mut progress = SpinnerProgress::new();
    let summary = workflow::scaffold_with(&request, &root, &policy, &mut progress).await?;

    print_summary(&summary)?;
    print_next_steps(&config.next_steps(&root, &request))?;

    Ok(summary)
}

/// Shows the write step as a cliclack spinner
struct SpinnerProgress {
    spinner: cliclack::ProgressBar,
    root: PathBuf,
}

impl SpinnerProgress {
    fn new() -> Self {
        Self {
            spinner: cliclack::spinner(),
            root: PathBuf::new(),
        }
    }
}

impl Progress for SpinnerProgress {
    fn writing(&mut self, root: &Path, _count: usize) {
        self.root = root.to_path_buf();
        self.spinner.start("Writing project files...");
    }

    fn written(&mut self, result: &Result<WriteReport>) {
        match result {
            Ok(report) => self.spinner.stop(format!(
                "Created {} files in {}",
                report.written.len(),
                self.root.display()
            )),
            Err(ScaffoldError::PartialFailure { .. }) => {
                self.spinner.stop("Some files could not be written")
            }
            Err(_) => self.spinner.stop("Failed to write project files"),
        }
    }
}

fn select_name(args: &CreateArgs) -> Result<ProjectName> {
    if let Some(raw) = &args.name {
        let name = ProjectName::parse(raw)?;
        cliclack::log::info(format!("Project name: {}", name)).or_cancel()?;
        return Ok(name);
    }

    if args.yes {
        return Err(ScaffoldError::InvalidProjectName {
            name: String::new(),
            reason: "a name is required with --yes (use --name)".to_string(),
        });
    }

    let input: String = cliclack::input("Project name")
        .placeholder("my-project")
        .validate(|input: &String| match ProjectName::parse(input) {
            Ok(_) => Ok(()),
            Err(ScaffoldError::InvalidProjectName { reason, .. }) => Err(reason),
            Err(other) => Err(other.to_string()),
        })
        .interact()
        .or_cancel()?;

    ProjectName::parse(&input)
}

fn project_root(args: &CreateArgs, name: &ProjectName) -> PathBuf {
    let current_dir = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
    let parent = match &args.directory {
        Some(dir) if dir.is_absolute() => dir.clone(),
        Some(dir) => current_dir.join(dir),
        None => current_dir,
    };
    parent.join(name.as_str())
}

/// Fail before asking anything else if the project can't be written
fn check_root(root: &Path) -> Result<()> {
    if let Some(parent) = root.parent() {
        if !parent.as_os_str().is_empty() && !parent.is_dir() {
            return Err(ScaffoldError::CreateDir {
                path: parent.to_path_buf(),
                source: std::io::Error::new(
                    std::io::ErrorKind::NotFound,
                    "parent directory does not exist",
                ),
            });
        }
    }

    let occupied = match std::fs::read_dir(root) {
        Ok(mut entries) => entries.next().is_some(),
        Err(_) => root.exists(),
    };
    if occupied {
        return Err(ScaffoldError::PathConflict {
            root: root.to_path_buf(),
        });
    }

    cliclack::log::info(format!("Directory: {}", root.display())).or_cancel()?;
    Ok(())
}

fn select_features(stack: StackKind, args: &CreateArgs) -> Result<Vec<Feature>> {
    let mut features = Vec::new();

    if stack == StackKind::ReactApp {
        for (flag, feature, question) in [
            (
                args.tailwind,
                Feature::Tailwind,
                "Do you want to include Tailwind CSS?",
            ),
            (
                args.lint,
                Feature::Linting,
                "Do you want to include Linting (ESLint)?",
            ),
            (
                args.typescript,
                Feature::TypeScript,
                "Do you want to use TypeScript?",
            ),
        ] {
            if flag || (!args.yes && confirm(question)?) {
                features.push(feature);
            }
        }
    } else {
        for (flag, feature) in [
            (args.tailwind, Feature::Tailwind),
            (args.lint, Feature::Linting),
            (args.typescript, Feature::TypeScript),
        ] {
            if flag {
                // Rejected with a clear message when the request is built
                features.push(feature);
            }
        }
    }

    if let Some(framework) = select_test_framework(stack, args)? {
        features.push(Feature::TestFramework(framework));
    }

    Ok(features)
}

fn confirm(question: &str) -> Result<bool> {
    cliclack::confirm(question)
        .initial_value(false)
        .interact()
        .or_cancel()
}

fn select_test_framework(stack: StackKind, args: &CreateArgs) -> Result<Option<TestFramework>> {
    if args.no_tests {
        return Ok(None);
    }
    if let Some(framework) = args.test {
        return Ok(Some(framework));
    }
    if args.yes {
        return Ok(None);
    }

    let mut select = cliclack::select("Choose a testing framework");
    for framework in stack.test_frameworks() {
        select = select.item(Some(*framework), framework.display_name(), "");
    }
    select = select.item(None, "None", "");

    select.interact().or_cancel()
}

/// Warn about missing tools; the commands will report their own failures
fn preflight(tools: &[&str]) -> Result<()> {
    if tools.is_empty() {
        return Ok(());
    }

    let infos = check::check_tools(tools);
    let missing = check::missing(&infos);
    if missing.is_empty() {
        let found: Vec<String> = infos.iter().map(|i| i.describe()).collect();
        cliclack::log::success(format!("Detected tools: {}", found.join(", "))).or_cancel()?;
    } else {
        cliclack::log::warning(format!(
            "Not found on PATH: {}. Follow-up commands that need them will fail.",
            missing.join(", ")
        ))
        .or_cancel()?;
    }
    Ok(())
}

async fn clone_flow<C: ProductConfig>(config: &C, args: &CloneArgs) -> Result<RunSummary> {
    let url = select_repository(config, args)?;
    let dest = select_destination(args, &url)?;

    preflight(&["git"])?;

    clone::clone_repository(&url, &dest, args.timeout).await?;

    let mut summary = RunSummary::new();
    summary.done(format!("Cloned {} into {}", url, dest.display()));

    print_summary(&summary)?;
    print_next_steps(&config.clone_next_steps(&dest))?;

    Ok(summary)
}

fn select_repository<C: ProductConfig>(config: &C, args: &CloneArgs) -> Result<String> {
    if let Some(url) = &args.url {
        clone::validate_url(url)?;
        return Ok(url.clone());
    }

    let catalog = RepoCatalog::load(config, args.repos_file.as_deref())
        .map_err(ScaffoldError::Config)?;

    let entry: RepoEntry = if let Some(name) = &args.repo {
        catalog.find(name).cloned().ok_or_else(|| {
            ScaffoldError::Config(anyhow::anyhow!(
                "Repository '{}' not found. Available repositories: {}",
                name,
                catalog.names().join(", ")
            ))
        })?
    } else if args.yes {
        catalog.repositories[0].clone()
    } else {
        let mut select = cliclack::select("Select repository to clone");
        for (idx, entry) in catalog.repositories.iter().enumerate() {
            select = select.item(idx, &entry.name, &entry.url);
        }
        let idx: usize = select.interact().or_cancel()?;
        catalog.repositories[idx].clone()
    };

    cliclack::log::info(format!("Repository: {} ({})", entry.name, entry.url)).or_cancel()?;
    Ok(entry.url)
}

/// Folder name suggested for a repository: last URL segment without `.git`
fn default_folder(url: &str) -> String {
    let tail = url
        .trim_end_matches('/')
        .rsplit(['/', ':'])
        .next()
        .unwrap_or(url);
    let tail = tail.strip_suffix(".git").unwrap_or(tail);
    if tail.is_empty() {
        "repository".to_string()
    } else {
        tail.to_string()
    }
}

fn select_destination(args: &CloneArgs, url: &str) -> Result<PathBuf> {
    let current_dir = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
    let suggested = default_folder(url);

    let raw = match &args.dest {
        Some(dest) => dest.clone(),
        None if args.yes => PathBuf::from(&suggested),
        None => {
            let input: String = cliclack::input("Enter folder name")
                .placeholder(&suggested)
                .default_input(&suggested)
                .validate(|input: &String| {
                    if input.trim().is_empty() {
                        Err("folder name must not be empty")
                    } else {
                        Ok(())
                    }
                })
                .interact()
                .or_cancel()?;
            PathBuf::from(input.trim())
        }
    };

    Ok(if raw.is_absolute() {
        raw
    } else {
        current_dir.join(raw)
    })
}

fn print_summary(summary: &RunSummary) -> Result<()> {
    for step in summary.steps() {
        match &step.outcome {
            StepOutcome::Done => cliclack::log::success(step.to_string()),
            StepOutcome::Failed(_) => cliclack::log::error(step.to_string()),
            StepOutcome::Skipped(_) => cliclack::log::remark(step.to_string()),
        }
        .or_cancel()?;
    }
    Ok(())
}

fn print_next_steps(steps: &[String]) -> Result<()> {
    if steps.is_empty() {
        return Ok(());
    }

    println!();
    println!("  {}", console::style("Next steps").bold());
    println!();

    for (i, step) in steps.iter().enumerate() {
        println!("  {}  {}", console::style(format!("{}.", i + 1)).cyan(), step);
    }
    println!();

    Ok(())
}
