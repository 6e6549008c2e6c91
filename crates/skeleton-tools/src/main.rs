//! Skeleton Tools - React, Flask and FastAPI project skeletons

use anyhow::{Context, Result};
use clap::{Args as ClapArgs, Parser, Subcommand};
use scaffolder_core::config::{RepoCatalog, RepoEntry};
use scaffolder_core::exit_codes;
use scaffolder_core::runtime::DEFAULT_COMMAND_TIMEOUT;
use scaffolder_core::tui::{Action, CloneArgs, CreateArgs};
use scaffolder_core::{ProductConfig, ScaffoldRequest, StackKind, TestFramework};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::Duration;

/// Environment variable overriding the follow-up command timeout (seconds, 0 = none)
const TIMEOUT_ENV: &str = "SKELETON_COMMAND_TIMEOUT";

/// Skeleton Tools product configuration
#[derive(Clone)]
pub struct SkeletonConfig;

impl ProductConfig for SkeletonConfig {
    fn name(&self) -> &'static str {
        "skeleton-tools"
    }

    fn display_name(&self) -> &'static str {
        "Skeleton Tools"
    }

    fn cli_description(&self) -> &'static str {
        "Create React, Flask and FastAPI project skeletons and clone starter repositories"
    }

    fn repositories_env(&self) -> &'static str {
        "SKELETON_REPOS_FILE"
    }

    fn default_repositories(&self) -> RepoCatalog {
        RepoCatalog {
            repositories: vec![
                RepoEntry::new("Ollama", "https://github.com/ollama/ollama.git"),
                RepoEntry::new("Go", "https://github.com/golang/go.git"),
            ],
        }
    }

    fn next_steps(&self, dir: &Path, request: &ScaffoldRequest) -> Vec<String> {
        let mut steps = Vec::new();
        let current = std::env::current_dir().ok();

        if current.as_deref() != Some(dir) {
            steps.push(format!("cd {}", dir.display()));
        }

        match request.stack() {
            StackKind::ReactApp => {
                steps.push("npm start".to_string());
                if request.test_framework().is_some() {
                    steps.push("npm test".to_string());
                }
            }
            StackKind::FlaskApp | StackKind::FastApiApp => {
                steps.push(
                    "Set up Python environment:\n\
                          python3 -m venv .venv && .venv/bin/pip install -r requirements.txt"
                        .to_string(),
                );
                if request.stack() == StackKind::FlaskApp {
                    steps.push(".venv/bin/python -m app.main".to_string());
                } else {
                    steps.push(".venv/bin/uvicorn app.main:app --reload".to_string());
                }
                match request.test_framework() {
                    Some(TestFramework::Pytest) => steps.push(".venv/bin/pytest".to_string()),
                    Some(TestFramework::Unittest) => {
                        steps.push(".venv/bin/python -m unittest discover tests".to_string())
                    }
                    _ => {}
                }
            }
        }

        steps
    }
}

#[derive(Parser, Debug)]
#[command(name = "skeleton-tools")]
#[command(about = "Create React, Flask and FastAPI project skeletons and clone starter repositories")]
#[command(version)]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Create a React app skeleton
    CreateReactSkeleton(ReactArgs),
    /// Create a Flask app skeleton
    CreateFlaskSkeleton(CliCreateArgs),
    /// Create a FastAPI app skeleton
    CreateFastapiSkeleton(CliCreateArgs),
    /// Clone a repository from the catalog or a URL
    CloneRepo(CliCloneArgs),
}

#[derive(ClapArgs, Debug)]
pub struct CliCreateArgs {
    /// Project name (also the directory name)
    #[arg(short, long)]
    pub name: Option<String>,

    /// Parent directory to create the project in
    #[arg(short, long)]
    pub directory: Option<PathBuf>,

    /// Test framework to set up
    #[arg(short, long, value_enum)]
    pub test: Option<TestFramework>,

    /// Don't set up a test framework
    #[arg(long = "no-tests", conflicts_with = "test")]
    pub no_tests: bool,

    /// Write the files only, skip dependency installation
    #[arg(long = "skip-install")]
    pub skip_install: bool,

    /// Stop at the first failed write or command
    #[arg(long = "fail-fast")]
    pub fail_fast: bool,

    /// Timeout for each follow-up command in seconds (0 = no timeout)
    #[arg(long, value_name = "SECS")]
    pub timeout: Option<u64>,

    /// Auto-confirm all prompts (non-interactive mode)
    #[arg(short, long)]
    pub yes: bool,
}

#[derive(ClapArgs, Debug)]
pub struct ReactArgs {
    #[command(flatten)]
    pub common: CliCreateArgs,

    /// Include Tailwind CSS
    #[arg(long)]
    pub tailwind: bool,

    /// Include ESLint
    #[arg(long)]
    pub lint: bool,

    /// Use TypeScript
    #[arg(long)]
    pub typescript: bool,
}

#[derive(ClapArgs, Debug)]
pub struct CliCloneArgs {
    /// Repository name from the catalog
    #[arg(short, long, conflicts_with = "url")]
    pub repo: Option<String>,

    /// Clone this URL instead of a catalog entry
    #[arg(long)]
    pub url: Option<String>,

    /// Destination folder
    #[arg(short, long)]
    pub dest: Option<PathBuf>,

    /// YAML file listing repositories
    #[arg(long = "repos")]
    pub repos_file: Option<PathBuf>,

    /// Timeout for the clone in seconds (0 = no timeout)
    #[arg(long, value_name = "SECS")]
    pub timeout: Option<u64>,

    /// Auto-confirm all prompts (non-interactive mode)
    #[arg(short, long)]
    pub yes: bool,
}

impl From<CliCreateArgs> for CreateArgs {
    fn from(args: CliCreateArgs) -> Self {
        CreateArgs {
            name: args.name,
            directory: args.directory,
            test: args.test,
            no_tests: args.no_tests,
            skip_install: args.skip_install,
            fail_fast: args.fail_fast,
            yes: args.yes,
            ..CreateArgs::default()
        }
    }
}

impl From<ReactArgs> for CreateArgs {
    fn from(args: ReactArgs) -> Self {
        CreateArgs {
            tailwind: args.tailwind,
            lint: args.lint,
            typescript: args.typescript,
            ..args.common.into()
        }
    }
}

impl From<CliCloneArgs> for CloneArgs {
    fn from(args: CliCloneArgs) -> Self {
        CloneArgs {
            repo: args.repo,
            url: args.url,
            dest: args.dest,
            repos_file: args.repos_file,
            yes: args.yes,
            ..CloneArgs::default()
        }
    }
}

/// Resolve the command timeout: flag, then environment, then the default
fn resolve_timeout(flag: Option<u64>, env: Option<&str>) -> Result<Option<Duration>> {
    let secs = match (flag, env) {
        (Some(secs), _) => secs,
        (None, Some(raw)) => raw
            .trim()
            .parse::<u64>()
            .with_context(|| format!("{} must be a number of seconds, got '{}'", TIMEOUT_ENV, raw))?,
        (None, None) => return Ok(Some(DEFAULT_COMMAND_TIMEOUT)),
    };

    Ok((secs > 0).then(|| Duration::from_secs(secs)))
}

fn timeout_from(flag: Option<u64>) -> Result<Option<Duration>> {
    resolve_timeout(flag, std::env::var(TIMEOUT_ENV).ok().as_deref())
}

async fn create(config: &SkeletonConfig, stack: StackKind, args: CreateArgs) -> i32 {
    match scaffolder_core::run_create(config, stack, args).await {
        Ok(summary) => summary.exit_code(),
        Err(err) => err.exit_code(),
    }
}

async fn run(config: &SkeletonConfig, command: Option<Command>) -> Result<i32> {
    let code = match command {
        Some(Command::CreateReactSkeleton(cli)) => {
            let timeout = timeout_from(cli.common.timeout)?;
            let args = CreateArgs {
                timeout,
                ..cli.into()
            };
            create(config, StackKind::ReactApp, args).await
        }
        Some(Command::CreateFlaskSkeleton(cli)) => {
            let timeout = timeout_from(cli.timeout)?;
            let args = CreateArgs {
                timeout,
                ..cli.into()
            };
            create(config, StackKind::FlaskApp, args).await
        }
        Some(Command::CreateFastapiSkeleton(cli)) => {
            let timeout = timeout_from(cli.timeout)?;
            let args = CreateArgs {
                timeout,
                ..cli.into()
            };
            create(config, StackKind::FastApiApp, args).await
        }
        Some(Command::CloneRepo(cli)) => {
            let timeout = timeout_from(cli.timeout)?;
            let args = CloneArgs {
                timeout,
                ..cli.into()
            };
            match scaffolder_core::run_clone(config, args).await {
                Ok(summary) => summary.exit_code(),
                Err(err) => err.exit_code(),
            }
        }
        None => {
            // No subcommand provided, pick one interactively
            let timeout = timeout_from(None)?;
            match scaffolder_core::tui::select_action() {
                Ok(Action::Create(stack)) => {
                    let args = CreateArgs {
                        timeout,
                        ..CreateArgs::default()
                    };
                    create(config, stack, args).await
                }
                Ok(Action::Clone) => {
                    let args = CloneArgs {
                        timeout,
                        ..CloneArgs::default()
                    };
                    match scaffolder_core::run_clone(config, args).await {
                        Ok(summary) => summary.exit_code(),
                        Err(err) => err.exit_code(),
                    }
                }
                Err(err) => err.exit_code(),
            }
        }
    };

    Ok(code)
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    // Ensure terminal cursor is restored on panic
    let default_panic = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let _ = console::Term::stderr().show_cursor();
        default_panic(info);
    }));

    // Handle Ctrl+C gracefully
    ctrlc::set_handler(move || {
        let _ = console::Term::stderr().show_cursor();
        std::process::exit(exit_codes::CANCELLED);
    })
    .ok();

    let args = Args::parse();
    let config = SkeletonConfig;

    let code = match run(&config, args.command).await {
        Ok(code) => code,
        Err(err) => {
            eprintln!("{} {:#}", console::style("error:").red().bold(), err);
            exit_codes::FAILURE
        }
    };

    // Ensure cursor is visible on normal exit
    let _ = console::Term::stderr().show_cursor();

    ExitCode::from(u8::try_from(code).unwrap_or(1))
}
