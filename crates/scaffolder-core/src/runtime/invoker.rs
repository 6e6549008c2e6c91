//! Follow-up command execution
//!
//! Runs external programs (npm, git, ...) one at a time, streaming their
//! output to the terminal while capturing it for the run summary.

use crate::error::ScaffoldError;
use colored::Colorize;
use std::fmt;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tokio::process::{Child, Command as TokioCommand};
use tokio::task::JoinHandle;
use tokio::time::timeout;

/// Default bound for a single follow-up command (npm installs can be slow)
pub const DEFAULT_COMMAND_TIMEOUT: Duration = Duration::from_secs(600);

/// How long to keep draining output after the child is gone
const DRAIN_GRACE: Duration = Duration::from_secs(2);

/// An external program to run after the files are written
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FollowUpCommand {
    pub program: String,
    pub args: Vec<String>,
    pub working_dir: PathBuf,
}

impl FollowUpCommand {
    pub fn new(program: &str, args: &[&str], working_dir: &Path) -> Self {
        Self {
            program: program.to_string(),
            args: args.iter().map(|a| a.to_string()).collect(),
            working_dir: working_dir.to_path_buf(),
        }
    }
}

impl fmt::Display for FollowUpCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program)?;
        for arg in &self.args {
            write!(f, " {}", arg)?;
        }
        Ok(())
    }
}

/// What happened to a command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandStatus {
    Exited(i32),
    /// Killed by a signal
    Terminated,
    TimedOut,
    /// The process could not be spawned (missing binary, bad working dir)
    NotStarted(String),
    /// Not run because an earlier command failed under [`FailurePolicy::Abort`]
    Skipped,
}

impl fmt::Display for CommandStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CommandStatus::Exited(code) => write!(f, "exit code {}", code),
            CommandStatus::Terminated => f.write_str("terminated by a signal"),
            CommandStatus::TimedOut => f.write_str("timed out"),
            CommandStatus::NotStarted(reason) => write!(f, "could not start: {}", reason),
            CommandStatus::Skipped => f.write_str("skipped after an earlier failure"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct CommandResult {
    pub command: FollowUpCommand,
    pub status: CommandStatus,
    pub stdout: String,
    pub stderr: String,
}

impl CommandResult {
    pub fn exit_code(&self) -> Option<i32> {
        match self.status {
            CommandStatus::Exited(code) => Some(code),
            _ => None,
        }
    }

    pub fn success(&self) -> bool {
        self.status == CommandStatus::Exited(0)
    }

    /// Turn a failed result into an error, for callers that treat it as fatal
    pub fn check(self) -> Result<Self, ScaffoldError> {
        if self.success() {
            Ok(self)
        } else {
            Err(ScaffoldError::ExternalCommandFailed {
                command: self.command.to_string(),
                status: self.status.to_string(),
            })
        }
    }

    fn skipped(command: &FollowUpCommand) -> Self {
        Self {
            command: command.clone(),
            status: CommandStatus::Skipped,
            stdout: String::new(),
            stderr: String::new(),
        }
    }
}

/// What to do with the remaining steps once one of them fails
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FailurePolicy {
    #[default]
    Continue,
    Abort,
}

/// Runs follow-up commands sequentially
#[derive(Debug, Clone)]
pub struct Invoker {
    timeout: Option<Duration>,
    policy: FailurePolicy,
    echo: bool,
}

impl Default for Invoker {
    fn default() -> Self {
        Self {
            timeout: Some(DEFAULT_COMMAND_TIMEOUT),
            policy: FailurePolicy::Continue,
            echo: true,
        }
    }
}

impl Invoker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bound each command; `None` waits forever
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_policy(mut self, policy: FailurePolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Whether to print the command line and its output while it runs
    pub fn with_echo(mut self, echo: bool) -> Self {
        self.echo = echo;
        self
    }

    /// Run `commands` in order, returning one result per command
    pub async fn run(&self, commands: &[FollowUpCommand]) -> Vec<CommandResult> {
        let mut results = Vec::with_capacity(commands.len());
        let mut aborted = false;

        for command in commands {
            if aborted {
                results.push(CommandResult::skipped(command));
                continue;
            }

            let result = self.run_one(command).await;
            if !result.success() && self.policy == FailurePolicy::Abort {
                aborted = true;
            }
            results.push(result);
        }

        results
    }

    async fn run_one(&self, command: &FollowUpCommand) -> CommandResult {
        if self.echo {
            println!();
            println!("{} {}", "Running:".dimmed(), command.to_string().yellow());
        }

        let mut cmd = TokioCommand::new(&command.program);
        cmd.args(&command.args)
            .current_dir(&command.working_dir)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);
        // Own process group, so a timeout can take down npm's lifecycle scripts too
        #[cfg(unix)]
        cmd.process_group(0);

        let spawned = cmd.spawn();

        let mut child = match spawned {
            Ok(child) => child,
            Err(e) => {
                if self.echo {
                    eprintln!("{} {}", "Failed to start:".red(), e);
                }
                return CommandResult {
                    command: command.clone(),
                    status: CommandStatus::NotStarted(e.to_string()),
                    stdout: String::new(),
                    stderr: String::new(),
                };
            }
        };

        let stdout_task = child
            .stdout
            .take()
            .map(|out| tokio::spawn(pump(out, self.echo, false)));
        let stderr_task = child
            .stderr
            .take()
            .map(|err| tokio::spawn(pump(err, self.echo, true)));

        let waited = match self.timeout {
            Some(limit) => timeout(limit, child.wait()).await,
            None => Ok(child.wait().await),
        };

        let status = match waited {
            Ok(Ok(exit)) => match exit.code() {
                Some(code) => CommandStatus::Exited(code),
                None => CommandStatus::Terminated,
            },
            Ok(Err(e)) => CommandStatus::NotStarted(format!("failed to wait: {}", e)),
            Err(_) => {
                kill_tree(&mut child).await;
                if self.echo {
                    eprintln!(
                        "{} {}",
                        "Timed out:".red(),
                        format!(
                            "{} did not finish within {} seconds",
                            command,
                            self.timeout.map(|t| t.as_secs()).unwrap_or_default()
                        )
                    );
                }
                CommandStatus::TimedOut
            }
        };

        CommandResult {
            command: command.clone(),
            status,
            stdout: drain(stdout_task).await,
            stderr: drain(stderr_task).await,
        }
    }
}

/// Kill `child` and everything it started in its process group
async fn kill_tree(child: &mut Child) {
    #[cfg(unix)]
    if let Some(pid) = child.id().and_then(|id| libc::pid_t::try_from(id).ok()) {
        // SAFETY: killpg takes no pointers; the group id is the child's pid because it
        // was spawned with `process_group(0)` and has not been reaped yet.
        unsafe {
            libc::killpg(pid, libc::SIGKILL);
        }
    }
    let _ = child.kill().await;
}

/// Read `reader` line by line, echoing each line and returning everything read
async fn pump<R>(reader: R, echo: bool, is_stderr: bool) -> String
where
    R: AsyncRead + Unpin + Send + 'static,
{
    let mut lines = BufReader::new(reader).lines();
    let mut captured = String::new();

    loop {
        match lines.next_line().await {
            Ok(Some(line)) => {
                if echo {
                    if is_stderr {
                        eprintln!("  {}", line.yellow());
                    } else {
                        println!("  {}", line);
                    }
                }
                captured.push_str(&line);
                captured.push('\n');
            }
            Ok(None) => break,
            Err(e) => {
                if echo {
                    eprintln!("{} {}", "Error reading output:".red(), e);
                }
                break;
            }
        }
    }

    captured
}

/// Collect a pump's output; grandchildren that keep the pipe open are not waited for
async fn drain(task: Option<JoinHandle<String>>) -> String {
    let Some(mut task) = task else {
        return String::new();
    };
    match timeout(DRAIN_GRACE, &mut task).await {
        Ok(Ok(output)) => output,
        Ok(Err(_)) => String::new(),
        Err(_) => {
            task.abort();
            String::new()
        }
    }
}
