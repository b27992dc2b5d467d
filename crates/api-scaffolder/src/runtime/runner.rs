//! External command execution
//!
//! Everything that shells out (package manager, git, schema generators) goes
//! through [`CommandRunner`], so the orchestration can be driven by a fake in
//! tests. [`ProcessRunner`] is the real implementation on top of tokio.

use crate::error::ScaffoldError;
use anyhow::Result;
use async_trait::async_trait;
use colored::Colorize;
use std::fmt;
use std::path::Path;
use std::process::Stdio;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::process::Command as TokioCommand;

/// How many trailing stderr lines are kept for error messages
const STDERR_TAIL_LINES: usize = 20;

/// A program and its arguments
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub program: String,
    pub args: Vec<String>,
}

impl Invocation {
    pub fn new<I, S>(program: impl Into<String>, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            program: program.into(),
            args: args.into_iter().map(Into::into).collect(),
        }
    }
}

impl fmt::Display for Invocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program)?;
        for arg in &self.args {
            if arg.is_empty() || arg.contains(char::is_whitespace) {
                write!(f, " \"{}\"", arg)?;
            } else {
                write!(f, " {}", arg)?;
            }
        }
        Ok(())
    }
}

/// Runs an invocation to completion in a working directory
#[async_trait]
pub trait CommandRunner: Send + Sync {
    /// Fails with [`ScaffoldError::Spawn`] or [`ScaffoldError::CommandFailed`]
    async fn run(&self, invocation: &Invocation, cwd: &Path) -> Result<()>;
}

/// Spawns real processes, one at a time, with no timeout
#[derive(Debug, Clone, Default)]
pub struct ProcessRunner {
    stream_output: bool,
}

impl ProcessRunner {
    /// Capture output and only surface stderr when the command fails
    pub fn quiet() -> Self {
        Self {
            stream_output: false,
        }
    }

    /// Print the command and its output as it runs
    pub fn streaming() -> Self {
        Self {
            stream_output: true,
        }
    }

    fn command(invocation: &Invocation, cwd: &Path) -> TokioCommand {
        let mut command = TokioCommand::new(&invocation.program);
        command
            .args(&invocation.args)
            .current_dir(cwd)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());
        command
    }

    fn spawn_error(invocation: &Invocation, source: std::io::Error) -> anyhow::Error {
        ScaffoldError::Spawn {
            program: invocation.program.clone(),
            source,
        }
        .into()
    }

    async fn run_quiet(&self, invocation: &Invocation, cwd: &Path) -> Result<()> {
        let output = Self::command(invocation, cwd)
            .output()
            .await
            .map_err(|e| Self::spawn_error(invocation, e))?;

        if output.status.success() {
            return Ok(());
        }

        let stderr = String::from_utf8_lossy(&output.stderr);
        Err(ScaffoldError::CommandFailed {
            command: invocation.to_string(),
            code: output.status.code(),
            stderr: tail(&stderr, STDERR_TAIL_LINES),
        }
        .into())
    }

    async fn run_streaming(&self, invocation: &Invocation, cwd: &Path) -> Result<()> {
        println!("{} {}", "Running:".dimmed(), invocation.to_string().yellow());

        let mut child = Self::command(invocation, cwd)
            .spawn()
            .map_err(|e| Self::spawn_error(invocation, e))?;

        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| anyhow::anyhow!("Failed to capture stdout of {}", invocation))?;
        let stderr = child
            .stderr
            .take()
            .ok_or_else(|| anyhow::anyhow!("Failed to capture stderr of {}", invocation))?;

        let mut stdout_reader = BufReader::new(stdout).lines();
        let mut stderr_reader = BufReader::new(stderr).lines();
        let mut stderr_lines: Vec<String> = Vec::new();
        let mut stdout_open = true;
        let mut stderr_open = true;

        while stdout_open || stderr_open {
            tokio::select! {
                line = stdout_reader.next_line(), if stdout_open => {
                    match line {
                        Ok(Some(line)) => println!("  {}", line),
                        Ok(None) => stdout_open = false,
                        Err(e) => {
                            eprintln!("{} {}", "Error reading stdout:".red(), e);
                            stdout_open = false;
                        }
                    }
                }
                line = stderr_reader.next_line(), if stderr_open => {
                    match line {
                        Ok(Some(line)) => {
                            eprintln!("  {}", line.yellow());
                            stderr_lines.push(line);
                        }
                        Ok(None) => stderr_open = false,
                        Err(e) => {
                            eprintln!("{} {}", "Error reading stderr:".red(), e);
                            stderr_open = false;
                        }
                    }
                }
            }
        }

        let status = child
            .wait()
            .await
            .map_err(|e| anyhow::anyhow!("Failed to wait for {}: {}", invocation, e))?;

        if status.success() {
            Ok(())
        } else {
            Err(ScaffoldError::CommandFailed {
                command: invocation.to_string(),
                code: status.code(),
                stderr: tail(&stderr_lines.join("\n"), STDERR_TAIL_LINES),
            }
            .into())
        }
    }
}

#[async_trait]
impl CommandRunner for ProcessRunner {
    async fn run(&self, invocation: &Invocation, cwd: &Path) -> Result<()> {
        tracing::debug!(command = %invocation, cwd = %cwd.display(), "running command");
        if self.stream_output {
            self.run_streaming(invocation, cwd).await
        } else {
            self.run_quiet(invocation, cwd).await
        }
    }
}

/// Keep the last `max_lines` lines of `text`
fn tail(text: &str, max_lines: usize) -> String {
    let lines: Vec<&str> = text.lines().collect();
    let start = lines.len().saturating_sub(max_lines);
    lines[start..].join("\n")
}
