//! Recording command runner for tests.

use crate::error::ScaffoldError;
use crate::runtime::runner::{CommandRunner, Invocation};
use anyhow::Result;
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// Records every invocation instead of spawning it.
///
/// Invocations whose program matches `fail_program` fail with
/// [`ScaffoldError::CommandFailed`] (after being recorded).
#[derive(Default)]
pub struct RecordingRunner {
    calls: Mutex<Vec<(Invocation, PathBuf)>>,
    fail_program: Option<String>,
}

impl RecordingRunner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing_on(program: impl Into<String>) -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            fail_program: Some(program.into()),
        }
    }

    pub fn calls(&self) -> Vec<(Invocation, PathBuf)> {
        self.calls.lock().unwrap().clone()
    }

    /// Recorded commands rendered as `program arg arg`
    pub fn commands(&self) -> Vec<String> {
        self.calls()
            .iter()
            .map(|(invocation, _)| invocation.to_string())
            .collect()
    }

    pub fn programs(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .map(|(invocation, _)| invocation.program)
            .collect()
    }
}

#[async_trait]
impl CommandRunner for RecordingRunner {
    async fn run(&self, invocation: &Invocation, cwd: &Path) -> Result<()> {
        self.calls
            .lock()
            .unwrap()
            .push((invocation.clone(), cwd.to_path_buf()));

        if self.fail_program.as_deref() == Some(invocation.program.as_str()) {
            return Err(ScaffoldError::CommandFailed {
                command: invocation.to_string(),
                code: Some(1),
                stderr: "simulated failure".to_string(),
            }
            .into());
        }
        Ok(())
    }
}
