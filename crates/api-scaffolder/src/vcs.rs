//! Git repository initialization for the generated project

use crate::runtime::{CommandRunner, Invocation};
use anyhow::Result;
use std::path::Path;

/// Author recorded in the repository's local config
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GitIdentity {
    pub name: String,
    pub email: String,
}

impl GitIdentity {
    pub fn new(name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
        }
    }
}

/// init, identity, stage everything, commit
pub fn git_plan(identity: &GitIdentity, message: &str) -> Vec<Invocation> {
    vec![
        Invocation::new("git", ["init"]),
        Invocation::new("git", ["config", "user.email", identity.email.as_str()]),
        Invocation::new("git", ["config", "user.name", identity.name.as_str()]),
        Invocation::new("git", ["add", "."]),
        Invocation::new("git", ["commit", "-m", message]),
    ]
}

/// Create the repository and the initial commit. Stops at the first failing
/// command; callers decide whether that is fatal.
pub async fn initialize_repository<R: CommandRunner + ?Sized>(
    runner: &R,
    project_dir: &Path,
    identity: &GitIdentity,
    message: &str,
) -> Result<()> {
    for invocation in git_plan(identity, message) {
        runner.run(&invocation, project_dir).await?;
    }
    tracing::info!(dir = %project_dir.display(), "initialized git repository");
    Ok(())
}
