//! Product configuration trait for CLI binaries
//!
//! The binary implements this trait to give the library its identity:
//! names, where the template tree lives, the git identity used for the
//! initial commit, and the guidance printed after generation.

use crate::project::ProjectConfig;
use crate::runtime::PackageManager;
use crate::vcs::GitIdentity;
use std::path::{Path, PathBuf};

/// Configuration trait for scaffolding products
pub trait ProductConfig: Clone + Send + Sync + 'static {
    /// Internal product name (used for CLI command, commit message)
    fn name(&self) -> &'static str;

    /// Human-readable display name
    fn display_name(&self) -> &'static str;

    /// Environment variable overriding the template directory
    fn template_dir_env(&self) -> &'static str;

    /// Template directories tried in order when nothing is configured
    fn bundled_template_dirs(&self) -> Vec<PathBuf>;

    /// Upgrade/install command shown in version warnings
    fn upgrade_command(&self) -> &'static str;

    /// Identity used when no environment override is set
    fn default_git_identity(&self) -> GitIdentity;

    /// Environment variable overriding the commit author name
    fn git_name_env(&self) -> &'static str;

    /// Environment variable overriding the commit author email
    fn git_email_env(&self) -> &'static str;

    /// Generate the "next steps" instructions after project creation
    fn next_steps(
        &self,
        dir: &Path,
        config: &ProjectConfig,
        pm: PackageManager,
        install_skipped: bool,
    ) -> Vec<String>;

    /// Identity for the initial commit, with environment overrides applied
    fn git_identity(&self) -> GitIdentity {
        let default = self.default_git_identity();
        let from_env = |key: &str| std::env::var(key).ok().filter(|v| !v.trim().is_empty());
        GitIdentity {
            name: from_env(self.git_name_env()).unwrap_or(default.name),
            email: from_env(self.git_email_env()).unwrap_or(default.email),
        }
    }

    /// Message of the initial commit
    fn commit_message(&self) -> String {
        format!("Initial commit from {}", self.name())
    }
}
