//! API Scaffolder - library behind `create-node-api`
//!
//! Generates a Node/TypeScript API project from a local template tree. The
//! user picks a project name, a database (MongoDB, or PostgreSQL with Prisma
//! or Drizzle) and whether to keep Docker files; the library copies the
//! template, selects the matching database files, installs dependencies and
//! makes the initial git commit.
//!
//! # Architecture
//!
//! - **Core types** - [`ProjectConfig`] and the per-database decision table
//!   ([`Database::profile`])
//! - **Operations** - template materialization, dependency installation and
//!   git initialization; every subprocess goes through [`CommandRunner`]
//! - **Orchestration** - [`Generator`] sequences the operations and reports
//!   [`Stage`] progress
//! - **CLI/TUI Interface** - optional cliclack prompts (feature-gated)
//!
//! # Feature Flags
//!
//! - `tui` (default): Enables the cliclack-based prompts module
//!
//! # Example Usage (without TUI)
//!
//! ```ignore
//! use api_scaffolder::{Generator, GenerateOptions, NoProgress, ProcessRunner, ProjectConfig};
//!
//! let config = ProjectConfig::from_parts("demo", DatabaseKind::MongoDb, None, false)?;
//! let runner = ProcessRunner::quiet();
//! let outcome = Generator::new(&runner, options).generate(&config, &mut NoProgress).await?;
//! ```

pub mod error;
pub mod generator;
pub mod install;
pub mod product;
pub mod profile;
pub mod project;
pub mod runtime;
pub mod templates;
pub mod vcs;

#[cfg(feature = "tui")]
pub mod tui;

// Re-export main types for convenience
pub use error::ScaffoldError;
pub use generator::{
    GenerateOptions, GenerationOutcome, Generator, NoProgress, Progress, Stage, VcsOutcome,
};
pub use product::ProductConfig;
pub use profile::DatabaseProfile;
pub use project::{Database, DatabaseKind, Orm, ProjectConfig, ProjectName};
pub use runtime::{CommandRunner, Invocation, PackageManager, ProcessRunner};
pub use vcs::GitIdentity;

#[cfg(feature = "tui")]
pub use tui::run;
