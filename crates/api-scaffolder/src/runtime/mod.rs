//! Tool detection and external command execution
//!
//! This module provides:
//! - The [`CommandRunner`] seam and its process-backed implementation
//! - Package manager command shapes
//! - Advisory detection of Node.js, the package manager and git

pub mod check;
pub mod package_manager;
pub mod runner;

#[cfg(test)]
pub(crate) mod fake;

pub use check::{check_tools, missing_tools, ToolInfo};
pub use package_manager::PackageManager;
pub use runner::{CommandRunner, Invocation, ProcessRunner};
