//! Template materialization
//!
//! This module provides:
//! - Locating the template tree and reading its manifest
//! - Copying the tree with build artifacts excluded
//! - Database-specific file selection, package.json rewriting and cleanup
//! - Version compatibility checking

pub mod cleanup;
pub mod copier;
pub mod database;
pub mod manifest;
pub mod package_json;
pub mod source;
pub mod version;

use crate::project::ProjectConfig;
use anyhow::Result;
use std::path::Path;

pub use cleanup::{clean_git_files, remove_docker_files, remove_if_present};
pub use copier::copy_template;
pub use database::configure_database;
pub use manifest::TemplateManifest;
pub use package_json::update_package_json;
pub use source::resolve_template_dir;
pub use version::check_compatibility;

/// Turn the template tree at `source` into a concrete project at `target`.
/// Returns the number of files copied from the template.
pub async fn materialize(source: &Path, target: &Path, config: &ProjectConfig) -> Result<usize> {
    let copied = copy_template(source, target).await?;
    configure_database(target, config).await?;
    update_package_json(target, config).await?;
    remove_docker_files(target, config).await?;
    clean_git_files(target).await?;
    Ok(copied.len())
}
