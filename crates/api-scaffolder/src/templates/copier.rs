//! Template tree copying with build-artifact exclusion

use crate::error::ScaffoldError;
use crate::templates::manifest::MANIFEST_FILE;
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tokio::fs;
use walkdir::{DirEntry, WalkDir};

/// Entry names never copied, at any depth
const EXCLUDED_NAMES: &[&str] = &["node_modules", "dist"];

/// Copy the template tree at `source` into `target`.
///
/// Skips `node_modules` and `dist` anywhere in the tree, and the template's
/// own manifest at the root. Returns the copied files relative to `target`.
pub async fn copy_template(source: &Path, target: &Path) -> Result<Vec<PathBuf>> {
    if !source.is_dir() {
        return Err(ScaffoldError::TemplateNotFound(source.to_path_buf()).into());
    }

    fs::create_dir_all(target)
        .await
        .context("Failed to create target directory")?;

    let mut copied_files = Vec::new();

    let walker = WalkDir::new(source)
        .min_depth(1)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(should_include_entry);

    for entry in walker {
        let entry = entry.with_context(|| format!("Failed to read {}", source.display()))?;
        let relative = entry
            .path()
            .strip_prefix(source)
            .with_context(|| format!("Unexpected path {}", entry.path().display()))?
            .to_path_buf();
        let target_path = target.join(&relative);
        let file_type = entry.file_type();

        if file_type.is_dir() {
            fs::create_dir_all(&target_path)
                .await
                .with_context(|| format!("Failed to create directory: {}", target_path.display()))?;
        } else if file_type.is_file() || entry.path().is_file() {
            // Ensure parent directories exist
            if let Some(parent) = target_path.parent() {
                fs::create_dir_all(parent)
                    .await
                    .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
            }

            fs::copy(entry.path(), &target_path)
                .await
                .with_context(|| format!("Failed to write file: {}", target_path.display()))?;

            copied_files.push(relative);
        } else {
            tracing::warn!(path = %entry.path().display(), "skipping non-file template entry");
        }
    }

    tracing::debug!(
        files = copied_files.len(),
        target = %target.display(),
        "copied template"
    );
    Ok(copied_files)
}

/// Determine if a walked entry (and, for directories, its contents) is copied
fn should_include_entry(entry: &DirEntry) -> bool {
    let name = entry.file_name().to_string_lossy();

    if EXCLUDED_NAMES.iter().any(|excluded| name == *excluded) {
        return false;
    }

    !(entry.depth() == 1 && name == MANIFEST_FILE)
}
