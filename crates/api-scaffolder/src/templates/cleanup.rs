//! Best-effort removal of template files that don't belong in the output

use crate::project::ProjectConfig;
use anyhow::{Context, Result};
use std::io::ErrorKind;
use std::path::Path;
use tokio::fs;

/// Files dropped when Docker support is not wanted
pub const DOCKER_FILES: &[&str] = &["Dockerfile", "docker-compose.yml", ".dockerignore"];

/// Version-control metadata left over from the template source
pub const GIT_METADATA: &str = ".git";

/// Remove a file, directory tree or symlink. Absent paths are not an error.
/// Returns whether something was removed.
pub async fn remove_if_present(path: &Path) -> Result<bool> {
    let metadata = match fs::symlink_metadata(path).await {
        Ok(metadata) => metadata,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(false),
        Err(e) => {
            return Err(e).with_context(|| format!("Failed to inspect {}", path.display()))
        }
    };

    let removed = if metadata.is_dir() {
        fs::remove_dir_all(path).await
    } else {
        fs::remove_file(path).await
    };

    match removed {
        Ok(()) => {
            tracing::debug!(path = %path.display(), "removed");
            Ok(true)
        }
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
        Err(e) => Err(e).with_context(|| format!("Failed to remove {}", path.display())),
    }
}

/// Delete the Docker files unless the config asks for them
pub async fn remove_docker_files(target: &Path, config: &ProjectConfig) -> Result<()> {
    if config.include_docker {
        return Ok(());
    }
    for file in DOCKER_FILES {
        remove_if_present(&target.join(file)).await?;
    }
    Ok(())
}

/// Delete any `.git` directory (or gitlink file) copied from the template
pub async fn clean_git_files(target: &Path) -> Result<()> {
    remove_if_present(&target.join(GIT_METADATA)).await?;
    Ok(())
}
