//! Locating the template tree on disk

use crate::error::ScaffoldError;
use crate::product::ProductConfig;
use anyhow::Result;
use std::path::PathBuf;

/// Resolve the template directory.
///
/// Order: explicit path (e.g. `--template-dir`), the product's environment
/// variable, then the product's bundled locations. The first candidate that
/// is a directory wins; an explicit or env path must exist.
pub fn resolve_template_dir<C: ProductConfig>(
    config: &C,
    explicit: Option<PathBuf>,
) -> Result<PathBuf> {
    let from_env = std::env::var_os(config.template_dir_env())
        .filter(|v| !v.is_empty())
        .map(PathBuf::from);
    resolve_from(explicit.or(from_env), config.bundled_template_dirs())
}

fn resolve_from(chosen: Option<PathBuf>, bundled: Vec<PathBuf>) -> Result<PathBuf> {
    if let Some(path) = chosen {
        return if path.is_dir() {
            Ok(path)
        } else {
            Err(ScaffoldError::TemplateNotFound(path).into())
        };
    }

    let fallback = bundled.first().cloned().unwrap_or_default();
    bundled
        .into_iter()
        .find(|candidate| candidate.is_dir())
        .ok_or_else(|| ScaffoldError::TemplateNotFound(fallback).into())
}
