//! package.json rewriting

use crate::error::ScaffoldError;
use crate::project::ProjectConfig;
use anyhow::{Context, Result};
use serde_json::{Map, Value};
use std::path::Path;
use tokio::fs;

pub const PACKAGE_JSON: &str = "package.json";

/// Version written into every generated project
pub const INITIAL_VERSION: &str = "0.1.0";

/// Set `name` and `version`, and add the database's scripts to `scripts`.
/// Key order of the template manifest is preserved.
pub async fn update_package_json(target: &Path, config: &ProjectConfig) -> Result<()> {
    let path = target.join(PACKAGE_JSON);
    let content = fs::read_to_string(&path)
        .await
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let mut manifest: Value = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse {}", path.display()))?;

    apply_config(&mut manifest, config)
        .ok_or_else(|| ScaffoldError::InvalidPackageJson(path.clone()))?;

    let mut rendered =
        serde_json::to_string_pretty(&manifest).context("Failed to serialize package.json")?;
    rendered.push('\n');
    fs::write(&path, rendered)
        .await
        .with_context(|| format!("Failed to write {}", path.display()))
}

/// Returns `None` when the manifest (or its `scripts`) isn't an object
fn apply_config(manifest: &mut Value, config: &ProjectConfig) -> Option<()> {
    let root = manifest.as_object_mut()?;
    root.insert(
        "name".to_string(),
        Value::String(config.project_name.to_string()),
    );
    root.insert(
        "version".to_string(),
        Value::String(INITIAL_VERSION.to_string()),
    );

    let scripts = root
        .entry("scripts")
        .or_insert_with(|| Value::Object(Map::new()))
        .as_object_mut()?;
    for (name, command) in config.database.profile().scripts {
        scripts.insert(name.to_string(), Value::String(command.to_string()));
    }
    Some(())
}
