//! Template manifest (`template.yaml` at the template root)

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tokio::fs;

/// File name of the manifest; it is never copied into generated projects
pub const MANIFEST_FILE: &str = "template.yaml";

/// Template metadata
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TemplateManifest {
    /// Display name of the template
    pub name: String,

    /// Description of what the template provides
    pub description: String,

    /// Minimum CLI version (semver) this template was written for
    pub version: String,
}

impl TemplateManifest {
    /// Read `template.yaml` from a template directory
    pub async fn load(template_dir: &Path) -> Result<Self> {
        let manifest_path = template_dir.join(MANIFEST_FILE);
        let content = fs::read_to_string(&manifest_path)
            .await
            .with_context(|| format!("Failed to read {}", manifest_path.display()))?;
        Self::parse(&content)
            .with_context(|| format!("Failed to parse {}", manifest_path.display()))
    }

    pub fn parse(content: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(content)?)
    }
}
