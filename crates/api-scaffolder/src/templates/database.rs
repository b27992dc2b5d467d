//! Database-specific edits of the copied tree

use crate::profile::{DatabaseProfile, DATABASE_DIR, SOURCE_EXT};
use crate::project::ProjectConfig;
use crate::templates::cleanup::remove_if_present;
use anyhow::{Context, Result};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::fs;

/// Generated Prisma schema location, relative to the project root
pub const PRISMA_SCHEMA: &str = "prisma/schema.prisma";

/// Environment example rewritten with a local connection string
pub const ENV_EXAMPLE: &str = ".env.example";

const PRISMA_SCHEMA_TEMPLATE: &str = r#"// This is your Prisma schema file,
// learn more about it in the docs: https://pris.ly/d/prisma-schema

// Looking for ways to speed up your queries, or scale easily with your serverless or edge functions?
// Try Prisma Accelerate: https://pris.ly/cli/accelerate-init

generator client {
  provider = "prisma-client-js"
}

datasource db {
  provider = "postgresql"
  url      = env("DATABASE_URL")
}
"#;

/// Path of the barrel file that selects the active connection
pub fn barrel_file() -> PathBuf {
    Path::new(DATABASE_DIR).join(format!("index.{}", SOURCE_EXT))
}

/// Contents of the barrel file for a profile
pub fn barrel_contents(profile: &DatabaseProfile) -> String {
    format!("export * from \"./{}\";\n", profile.connection_module)
}

/// Apply the decision-table row for the configured database:
/// drop the other connection variants and ORM leftovers, point the barrel
/// file at the kept connection, and generate the Prisma schema when needed.
pub async fn configure_database(target: &Path, config: &ProjectConfig) -> Result<()> {
    let profile = config.database.profile();
    tracing::debug!(database = %config.database, "configuring database files");

    for file in profile.delete_files {
        remove_if_present(&target.join(file)).await?;
    }
    for dir in profile.delete_dirs {
        remove_if_present(&target.join(dir)).await?;
    }

    let barrel_path = target.join(barrel_file());
    write_file(&barrel_path, &barrel_contents(profile)).await?;

    if profile.prisma_schema {
        write_file(&target.join(PRISMA_SCHEMA), PRISMA_SCHEMA_TEMPLATE).await?;
    }

    update_env_example(
        target,
        &profile.database_url_for(config.project_name.as_str()),
    )
    .await
}

/// Point `DATABASE_URL` in `.env.example` at `url`. Missing file is skipped.
async fn update_env_example(target: &Path, url: &str) -> Result<()> {
    let path = target.join(ENV_EXAMPLE);
    let content = match fs::read_to_string(&path).await {
        Ok(content) => content,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(()),
        Err(e) => return Err(e).with_context(|| format!("Failed to read {}", path.display())),
    };

    fs::write(&path, set_env_value(&content, "DATABASE_URL", url))
        .await
        .with_context(|| format!("Failed to write {}", path.display()))
}

/// Replace every `KEY=` line, or append one if the key is absent
fn set_env_value(content: &str, key: &str, value: &str) -> String {
    let prefix = format!("{}=", key);
    let mut found = false;
    let mut lines: Vec<String> = content
        .lines()
        .map(|line| {
            if line.trim_start().starts_with(&prefix) {
                found = true;
                format!("{}{}", prefix, value)
            } else {
                line.to_string()
            }
        })
        .collect();

    if !found {
        lines.push(format!("{}{}", prefix, value));
    }

    let mut out = lines.join("\n");
    out.push('\n');
    out
}

async fn write_file(path: &Path, contents: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .await
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }
    fs::write(path, contents)
        .await
        .with_context(|| format!("Failed to write file: {}", path.display()))
}
