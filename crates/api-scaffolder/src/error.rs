//! Typed failures callers branch on
//!
//! Most functions return `anyhow::Result`; the variants here are the ones the
//! binary and tests recover with `downcast_ref`.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ScaffoldError {
    #[error("Invalid project name '{0}': use only lowercase letters, digits, '-' and '_'")]
    InvalidProjectName(String),

    #[error("An ORM can only be chosen for PostgreSQL projects")]
    OrmNotSupported,

    #[error("PostgreSQL projects need an ORM (prisma or drizzle)")]
    OrmRequired,

    #[error("Directory already exists: {}", .0.display())]
    TargetExists(PathBuf),

    #[error("Template directory not found: {}", .0.display())]
    TemplateNotFound(PathBuf),

    #[error("Failed to start '{program}'")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Command failed ({}): {command}{}", code_label(.code), stderr_suffix(.stderr))]
    CommandFailed {
        command: String,
        code: Option<i32>,
        stderr: String,
    },

    #[error("package.json at {} is not a JSON object", .0.display())]
    InvalidPackageJson(PathBuf),
}

fn code_label(code: &Option<i32>) -> String {
    match code {
        Some(code) => format!("exit code {}", code),
        None => "terminated by signal".to_string(),
    }
}

fn stderr_suffix(stderr: &str) -> String {
    let trimmed = stderr.trim();
    if trimmed.is_empty() {
        String::new()
    } else {
        format!("\n{}", trimmed)
    }
}
