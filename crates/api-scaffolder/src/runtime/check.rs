//! Detection of the tools a generated project needs (Node.js, package manager, git)

use crate::runtime::package_manager::PackageManager;
use std::process::Command;

/// Tool detection result
#[derive(Debug, Clone)]
pub struct ToolInfo {
    pub name: &'static str,
    pub version: Option<String>,
    pub available: bool,
    /// Where to get the tool if it is missing
    pub install_hint: &'static str,
}

/// Probe `program --version`
fn check_tool(name: &'static str, program: &str, install_hint: &'static str) -> ToolInfo {
    let output = Command::new(program).arg("--version").output();

    match output {
        Ok(out) if out.status.success() => {
            let version = String::from_utf8_lossy(&out.stdout).trim().to_string();
            ToolInfo {
                name,
                version: Some(version),
                available: true,
                install_hint,
            }
        }
        _ => ToolInfo {
            name,
            version: None,
            available: false,
            install_hint,
        },
    }
}

/// Check if Node.js is available
pub fn check_node() -> ToolInfo {
    check_tool("Node.js", "node", "https://nodejs.org")
}

/// Check if the chosen package manager is available
pub fn check_package_manager(pm: PackageManager) -> ToolInfo {
    let (name, hint) = match pm {
        PackageManager::Npm => ("npm", "https://docs.npmjs.com"),
        PackageManager::Pnpm => ("pnpm", "https://pnpm.io/installation"),
        PackageManager::Yarn => ("yarn", "https://yarnpkg.com/getting-started/install"),
        PackageManager::Bun => ("bun", "https://bun.sh"),
    };
    check_tool(name, &pm.program(), hint)
}

/// Check if git is available
pub fn check_git() -> ToolInfo {
    check_tool("git", "git", "https://git-scm.com/downloads")
}

/// Probe the tools a generation run shells out to. Never fails; missing
/// tools are reported through `available`.
pub fn check_tools(pm: PackageManager, needs_install: bool, needs_git: bool) -> Vec<ToolInfo> {
    let mut results = Vec::new();
    if needs_install {
        results.push(check_node());
        results.push(check_package_manager(pm));
    }
    if needs_git {
        results.push(check_git());
    }
    results
}

/// One line per missing tool, e.g. `git (install from https://git-scm.com/downloads)`
pub fn missing_tools(tools: &[ToolInfo]) -> Vec<String> {
    tools
        .iter()
        .filter(|t| !t.available)
        .map(|t| format!("{} (install from {})", t.name, t.install_hint))
        .collect()
}
