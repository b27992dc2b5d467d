//! Package manager command shapes

use crate::runtime::runner::Invocation;
use clap::ValueEnum;
use std::fmt;

/// Supported Node package managers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, ValueEnum)]
pub enum PackageManager {
    #[default]
    Npm,
    Pnpm,
    Yarn,
    Bun,
}

impl PackageManager {
    pub fn name(&self) -> &'static str {
        match self {
            PackageManager::Npm => "npm",
            PackageManager::Pnpm => "pnpm",
            PackageManager::Yarn => "yarn",
            PackageManager::Bun => "bun",
        }
    }

    /// Executable to spawn; node shims on Windows are `.cmd` files
    pub fn program(&self) -> String {
        shim(self.name())
    }

    /// Install everything listed in package.json
    pub fn install_all(&self) -> Invocation {
        Invocation::new(self.program(), ["install"])
    }

    /// Add runtime dependencies
    pub fn add(&self, packages: &[&str]) -> Invocation {
        let verb = match self {
            PackageManager::Npm => "install",
            PackageManager::Pnpm | PackageManager::Yarn | PackageManager::Bun => "add",
        };
        let args = std::iter::once(verb).chain(packages.iter().copied());
        Invocation::new(self.program(), args)
    }

    /// Add development dependencies
    pub fn add_dev(&self, packages: &[&str]) -> Invocation {
        let (verb, flag) = match self {
            PackageManager::Npm => ("install", "--save-dev"),
            PackageManager::Pnpm => ("add", "--save-dev"),
            PackageManager::Yarn | PackageManager::Bun => ("add", "--dev"),
        };
        let args = [verb, flag].into_iter().chain(packages.iter().copied());
        Invocation::new(self.program(), args)
    }

    /// Run a binary from the project's installed packages
    pub fn exec(&self, args: &[&str]) -> Invocation {
        let (program, prefix): (String, &[&str]) = match self {
            PackageManager::Npm => (shim("npx"), &[][..]),
            PackageManager::Pnpm => (self.program(), &["exec"][..]),
            PackageManager::Yarn => (self.program(), &[][..]),
            PackageManager::Bun => ("bunx".to_string(), &[][..]),
        };
        let args = prefix.iter().chain(args.iter()).copied();
        Invocation::new(program, args)
    }

    /// Command users type to run a package.json script
    pub fn run_script(&self, script: &str) -> String {
        format!("{} run {}", self.name(), script)
    }
}

impl fmt::Display for PackageManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

fn shim(name: &str) -> String {
    if cfg!(windows) && name != "bun" && name != "bunx" {
        format!("{}.cmd", name)
    } else {
        name.to_string()
    }
}
