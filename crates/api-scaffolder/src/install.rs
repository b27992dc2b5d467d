//! Dependency installation
//!
//! Runs the package manager in the generated project: base install, then the
//! database's runtime and dev dependencies, then its post-install step. The
//! first failure stops the sequence.

use crate::project::Database;
use crate::runtime::{CommandRunner, Invocation, PackageManager};
use anyhow::{Context, Result};
use std::path::Path;

/// Invocations for a database choice, in execution order
pub fn install_plan(pm: PackageManager, database: Database) -> Vec<Invocation> {
    let profile = database.profile();
    let mut plan = vec![pm.install_all()];

    if !profile.dependencies.is_empty() {
        plan.push(pm.add(profile.dependencies));
    }
    if !profile.dev_dependencies.is_empty() {
        plan.push(pm.add_dev(profile.dev_dependencies));
    }
    if let Some(post_install) = profile.post_install {
        plan.push(pm.exec(post_install));
    }

    plan
}

/// Run the install plan in `project_dir`, aborting on the first failure
pub async fn install_dependencies<R: CommandRunner + ?Sized>(
    runner: &R,
    pm: PackageManager,
    database: Database,
    project_dir: &Path,
) -> Result<()> {
    for invocation in install_plan(pm, database) {
        tracing::info!(command = %invocation, "installing");
        runner
            .run(&invocation, project_dir)
            .await
            .with_context(|| format!("Dependency installation failed at `{}`", invocation))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ScaffoldError;
    use crate::project::Orm;
    use crate::runtime::fake::RecordingRunner;

    fn rendered(plan: &[Invocation]) -> Vec<String> {
        // Strip Windows shims so expectations read the same everywhere
        plan.iter()
            .map(|i| i.to_string().replacen(".cmd", "", 1))
            .collect()
    }

    #[test]
    fn test_mongodb_plan() {
        let plan = install_plan(PackageManager::Npm, Database::MongoDb);
        assert_eq!(rendered(&plan), ["npm install", "npm install mongoose"]);
    }

    #[test]
    fn test_prisma_plan_ends_with_generate() {
        let plan = install_plan(PackageManager::Npm, Database::PostgreSql { orm: Orm::Prisma });
        assert_eq!(
            rendered(&plan),
            [
                "npm install",
                "npm install @prisma/client",
                "npm install --save-dev prisma",
                "npx prisma generate",
            ]
        );
    }

    #[test]
    fn test_drizzle_plan_with_pnpm() {
        let plan = install_plan(PackageManager::Pnpm, Database::PostgreSql { orm: Orm::Drizzle });
        assert_eq!(
            rendered(&plan),
            [
                "pnpm install",
                "pnpm add drizzle-orm pg",
                "pnpm add --save-dev drizzle-kit @types/pg",
            ]
        );
    }

    #[tokio::test]
    async fn test_runs_plan_in_project_dir() {
        let runner = RecordingRunner::new();
        let dir = tempfile::tempdir().unwrap();
        let database = Database::PostgreSql { orm: Orm::Prisma };

        install_dependencies(&runner, PackageManager::Npm, database, dir.path())
            .await
            .unwrap();

        let calls = runner.calls();
        assert_eq!(calls.len(), 4);
        assert!(calls.iter().all(|(_, cwd)| cwd == dir.path()));
    }

    #[tokio::test]
    async fn test_first_failure_stops_sequence() {
        let npm = PackageManager::Npm.program();
        let runner = RecordingRunner::failing_on(npm);
        let dir = tempfile::tempdir().unwrap();

        let err = install_dependencies(
            &runner,
            PackageManager::Npm,
            Database::PostgreSql { orm: Orm::Prisma },
            dir.path(),
        )
        .await
        .unwrap_err();

        assert_eq!(runner.calls().len(), 1);
        assert!(format!("{:#}", err).contains("npm"));
        assert!(matches!(
            err.downcast_ref::<ScaffoldError>(),
            Some(ScaffoldError::CommandFailed { .. })
        ));
    }
}
