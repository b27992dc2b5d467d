//! Generation pipeline
//!
//! `ensure_target_absent` → materialize → install → git. Everything before git
//! is fatal; a git failure is reported in [`VcsOutcome::Failed`] and the run
//! still succeeds, since the project is usable without a repository.

use crate::error::ScaffoldError;
use crate::install::install_dependencies;
use crate::project::ProjectConfig;
use crate::runtime::{CommandRunner, PackageManager};
use crate::templates;
use crate::vcs::{initialize_repository, GitIdentity};
use anyhow::Result;
use std::fmt;
use std::path::{Path, PathBuf};

/// Pipeline stages reported to a [`Progress`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Materialize,
    Install,
    Git,
}

impl Stage {
    pub fn description(&self) -> &'static str {
        match self {
            Stage::Materialize => "Creating project files",
            Stage::Install => "Installing dependencies",
            Stage::Git => "Initializing git repository",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.description())
    }
}

/// Receives stage transitions, e.g. to drive spinners
pub trait Progress {
    fn stage_started(&mut self, stage: Stage);
    fn stage_finished(&mut self, stage: Stage);
    fn stage_failed(&mut self, stage: Stage, error: &anyhow::Error);
}

/// Ignores all progress
pub struct NoProgress;

impl Progress for NoProgress {
    fn stage_started(&mut self, _stage: Stage) {}
    fn stage_finished(&mut self, _stage: Stage) {}
    fn stage_failed(&mut self, _stage: Stage, _error: &anyhow::Error) {}
}

/// What happened in the git stage
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VcsOutcome {
    Initialized,
    Skipped,
    Failed(String),
}

#[derive(Debug, Clone)]
pub struct GenerationOutcome {
    pub project_dir: PathBuf,
    pub files_copied: usize,
    pub vcs: VcsOutcome,
}

/// Settings that aren't part of the user's project choices
#[derive(Debug, Clone)]
pub struct GenerateOptions {
    pub template_dir: PathBuf,
    /// Directory the project folder is created in
    pub parent_dir: PathBuf,
    pub package_manager: PackageManager,
    pub git_identity: GitIdentity,
    pub commit_message: String,
    pub skip_install: bool,
    pub skip_git: bool,
}

impl GenerateOptions {
    pub fn project_dir(&self, config: &ProjectConfig) -> PathBuf {
        self.parent_dir.join(config.project_name.as_str())
    }
}

/// Fails with [`ScaffoldError::TargetExists`] if anything is at `dir`
pub fn ensure_target_absent(dir: &Path) -> Result<()> {
    // symlink_metadata also catches dangling symlinks
    if dir.symlink_metadata().is_ok() {
        return Err(ScaffoldError::TargetExists(dir.to_path_buf()).into());
    }
    Ok(())
}

pub struct Generator<'a, R: CommandRunner + ?Sized> {
    runner: &'a R,
    options: GenerateOptions,
}

impl<'a, R: CommandRunner + ?Sized> Generator<'a, R> {
    pub fn new(runner: &'a R, options: GenerateOptions) -> Self {
        Self { runner, options }
    }

    /// Run the whole pipeline for `config`
    pub async fn generate(
        &self,
        config: &ProjectConfig,
        progress: &mut dyn Progress,
    ) -> Result<GenerationOutcome> {
        let project_dir = self.options.project_dir(config);
        ensure_target_absent(&project_dir)?;

        progress.stage_started(Stage::Materialize);
        let files_copied =
            match templates::materialize(&self.options.template_dir, &project_dir, config).await {
                Ok(count) => count,
                Err(e) => {
                    progress.stage_failed(Stage::Materialize, &e);
                    return Err(e);
                }
            };
        progress.stage_finished(Stage::Materialize);

        if !self.options.skip_install {
            progress.stage_started(Stage::Install);
            if let Err(e) = install_dependencies(
                self.runner,
                self.options.package_manager,
                config.database,
                &project_dir,
            )
            .await
            {
                progress.stage_failed(Stage::Install, &e);
                return Err(e);
            }
            progress.stage_finished(Stage::Install);
        }

        let vcs = if self.options.skip_git {
            VcsOutcome::Skipped
        } else {
            progress.stage_started(Stage::Git);
            match initialize_repository(
                self.runner,
                &project_dir,
                &self.options.git_identity,
                &self.options.commit_message,
            )
            .await
            {
                Ok(()) => {
                    progress.stage_finished(Stage::Git);
                    VcsOutcome::Initialized
                }
                Err(e) => {
                    tracing::debug!(error = %format!("{:#}", e), "git initialization failed");
                    progress.stage_failed(Stage::Git, &e);
                    VcsOutcome::Failed(format!("{:#}", e))
                }
            }
        };

        Ok(GenerationOutcome {
            project_dir,
            files_copied,
            vcs,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile::{CONNECTION_MODULES, DATABASE_DIR};
    use crate::project::{DatabaseKind, Orm};
    use crate::runtime::fake::RecordingRunner;
    use crate::templates::cleanup::DOCKER_FILES;
    use std::fs as stdfs;

    /// The template tree shipped with the workspace
    fn bundled_template() -> PathBuf {
        Path::new(env!("CARGO_MANIFEST_DIR")).join("../../templates/node-api")
    }

    fn options(parent: &Path) -> GenerateOptions {
        GenerateOptions {
            template_dir: bundled_template(),
            parent_dir: parent.to_path_buf(),
            package_manager: PackageManager::Npm,
            git_identity: GitIdentity::new("Test", "test@example.com"),
            commit_message: "Initial commit".to_string(),
            skip_install: false,
            skip_git: false,
        }
    }

    #[derive(Default)]
    struct RecordingProgress {
        events: Vec<String>,
    }

    impl Progress for RecordingProgress {
        fn stage_started(&mut self, stage: Stage) {
            self.events.push(format!("start {:?}", stage));
        }
        fn stage_finished(&mut self, stage: Stage) {
            self.events.push(format!("finish {:?}", stage));
        }
        fn stage_failed(&mut self, stage: Stage, _error: &anyhow::Error) {
            self.events.push(format!("fail {:?}", stage));
        }
    }

    fn read_json(path: &Path) -> serde_json::Value {
        serde_json::from_str(&stdfs::read_to_string(path).unwrap()).unwrap()
    }

    #[tokio::test]
    async fn test_mongodb_without_docker() {
        let parent = tempfile::tempdir().unwrap();
        let runner = RecordingRunner::new();
        let config = ProjectConfig::from_parts("demo", DatabaseKind::MongoDb, None, false).unwrap();

        let outcome = Generator::new(&runner, options(parent.path()))
            .generate(&config, &mut NoProgress)
            .await
            .unwrap();

        let dir = parent.path().join("demo");
        assert_eq!(outcome.project_dir, dir);
        assert_eq!(outcome.vcs, VcsOutcome::Initialized);
        assert!(outcome.files_copied > 0);

        assert!(dir.join("src/database/mongoose.connection.ts").is_file());
        assert!(!dir.join("src/database/prisma.connection.ts").exists());
        assert!(!dir.join("src/database/drizzle.connection.ts").exists());
        for file in DOCKER_FILES {
            assert!(!dir.join(file).exists(), "{} should be removed", file);
        }
        assert!(!dir.join("template.yaml").exists());
        assert_eq!(read_json(&dir.join("package.json"))["name"], "demo");
    }

    #[tokio::test]
    async fn test_postgresql_prisma() {
        let parent = tempfile::tempdir().unwrap();
        let runner = RecordingRunner::new();
        let config =
            ProjectConfig::from_parts("api", DatabaseKind::PostgreSql, Some(Orm::Prisma), true)
                .unwrap();

        Generator::new(&runner, options(parent.path()))
            .generate(&config, &mut NoProgress)
            .await
            .unwrap();

        let dir = parent.path().join("api");
        let schema = stdfs::read_to_string(dir.join("prisma/schema.prisma")).unwrap();
        assert!(schema.contains("datasource db {\n  provider = \"postgresql\""));
        assert_eq!(
            read_json(&dir.join("package.json"))["scripts"]["db:migrate"],
            "prisma migrate dev"
        );
        for file in DOCKER_FILES {
            assert!(dir.join(file).exists(), "{} should be kept", file);
        }

        let commands = runner.commands();
        assert!(commands
            .iter()
            .any(|c| c.ends_with("prisma generate")));
    }

    #[tokio::test]
    async fn test_every_config_keeps_exactly_one_connection() {
        let parent = tempfile::tempdir().unwrap();
        let runner = RecordingRunner::new();
        let mut opts = options(parent.path());
        opts.skip_install = true;
        opts.skip_git = true;
        let generator = Generator::new(&runner, opts);

        for (name, kind, orm) in [
            ("m", DatabaseKind::MongoDb, None),
            ("p", DatabaseKind::PostgreSql, Some(Orm::Prisma)),
            ("d", DatabaseKind::PostgreSql, Some(Orm::Drizzle)),
        ] {
            let config = ProjectConfig::from_parts(name, kind, orm, true).unwrap();
            generator.generate(&config, &mut NoProgress).await.unwrap();

            let db_dir = parent.path().join(name).join(DATABASE_DIR);
            let kept: Vec<_> = CONNECTION_MODULES
                .iter()
                .filter(|m| db_dir.join(format!("{}.ts", m)).exists())
                .collect();
            let module = config.database.profile().connection_module;
            assert_eq!(kept, [&module]);

            let barrel = stdfs::read_to_string(db_dir.join("index.ts")).unwrap();
            assert_eq!(barrel.trim(), format!("export * from \"./{}\";", module));
        }
        assert!(runner.calls().is_empty());
    }

    #[tokio::test]
    async fn test_existing_target_aborts_without_writes() {
        let parent = tempfile::tempdir().unwrap();
        let existing = parent.path().join("demo");
        stdfs::create_dir(&existing).unwrap();
        stdfs::write(existing.join("keep.txt"), "mine").unwrap();

        let runner = RecordingRunner::new();
        let mut progress = RecordingProgress::default();
        let config = ProjectConfig::from_parts("demo", DatabaseKind::MongoDb, None, true).unwrap();

        let err = Generator::new(&runner, options(parent.path()))
            .generate(&config, &mut progress)
            .await
            .unwrap_err();

        assert!(matches!(
            err.downcast_ref::<ScaffoldError>(),
            Some(ScaffoldError::TargetExists(_))
        ));
        let entries: Vec<_> = stdfs::read_dir(&existing).unwrap().collect();
        assert_eq!(entries.len(), 1);
        assert!(progress.events.is_empty());
        assert!(runner.calls().is_empty());
    }

    #[tokio::test]
    async fn test_install_failure_skips_git() {
        let parent = tempfile::tempdir().unwrap();
        let runner = RecordingRunner::failing_on(PackageManager::Npm.program());
        let mut progress = RecordingProgress::default();
        let config = ProjectConfig::from_parts("demo", DatabaseKind::MongoDb, None, true).unwrap();

        let err = Generator::new(&runner, options(parent.path()))
            .generate(&config, &mut progress)
            .await
            .unwrap_err();

        assert!(matches!(
            err.downcast_ref::<ScaffoldError>(),
            Some(ScaffoldError::CommandFailed { .. })
        ));
        assert!(!runner.programs().iter().any(|p| p == "git"));
        assert_eq!(
            progress.events,
            ["start Materialize", "finish Materialize", "start Install", "fail Install"]
        );
        // No rollback: the partial project stays on disk
        assert!(parent.path().join("demo/package.json").is_file());
    }

    #[tokio::test]
    async fn test_git_failure_is_advisory() {
        let parent = tempfile::tempdir().unwrap();
        let runner = RecordingRunner::failing_on("git");
        let mut progress = RecordingProgress::default();
        let config = ProjectConfig::from_parts("demo", DatabaseKind::MongoDb, None, true).unwrap();

        let outcome = Generator::new(&runner, options(parent.path()))
            .generate(&config, &mut progress)
            .await
            .unwrap();

        match outcome.vcs {
            VcsOutcome::Failed(message) => assert!(message.contains("git init")),
            other => panic!("expected git failure, got {:?}", other),
        }
        assert_eq!(progress.events.last().unwrap(), "fail Git");
    }

    #[derive(Clone, Default)]
    struct SharedBuf(std::sync::Arc<std::sync::Mutex<Vec<u8>>>);

    impl std::io::Write for SharedBuf {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }
        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_git_failure_is_quiet_at_warn_level() {
        let buf = SharedBuf::default();
        let writer = buf.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::WARN)
            .with_writer(move || writer.clone())
            .finish();
        let _guard = tracing::subscriber::set_default(subscriber);

        let parent = tempfile::tempdir().unwrap();
        let runner = RecordingRunner::failing_on("git");
        let config = ProjectConfig::from_parts("demo", DatabaseKind::MongoDb, None, true).unwrap();

        let outcome = Generator::new(&runner, options(parent.path()))
            .generate(&config, &mut NoProgress)
            .await
            .unwrap();

        assert!(matches!(outcome.vcs, VcsOutcome::Failed(_)));
        let logged = String::from_utf8(buf.0.lock().unwrap().clone()).unwrap();
        assert!(logged.is_empty(), "unexpected log output: {}", logged);
    }

    #[tokio::test]
    async fn test_skip_git() {
        let parent = tempfile::tempdir().unwrap();
        let runner = RecordingRunner::new();
        let mut opts = options(parent.path());
        opts.skip_git = true;
        let config = ProjectConfig::from_parts("demo", DatabaseKind::MongoDb, None, true).unwrap();

        let outcome = Generator::new(&runner, opts)
            .generate(&config, &mut NoProgress)
            .await
            .unwrap();

        assert_eq!(outcome.vcs, VcsOutcome::Skipped);
        assert!(!runner.programs().iter().any(|p| p == "git"));
        assert_eq!(runner.calls().len(), 2);
    }

    #[tokio::test]
    async fn test_commands_run_inside_project_dir() {
        let parent = tempfile::tempdir().unwrap();
        let runner = RecordingRunner::new();
        let config = ProjectConfig::from_parts("demo", DatabaseKind::MongoDb, None, true).unwrap();

        Generator::new(&runner, options(parent.path()))
            .generate(&config, &mut NoProgress)
            .await
            .unwrap();

        let expected = parent.path().join("demo");
        assert!(runner.calls().iter().all(|(_, cwd)| *cwd == expected));
        assert_eq!(runner.commands().last().unwrap(), "git commit -m \"Initial commit\"");
    }

    #[test]
    fn test_ensure_target_absent() {
        let parent = tempfile::tempdir().unwrap();
        assert!(ensure_target_absent(&parent.path().join("new")).is_ok());
        assert!(ensure_target_absent(parent.path()).is_err());
    }
}
