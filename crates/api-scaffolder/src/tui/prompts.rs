//! Charm-style CLI prompts using cliclack

use crate::error::ScaffoldError;
use crate::generator::{self, GenerateOptions, Generator, Progress, Stage, VcsOutcome};
use crate::product::ProductConfig;
use crate::project::{Database, DatabaseKind, Orm, ProjectConfig, ProjectName};
use crate::runtime::{check, PackageManager, ProcessRunner};
use crate::templates::{self, TemplateManifest};
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

/// Name used when `--yes` is given without a project name
const DEFAULT_PROJECT_NAME: &str = "my-app";

/// CLI arguments for the create command
#[derive(Debug, Clone, Default)]
pub struct CreateArgs {
    /// Project name (prompted for when absent)
    pub project_name: Option<String>,

    /// Database backend (prompted for when absent)
    pub database: Option<DatabaseKind>,

    /// ORM for PostgreSQL (prompted for when absent)
    pub orm: Option<Orm>,

    /// Keep Docker files (prompted for when absent)
    pub docker: Option<bool>,

    pub package_manager: PackageManager,

    /// Local template directory instead of the bundled one
    pub template_dir: Option<PathBuf>,

    pub skip_install: bool,

    pub skip_git: bool,

    /// Stream subprocess output instead of showing spinners
    pub verbose: bool,

    /// Accept defaults for every unanswered question (non-interactive mode)
    pub yes: bool,
}

/// Whether an error came from the user cancelling a prompt (Esc / Ctrl-C)
pub fn is_cancellation(error: &anyhow::Error) -> bool {
    error
        .chain()
        .filter_map(|cause| cause.downcast_ref::<std::io::Error>())
        .any(|io| io.kind() == std::io::ErrorKind::Interrupted)
}

/// Run the CLI with interactive prompts
pub async fn run<C: ProductConfig>(product: &C, args: CreateArgs, cli_version: &str) -> Result<()> {
    cliclack::intro(product.display_name())?;

    // Step 1: Locate the template
    let template_dir = templates::resolve_template_dir(product, args.template_dir.clone())?;
    describe_template(product, &template_dir, cli_version).await?;

    // Step 2: Collect the project config
    let config = acquire_config(&args)?;

    // Step 3: Refuse to touch an existing directory
    let parent_dir = std::env::current_dir().context("Failed to read current directory")?;
    let options = GenerateOptions {
        template_dir,
        parent_dir,
        package_manager: args.package_manager,
        git_identity: product.git_identity(),
        commit_message: product.commit_message(),
        skip_install: args.skip_install,
        skip_git: args.skip_git,
    };
    let project_dir = options.project_dir(&config);
    generator::ensure_target_absent(&project_dir)?;

    // Step 4: Advisory tool check
    check_tools(&args)?;

    // Step 5: Generate
    let runner = if args.verbose {
        ProcessRunner::streaming()
    } else {
        ProcessRunner::quiet()
    };
    let mut progress = SpinnerProgress::new(args.verbose);
    let outcome = Generator::new(&runner, options)
        .generate(&config, &mut progress)
        .await?;

    match &outcome.vcs {
        VcsOutcome::Initialized => {}
        VcsOutcome::Skipped => cliclack::log::info("Skipped git initialization")?,
        VcsOutcome::Failed(reason) => cliclack::log::warning(format!(
            "Could not initialize a git repository; the project is ready without one.\n{}",
            reason
        ))?,
    }

    cliclack::log::success(format!(
        "Created {} in {} ({} template files)",
        config.project_name,
        outcome.project_dir.display(),
        outcome.files_copied
    ))?;

    // Step 6: Show next steps
    print_next_steps(
        product,
        &outcome.project_dir,
        &config,
        args.package_manager,
        args.skip_install,
    )?;

    Ok(())
}

async fn describe_template<C: ProductConfig>(
    product: &C,
    template_dir: &Path,
    cli_version: &str,
) -> Result<()> {
    match TemplateManifest::load(template_dir).await {
        Ok(manifest) => {
            cliclack::log::info(format!(
                "Template: {} - {}",
                manifest.name, manifest.description
            ))?;
            if let Some(warning) = templates::check_compatibility(
                cli_version,
                &manifest.version,
                product.upgrade_command(),
            ) {
                cliclack::log::warning(warning)?;
            }
        }
        Err(e) => {
            tracing::debug!(error = %format!("{:#}", e), "no template manifest");
            cliclack::log::info(format!("Using templates from {}", template_dir.display()))?;
        }
    }
    Ok(())
}

fn acquire_config(args: &CreateArgs) -> Result<ProjectConfig> {
    let project_name = select_project_name(args)?;
    let kind = select_database(args)?;
    let database = match kind {
        // Reject before asking anything else
        DatabaseKind::MongoDb if args.orm.is_some() => {
            return Err(ScaffoldError::OrmNotSupported.into())
        }
        DatabaseKind::MongoDb => Database::MongoDb,
        DatabaseKind::PostgreSql => Database::PostgreSql {
            orm: select_orm(args)?,
        },
    };
    let include_docker = select_docker(args)?;

    let config = ProjectConfig::new(project_name, database, include_docker);

    cliclack::log::success(format!(
        "{} · {} · {}",
        config.project_name,
        config.database,
        if config.include_docker {
            "with Docker"
        } else {
            "without Docker"
        }
    ))?;

    Ok(config)
}

fn select_project_name(args: &CreateArgs) -> Result<ProjectName> {
    // A name given on the command line is not re-prompted
    if let Some(name) = &args.project_name {
        return Ok(ProjectName::parse(name)?);
    }
    if args.yes {
        return Ok(ProjectName::parse(DEFAULT_PROJECT_NAME)?);
    }

    let input: String = cliclack::input("Project name")
        .placeholder(DEFAULT_PROJECT_NAME)
        .default_input(DEFAULT_PROJECT_NAME)
        .validate(|input: &String| ProjectName::parse(input).map(|_| ()))
        .interact()?;

    Ok(ProjectName::parse(&input)?)
}

fn select_database(args: &CreateArgs) -> Result<DatabaseKind> {
    if let Some(kind) = args.database {
        cliclack::log::info(format!("Database: {}", kind))?;
        return Ok(kind);
    }
    // Only PostgreSQL takes an ORM
    if args.orm.is_some() {
        return Ok(DatabaseKind::PostgreSql);
    }
    if args.yes {
        return Ok(DatabaseKind::MongoDb);
    }

    let kind = cliclack::select("Which database will you use?")
        .item(DatabaseKind::MongoDb, "MongoDB", "with Mongoose")
        .item(DatabaseKind::PostgreSql, "PostgreSQL", "with Prisma or Drizzle")
        .initial_value(DatabaseKind::MongoDb)
        .interact()?;
    Ok(kind)
}

fn select_orm(args: &CreateArgs) -> Result<Orm> {
    if let Some(orm) = args.orm {
        cliclack::log::info(format!("ORM: {}", orm))?;
        return Ok(orm);
    }
    if args.yes {
        return Ok(Orm::Prisma);
    }

    let orm = cliclack::select("Which ORM will you use?")
        .item(Orm::Prisma, "Prisma", "schema-first, generated client")
        .item(Orm::Drizzle, "Drizzle", "TypeScript schema, SQL-like queries")
        .initial_value(Orm::Prisma)
        .interact()?;
    Ok(orm)
}

fn select_docker(args: &CreateArgs) -> Result<bool> {
    if let Some(docker) = args.docker {
        return Ok(docker);
    }
    if args.yes {
        return Ok(true);
    }

    let docker = cliclack::confirm("Include Docker configuration?")
        .initial_value(true)
        .interact()?;
    Ok(docker)
}

fn check_tools(args: &CreateArgs) -> Result<()> {
    let tools = check::check_tools(args.package_manager, !args.skip_install, !args.skip_git);
    if tools.is_empty() {
        return Ok(());
    }

    let missing = check::missing_tools(&tools);
    if missing.is_empty() {
        let found: Vec<String> = tools
            .iter()
            .map(|t| format!("{} ({})", t.name, t.version.as_deref().unwrap_or("unknown")))
            .collect();
        cliclack::log::info(format!("Detected tools: {}", found.join(", ")))?;
    } else {
        cliclack::log::warning(format!(
            "Missing tools:\n{}",
            missing
                .iter()
                .map(|m| format!("  - {}", m))
                .collect::<Vec<_>>()
                .join("\n")
        ))?;
    }
    Ok(())
}

/// Drives one cliclack spinner per stage, or plain step lines when
/// subprocess output is streamed
struct SpinnerProgress {
    spinner: Option<cliclack::ProgressBar>,
    verbose: bool,
}

impl SpinnerProgress {
    fn new(verbose: bool) -> Self {
        Self {
            spinner: None,
            verbose,
        }
    }

    fn done_message(stage: Stage) -> &'static str {
        match stage {
            Stage::Materialize => "Project files created",
            Stage::Install => "Dependencies installed",
            Stage::Git => "Git repository initialized",
        }
    }
}

/// `Progress` callbacks can't fail; a terminal write error only loses a status line
fn log_draw_error(result: std::io::Result<()>) {
    if let Err(e) = result {
        tracing::debug!(error = %e, "failed to draw progress line");
    }
}

impl Progress for SpinnerProgress {
    fn stage_started(&mut self, stage: Stage) {
        if self.verbose {
            log_draw_error(cliclack::log::step(format!("{}...", stage)));
        } else {
            let spinner = cliclack::spinner();
            spinner.start(format!("{}...", stage));
            self.spinner = Some(spinner);
        }
    }

    fn stage_finished(&mut self, stage: Stage) {
        match self.spinner.take() {
            Some(spinner) => spinner.stop(Self::done_message(stage)),
            None => {
                log_draw_error(cliclack::log::success(Self::done_message(stage)));
            }
        }
    }

    fn stage_failed(&mut self, stage: Stage, _error: &anyhow::Error) {
        let message = format!("{} failed", stage);
        match self.spinner.take() {
            Some(spinner) => spinner.error(message),
            None => {
                log_draw_error(cliclack::log::error(message));
            }
        }
    }
}

fn print_next_steps<C: ProductConfig>(
    product: &C,
    project_dir: &Path,
    config: &ProjectConfig,
    pm: PackageManager,
    install_skipped: bool,
) -> Result<()> {
    let steps = product.next_steps(project_dir, config, pm, install_skipped);

    println!();
    println!("  Next steps");
    println!();

    for (i, step) in steps.iter().enumerate() {
        println!("  {}.  {}", i + 1, step);
    }

    cliclack::outro("Happy coding!")?;

    Ok(())
}
