//! create-node-api - Project scaffolding for Node/TypeScript APIs

use anyhow::Result;
use api_scaffolder::tui::{is_cancellation, CreateArgs};
use api_scaffolder::{
    DatabaseKind, GitIdentity, Orm, PackageManager, ProductConfig, ProjectConfig,
};
use clap::Parser;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

/// CLI version
pub const CLI_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Template directory name, both next to the executable and in the repository
const TEMPLATE_NAME: &str = "node-api";

/// create-node-api product configuration
#[derive(Clone)]
pub struct NodeApiProduct;

impl ProductConfig for NodeApiProduct {
    fn name(&self) -> &'static str {
        "create-node-api"
    }

    fn display_name(&self) -> &'static str {
        "Create Node API"
    }

    fn template_dir_env(&self) -> &'static str {
        "CREATE_NODE_API_TEMPLATE_DIR"
    }

    fn bundled_template_dirs(&self) -> Vec<PathBuf> {
        let mut dirs = Vec::new();
        if let Some(exe_dir) = std::env::current_exe()
            .ok()
            .and_then(|exe| exe.parent().map(Path::to_path_buf))
        {
            dirs.push(exe_dir.join("templates").join(TEMPLATE_NAME));
        }
        dirs.push(
            Path::new(env!("CARGO_MANIFEST_DIR"))
                .join("../../templates")
                .join(TEMPLATE_NAME),
        );
        dirs
    }

    fn upgrade_command(&self) -> &'static str {
        "cargo install create-node-api --force"
    }

    fn default_git_identity(&self) -> GitIdentity {
        GitIdentity::new("create-node-api", "create-node-api@users.noreply.local")
    }

    fn git_name_env(&self) -> &'static str {
        "CREATE_NODE_API_GIT_NAME"
    }

    fn git_email_env(&self) -> &'static str {
        "CREATE_NODE_API_GIT_EMAIL"
    }

    fn next_steps(
        &self,
        dir: &Path,
        config: &ProjectConfig,
        pm: PackageManager,
        install_skipped: bool,
    ) -> Vec<String> {
        let mut steps = Vec::new();
        let current = std::env::current_dir().ok();

        // Step 1: cd to directory if not current
        if current.as_deref() != Some(dir) {
            let shown = current
                .as_deref()
                .and_then(|cwd| dir.strip_prefix(cwd).ok())
                .unwrap_or(dir);
            steps.push(format!("cd {}", shown.display()));
        }

        // Step 2: Dependencies were not installed for us
        if install_skipped {
            steps.push(format!("{} install", pm));
        }

        // Step 3: Environment file
        steps.push("cp .env.example .env".to_string());

        // Step 4: Database
        if config.include_docker {
            steps.push("docker compose up -d".to_string());
        } else {
            steps.push(format!(
                "Start {} and point DATABASE_URL in .env at it",
                config.database.kind().display_name()
            ));
        }
        if config.database.kind() == DatabaseKind::PostgreSql {
            steps.push(pm.run_script("db:migrate"));
        }

        // Step 5: Start dev server
        steps.push(pm.run_script("dev"));

        steps
    }
}

#[derive(Parser, Debug)]
#[command(name = "create-node-api")]
#[command(about = "CLI for scaffolding Node API projects with MongoDB or PostgreSQL")]
#[command(version)]
pub struct Args {
    /// Name of the project directory to create
    pub project_name: Option<String>,

    /// Database to use
    #[arg(long, value_enum)]
    pub database: Option<DatabaseKind>,

    /// ORM to use with PostgreSQL
    #[arg(long, value_enum)]
    pub orm: Option<Orm>,

    /// Keep Dockerfile, docker-compose.yml and .dockerignore
    #[arg(long, overrides_with = "no_docker")]
    pub docker: bool,

    /// Remove the Docker files from the generated project
    #[arg(long = "no-docker", overrides_with = "docker")]
    pub no_docker: bool,

    /// Package manager used for installs and shown in next steps
    #[arg(long = "package-manager", value_enum, default_value_t = PackageManager::Npm)]
    pub package_manager: PackageManager,

    /// Local directory to use for the template instead of the bundled one (for development use)
    #[arg(long = "template-dir")]
    pub template_dir: Option<PathBuf>,

    /// Do not install dependencies
    #[arg(long = "skip-install")]
    pub skip_install: bool,

    /// Do not initialize a git repository
    #[arg(long = "skip-git")]
    pub skip_git: bool,

    /// Auto-confirm all prompts (non-interactive mode)
    #[arg(short, long)]
    pub yes: bool,

    /// Stream package manager and git output, enable debug logs
    #[arg(short, long)]
    pub verbose: bool,
}

impl From<Args> for CreateArgs {
    fn from(args: Args) -> Self {
        let docker = match (args.docker, args.no_docker) {
            (true, _) => Some(true),
            (_, true) => Some(false),
            _ => None,
        };
        CreateArgs {
            project_name: args.project_name,
            database: args.database,
            orm: args.orm,
            docker,
            package_manager: args.package_manager,
            template_dir: args.template_dir,
            skip_install: args.skip_install,
            skip_git: args.skip_git,
            verbose: args.verbose,
            yes: args.yes,
        }
    }
}

/// Logs go to stderr so they never mix with prompts; `RUST_LOG` wins over `--verbose`
fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

#[tokio::main]
async fn main() -> ExitCode {
    // Ensure terminal cursor is restored on panic
    let default_panic = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let _ = console::Term::stderr().show_cursor();
        default_panic(info);
    }));

    // Handle Ctrl+C gracefully
    ctrlc::set_handler(move || {
        let _ = console::Term::stderr().show_cursor();
        std::process::exit(130);
    })
    .ok();

    let args = Args::parse();
    init_tracing(args.verbose);

    let result = run(args).await;

    // Ensure cursor is visible on normal exit
    let _ = console::Term::stderr().show_cursor();

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) if is_cancellation(&e) => {
            let _ = cliclack::outro_cancel("Cancelled");
            ExitCode::from(130)
        }
        Err(e) => {
            let _ = cliclack::log::error(format!("{:#}", e));
            ExitCode::FAILURE
        }
    }
}

async fn run(args: Args) -> Result<()> {
    let product = NodeApiProduct;
    api_scaffolder::run(&product, args.into(), CLI_VERSION).await
}
