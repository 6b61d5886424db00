use std::io;
use std::sync::Arc;

use anyhow::{Context, bail};
use clap::{Parser, Subcommand};
use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

use npm_install_assistant::command::{DependencyType, PackageManager};
use npm_install_assistant::config::{
    AssistantConfig, LOG_ENV, config_path, data_dir, log_path, preferences_db_path,
};
use npm_install_assistant::mount::{location_for_target, package_name_from_location};
use npm_install_assistant::preferences::PreferenceStore;
use npm_install_assistant::shell::{InputMode, Shell};
use npm_install_assistant::sidebar::clipboard::{ManualSelection, SystemClipboard, WithFallback};
use npm_install_assistant::sidebar::{Sidebar, SidebarEvent};
use npm_install_assistant::storage::{KeyValueStore, MemoryStore, SqliteStore};
use npm_install_assistant::version::registries::NpmRegistry;

#[derive(Parser)]
#[command(name = "npm-install-assistant")]
#[command(version, about = "Build and copy install commands for npm packages")]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Print the install assistant for one package
    Show {
        /// Package name, npm package page URL or `/package/...` path
        target: String,
        /// Package manager to generate the command for
        #[arg(long)]
        manager: Option<PackageManager>,
        /// Install as a development dependency
        #[arg(long)]
        dev: bool,
        /// Exact version instead of `latest`
        #[arg(long = "pin", value_name = "VERSION")]
        pinned_version: Option<String>,
        /// Show or hide prerelease versions
        #[arg(long)]
        beta: Option<bool>,
        /// Maximum number of versions listed (1-99)
        #[arg(long)]
        max: Option<u32>,
        /// Copy the resulting command to the clipboard
        #[arg(long)]
        copy: bool,
    },
    /// Read package page locations from stdin, one per line, remounting on change
    Watch,
    /// Drive the assistant with line commands (see `help` once started)
    Interactive {
        /// Package to open first
        target: Option<String>,
    },
}

/// Turns a CLI target into a location the mount controller understands
fn target_location(target: &str) -> anyhow::Result<String> {
    match location_for_target(target) {
        Some(location) => Ok(location),
        None => bail!("`{target}` is not a package name or package page"),
    }
}

fn init_logging(config: &AssistantConfig) -> Option<WorkerGuard> {
    let dir = data_dir();
    if let Err(e) = std::fs::create_dir_all(&dir) {
        eprintln!("Failed to create data directory {:?}: {}", dir, e);
        return None;
    }

    let path = log_path();
    let file_name = path.file_name()?.to_owned();
    let appender = tracing_appender::rolling::never(&dir, file_name);
    let (writer, guard) = tracing_appender::non_blocking(appender);

    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(writer)
        .with_ansi(false);

    if config.log.json {
        builder.json().init();
    } else {
        builder.init();
    }

    Some(guard)
}

fn build_sidebar(config: &AssistantConfig) -> anyhow::Result<Sidebar> {
    let registry =
        NpmRegistry::from_settings(&config.registry).context("failed to create HTTP client")?;

    let db_path = preferences_db_path();
    let store: Arc<dyn KeyValueStore> = match SqliteStore::new(&db_path) {
        Ok(store) => Arc::new(store),
        Err(e) => {
            warn!("Preferences will not persist, failed to open {:?}: {}", db_path, e);
            Arc::new(MemoryStore::new())
        }
    };

    let clipboard = WithFallback::new(SystemClipboard::default(), ManualSelection::new(io::stdout()));

    Ok(Sidebar::new(
        Arc::new(registry),
        PreferenceStore::new(store),
        Arc::new(clipboard),
    ))
}

#[allow(clippy::too_many_arguments)]
async fn show(
    mut sidebar: Sidebar,
    target: &str,
    manager: Option<PackageManager>,
    dev: bool,
    pinned_version: Option<String>,
    beta: Option<bool>,
    max: Option<u32>,
    copy: bool,
) -> anyhow::Result<()> {
    let location = target_location(target)?;
    let Some(package_name) = package_name_from_location(&location) else {
        bail!("`{target}` is not a package name or package page");
    };

    sidebar.mount(&package_name);
    sidebar.settle().await;

    if let Some(manager) = manager {
        sidebar.dispatch(SidebarEvent::PackageManagerSelected(manager));
    }
    if dev {
        sidebar.dispatch(SidebarEvent::DependencyTypeSelected(DependencyType::Dev));
    }
    if let Some(beta) = beta
        && beta != sidebar.state().show_beta
    {
        sidebar.dispatch(SidebarEvent::ShowBetaToggled);
    }
    if let Some(max) = max {
        sidebar.dispatch(SidebarEvent::MaxVersionsChanged(max.to_string()));
    }
    if let Some(version) = pinned_version {
        if !sidebar.view().offers(&version) {
            bail!("version `{version}` of {package_name} is not among the listed versions");
        }
        sidebar.dispatch(SidebarEvent::VersionSelected(version));
    }

    if copy {
        sidebar.dispatch(SidebarEvent::CopyRequested);
    }

    println!("{}", sidebar.view());
    Ok(())
}

async fn run(cli: Cli, config: AssistantConfig) -> anyhow::Result<()> {
    let sidebar = build_sidebar(&config)?;

    match cli.command {
        Some(Command::Show {
            target,
            manager,
            dev,
            pinned_version,
            beta,
            max,
            copy,
        }) => show(sidebar, &target, manager, dev, pinned_version, beta, max, copy).await,
        Some(Command::Watch) => {
            let mut shell = Shell::new(sidebar, io::stdout());
            let stdin = tokio::io::BufReader::new(tokio::io::stdin());
            shell.run(stdin, InputMode::Navigation).await?;
            Ok(())
        }
        Some(Command::Interactive { target }) => interactive(sidebar, target).await,
        None => interactive(sidebar, None).await,
    }
}

async fn interactive(sidebar: Sidebar, target: Option<String>) -> anyhow::Result<()> {
    let mut shell = Shell::new(sidebar, io::stdout());
    if let Some(target) = target {
        shell.navigate(&target_location(&target)?)?;
    }

    let stdin = tokio::io::BufReader::new(tokio::io::stdin());
    shell.run(stdin, InputMode::Commands).await?;
    Ok(())
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = AssistantConfig::load(&config_path());
    let _guard = init_logging(&config);
    info!("Starting npm-install-assistant {}", env!("CARGO_PKG_VERSION"));

    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?
        .block_on(run(cli, config))
}
