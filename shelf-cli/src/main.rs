//! shelf CLI
//!
//! Command-line interface for a personal game library.

mod cli_types;
mod commands;
mod error;

use std::io::Write;

use clap::Parser;

use shelf_lib::{Library, Settings};

use cli_types::{Cli, Commands, ConfigAction};
use commands::{config, cookies, games, labels};
use error::CliError;

fn main() {
    let cli = Cli::parse();
    init_logging(cli.quiet, cli.verbose);

    if let Err(e) = run(cli) {
        log::error!("{e}");
        std::process::exit(1);
    }
}

/// Plain messages at info level; warnings and errors carry their level.
fn init_logging(quiet: bool, verbose: bool) {
    let level = if quiet {
        log::LevelFilter::Warn
    } else if verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .format(|buf, record| match record.level() {
            log::Level::Info => writeln!(buf, "{}", record.args()),
            level => writeln!(buf, "{level}: {}", record.args()),
        })
        .init();
}

fn run(cli: Cli) -> Result<(), CliError> {
    let settings = Settings::load().with_database_path(cli.db);

    // Settings commands never touch the database.
    if let Commands::Config { action } = &cli.command {
        match action {
            ConfigAction::Show => config::run_config_show(&settings),
            ConfigAction::Path => config::run_config_path(),
        }
        return Ok(());
    }

    let rt = tokio::runtime::Runtime::new()
        .map_err(|e| CliError::runtime(format!("failed to create tokio runtime: {e}")))?;
    rt.block_on(run_with_library(settings, cli.command))
}

async fn run_with_library(settings: Settings, command: Commands) -> Result<(), CliError> {
    let mut library = Library::open(settings).await?;
    let report = library.load_all().await?;
    if report.purged_events > 0 {
        log::warn!(
            "Removed {} timeline events of missing games {:?}",
            report.purged_events,
            report.purged_game_ids
        );
    }

    let result = dispatch(&mut library, command).await;
    // Pending writes are applied even when the command failed.
    library.close().await?;
    result
}

async fn dispatch(library: &mut Library, command: Commands) -> Result<(), CliError> {
    match command {
        Commands::List { label, tab } => games::run_list(library, label.as_deref(), tab.as_deref()),
        Commands::Show { id } => games::run_show(library, id),
        Commands::Add {
            id,
            name,
            version,
            developer,
        } => games::run_add(library, id, name, version, developer).await,
        Commands::Rename { id, name } => games::run_rename(library, id, name),
        Commands::Status { id, status } => games::run_status(library, id, status),
        Commands::Renumber { old, new } => games::run_renumber(library, old, new).await,
        Commands::Delete { id } => games::run_delete(library, id).await,
        Commands::Launch { id } => games::run_launch(library, id).await,
        Commands::Exe { id, path } => games::run_exe(library, id, &path).await,
        Commands::Label { action } => labels::run_label(library, action).await,
        Commands::Tab { action } => labels::run_tab(library, action).await,
        Commands::Cookies { action } => cookies::run_cookies(library, action).await,
        Commands::Config { .. } => Ok(()),
    }
}
