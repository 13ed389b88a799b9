//! `notekeep` command-line frontend.
//!
//! # Responsibility
//! - Resolve configuration, start logging and open the notes database.
//! - Dispatch one command against `notekeep_core` and render the result.

mod cli;
mod commands;
mod config;

use anyhow::{Context, Result};
use clap::Parser;
use cli::{Cli, Commands, ListArgs};
use config::{AppConfig, Overrides};
use log::warn;
use notekeep_core::db::open_db;
use notekeep_core::{init_logging, NoteListProjection, NoteService, SqliteNoteRepository};

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = AppConfig::load(&Overrides {
        config_path: cli.global.config,
        db_path: cli.global.db,
        log_level: cli.global.log_level,
    })?;

    // Logs are diagnostics only; a broken log dir must not block note access.
    if let Err(err) = init_logging(&config.log) {
        eprintln!("warning: logging disabled: {err}");
    }

    let conn = open_db(&config.db_path)
        .with_context(|| format!("failed to open notes at `{}`", config.db_path.display()))?;
    let repo = SqliteNoteRepository::try_new(&conn)?;
    let service = NoteService::new(repo);
    let projection = NoteListProjection::new(config.projection);

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    let result = match cli.command {
        None => commands::run_list(&service, &projection, &ListArgs::default(), &mut out),
        Some(Commands::List(args)) => commands::run_list(&service, &projection, &args, &mut out),
        Some(Commands::New(args)) => commands::run_new(&service, args, &mut out),
        Some(Commands::Show(args)) => commands::run_show(&service, &args, &mut out),
        Some(Commands::Edit(args)) => commands::run_edit(&service, args, &mut out),
        Some(Commands::Delete(args)) => commands::run_delete(&service, &args, &mut out),
    };
    if let Err(err) = &result {
        warn!("event=command module=cli status=error error={err}");
    }
    result
}
