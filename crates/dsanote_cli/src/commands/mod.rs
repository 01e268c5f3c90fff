//! Command handlers. Each invocation is one organizer session.

mod entries;
mod groups;
mod organize;
mod print;

use crate::cli::Commands;
use crate::config::AppConfig;
use anyhow::{Context, Result};
use dsanote_core::{open_db, Organizer, OrganizerConfig, SqliteOrderStore};
use dsanote_core::db::Connection;

/// Open database plus the settings every handler needs.
pub struct Session {
    conn: Connection,
    organizer_config: OrganizerConfig,
}

impl Session {
    pub fn open(config: &AppConfig) -> Result<Self> {
        if let Some(parent) = config.db_path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).with_context(|| {
                    format!("failed to create database directory `{}`", parent.display())
                })?;
            }
        }
        let conn = open_db(&config.db_path)?;
        Ok(Self {
            conn,
            organizer_config: config.organizer,
        })
    }

    pub fn store(&self) -> Result<SqliteOrderStore<'_>> {
        SqliteOrderStore::try_new(&self.conn).context("database is not ready")
    }

    /// Loads a fresh organizer snapshot.
    pub fn organizer(&self, store: &SqliteOrderStore<'_>) -> Result<Organizer> {
        let mut organizer = Organizer::new(self.organizer_config);
        organizer.reload(store)?;
        Ok(organizer)
    }
}

pub fn run(command: Commands, config: &AppConfig) -> Result<()> {
    if let Commands::Version = command {
        println!("dsanote {}", dsanote_core::core_version());
        return Ok(());
    }

    let session = Session::open(config)?;
    match command {
        Commands::Entries(command) => entries::run(command, &session),
        Commands::Groups(command) => groups::run(command, &session),
        Commands::Organize(command) => organize::run(command, &session),
        Commands::Print(args) => print::run(&args, &session),
        Commands::Version => Ok(()),
    }
}
