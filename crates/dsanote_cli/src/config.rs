//! Runtime configuration resolved from flags and environment.

use crate::cli::Cli;
use dsanote_core::{default_log_level, OrganizerConfig, UnorganizedPosition};
use std::path::PathBuf;

const DB_FILE_NAME: &str = "dsanote.sqlite3";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogConfig {
    pub level: String,
    pub dir: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub db_path: PathBuf,
    /// `None` keeps logging off.
    pub log: Option<LogConfig>,
    pub organizer: OrganizerConfig,
}

impl AppConfig {
    pub fn from_cli(cli: &Cli) -> Self {
        let log = non_blank(cli.log_dir.as_deref()).map(|dir| LogConfig {
            level: non_blank(cli.log_level.as_deref())
                .unwrap_or(default_log_level())
                .to_string(),
            dir: dir.to_string(),
        });
        let unorganized_position = if cli.unorganized_first {
            UnorganizedPosition::First
        } else {
            UnorganizedPosition::Last
        };

        Self {
            db_path: resolve_db_path(cli.db.as_deref()),
            log,
            organizer: OrganizerConfig {
                unorganized_position,
            },
        }
    }
}

/// Blank values fall back to `<temp dir>/dsanote.sqlite3`.
fn resolve_db_path(raw: Option<&str>) -> PathBuf {
    match non_blank(raw) {
        Some(path) => PathBuf::from(path),
        None => std::env::temp_dir().join(DB_FILE_NAME),
    }
}

fn non_blank(raw: Option<&str>) -> Option<&str> {
    raw.map(str::trim).filter(|value| !value.is_empty())
}
