//! Database file handling for the organizer.
//!
//! # Responsibility
//! - Open the notes database (file or in-memory) ready for the order store.
//! - Bring the entry/folder schema up to date.
//!
//! # Invariants
//! - Schema version lives in `PRAGMA user_version`.
//! - A database written by a newer build is refused, never downgraded.

use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;

pub mod migrations;
mod open;

pub use open::{open_db, open_db_in_memory};
pub use rusqlite::Connection;

pub type DbResult<T> = Result<T, DbError>;

/// Errors raised while opening or migrating the notes database.
#[derive(Debug)]
pub enum DbError {
    /// The database file could not be opened or created.
    Open {
        path: PathBuf,
        source: rusqlite::Error,
    },
    /// One schema step failed; the whole upgrade was rolled back.
    Migration { version: u32, source: rusqlite::Error },
    /// The file carries a schema this build does not know.
    NewerSchema { found: u32, supported: u32 },
    Sqlite(rusqlite::Error),
}

impl Display for DbError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Open { path, .. } => {
                write!(f, "cannot open notes database `{}`", path.display())
            }
            Self::Migration { version, .. } => {
                write!(f, "notes database upgrade to schema {version} failed")
            }
            Self::NewerSchema { found, supported } => write!(
                f,
                "notes database uses schema {found}, but this dsanote supports up to {supported}"
            ),
            Self::Sqlite(err) => write!(f, "{err}"),
        }
    }
}

impl Error for DbError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Open { source, .. } | Self::Migration { source, .. } => Some(source),
            Self::Sqlite(err) => Some(err),
            Self::NewerSchema { .. } => None,
        }
    }
}

impl From<rusqlite::Error> for DbError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Sqlite(value)
    }
}
