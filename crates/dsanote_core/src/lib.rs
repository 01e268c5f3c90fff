//! Core domain logic for the DSA note print organizer.
//! This crate is the single source of truth for ordering invariants.

pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod organize;
pub mod print;
pub mod repo;
pub mod service;

pub use config::{OrganizerConfig, UnorganizedPosition};
pub use db::{open_db, open_db_in_memory, DbError, DbResult};
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::backup::{Backup, BackupView, ImportReport};
pub use model::entry::{Entry, EntryContent, EntryId, EntryPatch, NewEntry, RowId};
pub use model::group::{Group, GroupId, UNORGANIZED_ID, UNORGANIZED_NAME};
pub use model::placement::{EntryPlacement, GroupPlacement, ResetReport, SaveBatch, SaveReport};
pub use model::ModelValidationError;
pub use organize::{DragAction, DragItem, GroupView, MoveOutcome, Organizer, OrganizerError};
pub use print::{flatten, render_text, PrintPage};
pub use repo::order_repo::{OrderStore, SqliteOrderStore, StoreError, StoreResult};
pub use service::entry_service::{EntryService, EntryServiceError, EntryServiceResult};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
