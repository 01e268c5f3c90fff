//! Entry use-case service.
//!
//! # Responsibility
//! - Provide stable CRUD entry points keyed by client entry id.
//! - Export and import folders and entries as a JSON backup document.
//!
//! # Invariants
//! - Service APIs never bypass store validation/persistence contracts.
//! - An import either applies the whole document or writes nothing.

use crate::model::backup::{Backup, BackupView, ImportReport};
use crate::model::entry::{Entry, EntryPatch, NewEntry};
use crate::repo::order_repo::{OrderStore, StoreError};
use log::{error, info};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Result type used by entry service operations.
pub type EntryServiceResult<T> = Result<T, EntryServiceError>;

/// Errors from entry service operations.
#[derive(Debug)]
pub enum EntryServiceError {
    Store(StoreError),
    /// Backup document could not be encoded or decoded.
    Json(serde_json::Error),
}

impl Display for EntryServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Store(err) => write!(f, "{err}"),
            Self::Json(err) => write!(f, "invalid entry backup document: {err}"),
        }
    }
}

impl Error for EntryServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Store(err) => Some(err),
            Self::Json(err) => Some(err),
        }
    }
}

impl From<StoreError> for EntryServiceError {
    fn from(value: StoreError) -> Self {
        Self::Store(value)
    }
}

impl From<serde_json::Error> for EntryServiceError {
    fn from(value: serde_json::Error) -> Self {
        Self::Json(value)
    }
}

/// Use-case service wrapper for entry CRUD and backup.
pub struct EntryService<S: OrderStore> {
    store: S,
}

impl<S: OrderStore> EntryService<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn create_entry(&self, entry: &NewEntry) -> EntryServiceResult<Entry> {
        Ok(self.store.create_entry(entry)?)
    }

    /// Updates an entry addressed by client id.
    ///
    /// # Errors
    /// - `StoreError::EntryNotFound` when no entry uses `id`.
    pub fn update_entry(&self, id: &str, patch: EntryPatch) -> EntryServiceResult<Entry> {
        let current = self
            .store
            .get_entry(id)?
            .ok_or_else(|| StoreError::EntryNotFound(id.to_string()))?;
        Ok(self.store.update_entry(current.row_id, patch)?)
    }

    pub fn get_entry(&self, id: &str) -> EntryServiceResult<Option<Entry>> {
        Ok(self.store.get_entry(id)?)
    }

    pub fn list_entries(&self) -> EntryServiceResult<Vec<Entry>> {
        Ok(self.store.list_entries()?)
    }

    /// Serializes every folder and entry as a pretty JSON backup document.
    ///
    /// Both sections keep listing order.
    pub fn export_entries(&self) -> EntryServiceResult<String> {
        let groups = self.store.list_groups()?;
        let entries = self.store.list_entries()?;
        let json = serde_json::to_string_pretty(&BackupView {
            groups: &groups,
            entries: &entries,
        })?;
        info!(
            "event=entries_export module=service status=ok groups={} entries={}",
            groups.len(),
            entries.len()
        );
        Ok(json)
    }

    /// Restores a backup document produced by [`Self::export_entries`].
    ///
    /// Folders and entries are upserted by client id, folders first. The
    /// document is applied as a whole: a parse, validation or store error
    /// leaves the database untouched.
    pub fn import_entries(&self, json: &str) -> EntryServiceResult<ImportReport> {
        let backup: Backup = serde_json::from_str(json).map_err(|err| {
            error!("event=entries_import module=service status=error reason=parse");
            EntryServiceError::Json(err)
        })?;

        let report = self.store.restore_backup(&backup).map_err(|err| {
            error!("event=entries_import module=service status=error reason=store");
            err
        })?;
        info!(
            "event=entries_import module=service status=ok groups_created={} groups_updated={} created={} updated={}",
            report.groups_created, report.groups_updated, report.created, report.updated
        );
        Ok(report)
    }
}
