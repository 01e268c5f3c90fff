//! Entry/group store contracts and SQLite implementation.
//!
//! # Responsibility
//! - Persist entries and print folders with their placement.
//! - Apply save batches, backup restores and destructive resets as single transactions.
//!
//! # Invariants
//! - Entry listing is deterministic: `print_order ASC, row_id ASC`.
//! - Group listing is deterministic: `print_order ASC, rowid ASC`.
//! - An entry's `parent_id` is either NULL or an existing group id.

use crate::db::migrations::latest_version;
use crate::db::DbError;
use crate::model::backup::{Backup, ImportReport};
use crate::model::entry::{Entry, EntryContent, EntryId, EntryPatch, NewEntry, RowId};
use crate::model::group::{Group, GroupId};
use crate::model::placement::{ResetReport, SaveBatch, SaveReport};
use crate::model::ModelValidationError;
use log::{info, warn};
use rusqlite::{params, Connection, OptionalExtension, Row, Transaction, TransactionBehavior};
use std::error::Error;
use std::fmt::{Display, Formatter};

const ENTRY_SELECT_SQL: &str = "SELECT
    row_id,
    id,
    title,
    intuition,
    approach,
    dry_run,
    time_complexity,
    space_complexity,
    quick_revision,
    code,
    tags,
    images,
    parent_id,
    print_order
FROM entries";

const ENTRY_COLUMNS: &[&str] = &[
    "row_id",
    "id",
    "title",
    "intuition",
    "approach",
    "dry_run",
    "time_complexity",
    "space_complexity",
    "quick_revision",
    "code",
    "tags",
    "images",
    "parent_id",
    "print_order",
];

const GROUP_COLUMNS: &[&str] = &["id", "name", "print_order"];

/// Result type used by store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Errors from entry/group store operations.
#[derive(Debug)]
pub enum StoreError {
    /// Underlying SQLite/bootstrap error.
    Db(DbError),
    /// Record failed model validation before write.
    Validation(ModelValidationError),
    /// Another entry already uses this client id.
    DuplicateEntryId(EntryId),
    /// Another group already uses this client id.
    DuplicateGroupId(GroupId),
    /// No entry with this client id.
    EntryNotFound(EntryId),
    /// No entry with this storage row id.
    RowNotFound(RowId),
    /// Referenced group does not exist.
    GroupNotFound(GroupId),
    /// Connection schema is not at the expected migrated version.
    UninitializedConnection {
        expected_version: u32,
        actual_version: u32,
    },
    /// Required table is missing.
    MissingRequiredTable(&'static str),
    /// Required column is missing from expected table.
    MissingRequiredColumn {
        table: &'static str,
        column: &'static str,
    },
    /// Persisted data cannot be converted to a valid read model.
    InvalidData(String),
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::Validation(err) => write!(f, "{err}"),
            Self::DuplicateEntryId(id) => write!(f, "entry id already exists: {id}"),
            Self::DuplicateGroupId(id) => write!(f, "folder id already exists: {id}"),
            Self::EntryNotFound(id) => write!(f, "entry not found: {id}"),
            Self::RowNotFound(row_id) => write!(f, "entry row not found: {row_id}"),
            Self::GroupNotFound(id) => write!(f, "folder not found: {id}"),
            Self::UninitializedConnection {
                expected_version,
                actual_version,
            } => write!(
                f,
                "order store requires schema version {expected_version}, got {actual_version}"
            ),
            Self::MissingRequiredTable(table) => {
                write!(f, "order store requires table `{table}`")
            }
            Self::MissingRequiredColumn { table, column } => write!(
                f,
                "order store requires column `{column}` in table `{table}`"
            ),
            Self::InvalidData(message) => write!(f, "invalid persisted data: {message}"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::Validation(err) => Some(err),
            _ => None,
        }
    }
}

impl From<DbError> for StoreError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for StoreError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

impl From<ModelValidationError> for StoreError {
    fn from(value: ModelValidationError) -> Self {
        Self::Validation(value)
    }
}

/// Persistence collaborator for the print organizer.
pub trait OrderStore {
    /// Lists every entry in stored print order.
    fn list_entries(&self) -> StoreResult<Vec<Entry>>;
    /// Lists every folder in stored print order.
    fn list_groups(&self) -> StoreResult<Vec<Group>>;
    /// Loads one entry by client id.
    fn get_entry(&self, id: &str) -> StoreResult<Option<Entry>>;
    /// Inserts one entry.
    fn create_entry(&self, entry: &NewEntry) -> StoreResult<Entry>;
    /// Inserts one folder.
    fn create_group(&self, group: &Group) -> StoreResult<Group>;
    /// Replaces fields of one entry addressed by storage row id.
    fn update_entry(&self, row_id: RowId, patch: EntryPatch) -> StoreResult<Entry>;
    /// Applies a bulk placement update as independent per-record writes.
    fn apply_save_batch(&self, batch: &SaveBatch) -> StoreResult<SaveReport>;
    /// Moves every entry to the virtual folder at order 0 and deletes all folders.
    fn reset_order(&self) -> StoreResult<ResetReport>;
    /// Upserts a backup document, folders first, as one all-or-nothing write.
    fn restore_backup(&self, backup: &Backup) -> StoreResult<ImportReport>;
}

/// SQLite-backed entry/group store.
#[derive(Debug, Clone, Copy)]
pub struct SqliteOrderStore<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteOrderStore<'conn> {
    /// Creates store from migrated connection.
    pub fn try_new(conn: &'conn Connection) -> StoreResult<Self> {
        ensure_store_connection_ready(conn)?;
        Ok(Self { conn })
    }
}

impl OrderStore for SqliteOrderStore<'_> {
    fn list_entries(&self) -> StoreResult<Vec<Entry>> {
        let mut stmt = self.conn.prepare(&format!(
            "{ENTRY_SELECT_SQL} ORDER BY print_order ASC, row_id ASC;"
        ))?;
        let mut rows = stmt.query([])?;
        let mut entries = Vec::new();
        while let Some(row) = rows.next()? {
            entries.push(parse_entry_row(row)?);
        }
        Ok(entries)
    }

    fn list_groups(&self) -> StoreResult<Vec<Group>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, name, print_order
             FROM print_groups
             ORDER BY print_order ASC, rowid ASC;",
        )?;
        let mut rows = stmt.query([])?;
        let mut groups = Vec::new();
        while let Some(row) = rows.next()? {
            groups.push(Group {
                id: row.get("id")?,
                name: row.get("name")?,
                print_order: row.get("print_order")?,
            });
        }
        Ok(groups)
    }

    fn get_entry(&self, id: &str) -> StoreResult<Option<Entry>> {
        load_entry_by_id(self.conn, id)
    }

    fn create_entry(&self, entry: &NewEntry) -> StoreResult<Entry> {
        entry.validate()?;
        if let Some(parent_id) = entry.parent_id.as_deref() {
            ensure_group_exists(self.conn, parent_id)?;
        }

        insert_entry(self.conn, entry)?;
        load_entry_by_id(self.conn, entry.id.as_str())?
            .ok_or_else(|| StoreError::EntryNotFound(entry.id.clone()))
    }

    fn create_group(&self, group: &Group) -> StoreResult<Group> {
        group.validate()?;
        let name = group.name.trim();
        let inserted = self.conn.execute(
            "INSERT INTO print_groups (id, name, print_order) VALUES (?1, ?2, ?3);",
            params![group.id.as_str(), name, group.print_order],
        );
        match inserted {
            Ok(_) => Ok(Group::with_id(group.id.clone(), name, group.print_order)),
            Err(err) if is_unique_violation(&err) => {
                Err(StoreError::DuplicateGroupId(group.id.clone()))
            }
            Err(err) => Err(err.into()),
        }
    }

    fn update_entry(&self, row_id: RowId, patch: EntryPatch) -> StoreResult<Entry> {
        let tx = Transaction::new_unchecked(self.conn, TransactionBehavior::Immediate)?;
        let mut entry = load_entry_by_row(&tx, row_id)?.ok_or(StoreError::RowNotFound(row_id))?;
        if let Some(Some(parent_id)) = patch.parent_id.as_ref() {
            ensure_group_exists(&tx, parent_id)?;
        }
        patch.apply_to(&mut entry);

        write_entry(&tx, &entry)?;
        tx.commit()?;
        Ok(entry)
    }

    fn apply_save_batch(&self, batch: &SaveBatch) -> StoreResult<SaveReport> {
        let tx = Transaction::new_unchecked(self.conn, TransactionBehavior::Immediate)?;
        let mut report = SaveReport::default();

        for group in &batch.groups {
            let changed = tx.execute(
                "UPDATE print_groups
                 SET print_order = ?2,
                     updated_at = (strftime('%s', 'now') * 1000)
                 WHERE id = ?1;",
                params![group.id.as_str(), group.print_order],
            )?;
            if changed == 0 {
                report.missing_groups.push(group.id.clone());
            } else {
                report.groups_updated += 1;
            }
        }

        for entry in &batch.entries {
            if let Some(parent_id) = entry.parent_id.as_deref() {
                if !group_exists(&tx, parent_id)? {
                    report.orphaned_entries.push(entry.id.clone());
                    continue;
                }
            }
            let changed = tx.execute(
                "UPDATE entries
                 SET print_order = ?2,
                     parent_id = ?3,
                     updated_at = (strftime('%s', 'now') * 1000)
                 WHERE id = ?1;",
                params![
                    entry.id.as_str(),
                    entry.print_order,
                    entry.parent_id.as_deref()
                ],
            )?;
            if changed == 0 {
                report.missing_entries.push(entry.id.clone());
            } else {
                report.entries_updated += 1;
            }
        }

        tx.commit()?;

        if report.is_complete() {
            info!(
                "event=save_batch module=store status=ok groups={} entries={}",
                report.groups_updated, report.entries_updated
            );
        } else {
            warn!(
                "event=save_batch module=store status=partial groups={} entries={} missing_groups={} missing_entries={} orphaned_entries={}",
                report.groups_updated,
                report.entries_updated,
                report.missing_groups.len(),
                report.missing_entries.len(),
                report.orphaned_entries.len()
            );
        }
        Ok(report)
    }

    fn reset_order(&self) -> StoreResult<ResetReport> {
        let tx = Transaction::new_unchecked(self.conn, TransactionBehavior::Immediate)?;
        let entries_reset = tx.execute(
            "UPDATE entries
             SET print_order = 0,
                 parent_id = NULL,
                 updated_at = (strftime('%s', 'now') * 1000);",
            [],
        )?;
        let groups_deleted = tx.execute("DELETE FROM print_groups;", [])?;
        tx.commit()?;

        info!(
            "event=reset_order module=store status=ok entries={entries_reset} groups_deleted={groups_deleted}"
        );
        Ok(ResetReport {
            entries_reset,
            groups_deleted,
        })
    }

    fn restore_backup(&self, backup: &Backup) -> StoreResult<ImportReport> {
        for group in &backup.groups {
            group.validate()?;
        }
        for entry in &backup.entries {
            entry.validate()?;
        }

        let tx = Transaction::new_unchecked(self.conn, TransactionBehavior::Immediate)?;
        let mut report = ImportReport::default();

        for group in &backup.groups {
            let changed = tx.execute(
                "UPDATE print_groups
                 SET name = ?2,
                     print_order = ?3,
                     updated_at = (strftime('%s', 'now') * 1000)
                 WHERE id = ?1;",
                params![group.id.as_str(), group.name.trim(), group.print_order],
            )?;
            if changed == 0 {
                tx.execute(
                    "INSERT INTO print_groups (id, name, print_order) VALUES (?1, ?2, ?3);",
                    params![group.id.as_str(), group.name.trim(), group.print_order],
                )?;
                report.groups_created += 1;
            } else {
                report.groups_updated += 1;
            }
        }

        for record in &backup.entries {
            if let Some(parent_id) = record.parent_id.as_deref() {
                ensure_group_exists(&tx, parent_id)?;
            }
            match load_entry_by_id(&tx, record.id.as_str())? {
                Some(existing) => {
                    let restored = Entry {
                        row_id: existing.row_id,
                        id: existing.id,
                        parent_id: record.parent_id.clone(),
                        print_order: record.print_order,
                        content: record.content.clone(),
                    };
                    write_entry(&tx, &restored)?;
                    report.updated += 1;
                }
                None => {
                    insert_entry(&tx, record)?;
                    report.created += 1;
                }
            }
        }

        tx.commit()?;
        info!(
            "event=restore_backup module=store status=ok groups_created={} groups_updated={} created={} updated={}",
            report.groups_created, report.groups_updated, report.created, report.updated
        );
        Ok(report)
    }
}

fn insert_entry(conn: &Connection, entry: &NewEntry) -> StoreResult<()> {
    let content = &entry.content;
    let inserted = conn.execute(
        "INSERT INTO entries (
            id,
            title,
            intuition,
            approach,
            dry_run,
            time_complexity,
            space_complexity,
            quick_revision,
            code,
            tags,
            images,
            parent_id,
            print_order
        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13);",
        params![
            entry.id.as_str(),
            content.title.as_str(),
            content.intuition.as_str(),
            encode_list(&content.approach)?,
            content.dry_run.as_str(),
            content.time_complexity.as_str(),
            content.space_complexity.as_str(),
            encode_list(&content.quick_revision)?,
            content.code.as_str(),
            encode_list(&content.tags)?,
            encode_list(&content.images)?,
            entry.parent_id.as_deref(),
            entry.print_order,
        ],
    );
    match inserted {
        Ok(_) => Ok(()),
        Err(err) if is_unique_violation(&err) => {
            Err(StoreError::DuplicateEntryId(entry.id.clone()))
        }
        Err(err) => Err(err.into()),
    }
}

/// Rewrites every stored field of `entry` addressed by its row id.
fn write_entry(conn: &Connection, entry: &Entry) -> StoreResult<()> {
    let content = &entry.content;
    conn.execute(
        "UPDATE entries
         SET title = ?2,
             intuition = ?3,
             approach = ?4,
             dry_run = ?5,
             time_complexity = ?6,
             space_complexity = ?7,
             quick_revision = ?8,
             code = ?9,
             tags = ?10,
             images = ?11,
             parent_id = ?12,
             print_order = ?13,
             updated_at = (strftime('%s', 'now') * 1000)
         WHERE row_id = ?1;",
        params![
            entry.row_id,
            content.title.as_str(),
            content.intuition.as_str(),
            encode_list(&content.approach)?,
            content.dry_run.as_str(),
            content.time_complexity.as_str(),
            content.space_complexity.as_str(),
            encode_list(&content.quick_revision)?,
            content.code.as_str(),
            encode_list(&content.tags)?,
            encode_list(&content.images)?,
            entry.parent_id.as_deref(),
            entry.print_order,
        ],
    )?;
    Ok(())
}

fn load_entry_by_id(conn: &Connection, id: &str) -> StoreResult<Option<Entry>> {
    let mut stmt = conn.prepare(&format!("{ENTRY_SELECT_SQL} WHERE id = ?1;"))?;
    let mut rows = stmt.query([id])?;
    if let Some(row) = rows.next()? {
        return Ok(Some(parse_entry_row(row)?));
    }
    Ok(None)
}

fn load_entry_by_row(conn: &Connection, row_id: RowId) -> StoreResult<Option<Entry>> {
    let mut stmt = conn.prepare(&format!("{ENTRY_SELECT_SQL} WHERE row_id = ?1;"))?;
    let mut rows = stmt.query([row_id])?;
    if let Some(row) = rows.next()? {
        return Ok(Some(parse_entry_row(row)?));
    }
    Ok(None)
}

fn group_exists(conn: &Connection, id: &str) -> StoreResult<bool> {
    let found: Option<i64> = conn
        .query_row("SELECT 1 FROM print_groups WHERE id = ?1;", [id], |row| {
            row.get(0)
        })
        .optional()?;
    Ok(found.is_some())
}

fn ensure_group_exists(conn: &Connection, id: &str) -> StoreResult<()> {
    if group_exists(conn, id)? {
        Ok(())
    } else {
        Err(StoreError::GroupNotFound(id.to_string()))
    }
}

fn parse_entry_row(row: &Row<'_>) -> StoreResult<Entry> {
    Ok(Entry {
        row_id: row.get("row_id")?,
        id: row.get("id")?,
        parent_id: row.get("parent_id")?,
        print_order: row.get("print_order")?,
        content: EntryContent {
            title: row.get("title")?,
            intuition: row.get("intuition")?,
            approach: decode_list(row, "approach")?,
            dry_run: row.get("dry_run")?,
            time_complexity: row.get("time_complexity")?,
            space_complexity: row.get("space_complexity")?,
            quick_revision: decode_list(row, "quick_revision")?,
            code: row.get("code")?,
            tags: decode_list(row, "tags")?,
            images: decode_list(row, "images")?,
        },
    })
}

fn encode_list(values: &[String]) -> StoreResult<String> {
    serde_json::to_string(values)
        .map_err(|err| StoreError::InvalidData(format!("cannot encode list column: {err}")))
}

fn decode_list(row: &Row<'_>, column: &'static str) -> StoreResult<Vec<String>> {
    let raw: String = row.get(column)?;
    serde_json::from_str(&raw).map_err(|_| {
        StoreError::InvalidData(format!("invalid JSON list `{raw}` in entries.{column}"))
    })
}

fn is_unique_violation(err: &rusqlite::Error) -> bool {
    matches!(
        err,
        rusqlite::Error::SqliteFailure(code, _)
            if code.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_PRIMARYKEY
                || code.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE
    )
}

fn ensure_store_connection_ready(conn: &Connection) -> StoreResult<()> {
    let expected_version = latest_version();
    let actual_version: u32 = conn.query_row("PRAGMA user_version;", [], |row| row.get(0))?;
    if actual_version != expected_version {
        return Err(StoreError::UninitializedConnection {
            expected_version,
            actual_version,
        });
    }

    for (table, columns) in [("entries", ENTRY_COLUMNS), ("print_groups", GROUP_COLUMNS)] {
        if !table_exists(conn, table)? {
            return Err(StoreError::MissingRequiredTable(table));
        }
        for &column in columns {
            if !table_has_column(conn, table, column)? {
                return Err(StoreError::MissingRequiredColumn { table, column });
            }
        }
    }

    Ok(())
}

fn table_exists(conn: &Connection, table: &str) -> StoreResult<bool> {
    let exists: i64 = conn.query_row(
        "SELECT EXISTS(
            SELECT 1
            FROM sqlite_master
            WHERE type = 'table' AND name = ?1
        );",
        [table],
        |row| row.get(0),
    )?;
    Ok(exists == 1)
}

fn table_has_column(conn: &Connection, table: &str, column: &str) -> StoreResult<bool> {
    let mut stmt = conn.prepare(&format!("PRAGMA table_info({table});"))?;
    let mut rows = stmt.query([])?;
    while let Some(row) = rows.next()? {
        let current: String = row.get(1)?;
        if current == column {
            return Ok(true);
        }
    }
    Ok(false)
}
