//! Bulk placement records exchanged between the organizer and stores.

use super::entry::EntryId;
use super::group::{parent_ref, GroupId};
use serde::{Deserialize, Serialize};

/// New `(id, print_order, parent_id)` triple for one entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntryPlacement {
    pub id: EntryId,
    pub print_order: i64,
    /// Omitted or `"unorganized"` on the wire.
    #[serde(default, with = "parent_ref")]
    pub parent_id: Option<GroupId>,
}

/// New `(id, print_order)` pair for one folder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupPlacement {
    pub id: GroupId,
    pub print_order: i64,
}

/// One bulk upsert request produced at save time.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaveBatch {
    pub groups: Vec<GroupPlacement>,
    pub entries: Vec<EntryPlacement>,
}

impl SaveBatch {
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty() && self.entries.is_empty()
    }
}

/// Per-record outcome of applying a [`SaveBatch`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveReport {
    pub groups_updated: usize,
    pub entries_updated: usize,
    /// Folder placements whose folder no longer exists.
    pub missing_groups: Vec<GroupId>,
    /// Entry placements whose entry no longer exists.
    pub missing_entries: Vec<EntryId>,
    /// Entry placements pointing at a folder that no longer exists.
    pub orphaned_entries: Vec<EntryId>,
}

impl SaveReport {
    /// True when every record in the batch was written.
    pub fn is_complete(&self) -> bool {
        self.missing_groups.is_empty()
            && self.missing_entries.is_empty()
            && self.orphaned_entries.is_empty()
    }
}

/// Outcome of a destructive order reset.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResetReport {
    pub entries_reset: usize,
    pub groups_deleted: usize,
}
