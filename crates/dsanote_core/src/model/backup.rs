//! JSON backup document shapes.
//!
//! # Invariants
//! - Folders are restored before entries, so grouped entries never dangle.
//! - A restore is applied as one unit; a failing record leaves storage as it was.

use super::entry::{Entry, NewEntry};
use super::group::Group;
use serde::{Deserialize, Serialize};

/// Borrowed view written by export.
#[derive(Debug, Serialize)]
pub struct BackupView<'a> {
    pub groups: &'a [Group],
    pub entries: &'a [Entry],
}

/// Owned document read by import. Storage row ids in the input are ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Backup {
    #[serde(default)]
    pub groups: Vec<Group>,
    #[serde(default)]
    pub entries: Vec<NewEntry>,
}

/// Outcome counters of one restore run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportReport {
    pub groups_created: usize,
    pub groups_updated: usize,
    /// Entries inserted.
    pub created: usize,
    /// Entries replaced by client id.
    pub updated: usize,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::entry::EntryContent;

    #[test]
    fn export_view_reads_back_as_backup() {
        let groups = vec![Group::with_id("g1", "Graphs", 0)];
        let entries = vec![Entry {
            row_id: 12,
            id: "bfs".to_string(),
            parent_id: Some("g1".to_string()),
            print_order: 1,
            content: EntryContent::titled("BFS"),
        }];
        let json = serde_json::to_string(&BackupView {
            groups: &groups,
            entries: &entries,
        })
        .expect("backup should serialize");

        let backup: Backup = serde_json::from_str(&json).expect("backup should parse");
        assert_eq!(backup.groups, groups);
        assert_eq!(backup.entries.len(), 1);
        assert_eq!(backup.entries[0].parent_id.as_deref(), Some("g1"));
        assert_eq!(backup.entries[0].print_order, 1);
    }

    #[test]
    fn missing_sections_default_to_empty() {
        let backup: Backup = serde_json::from_str("{}").expect("empty document parses");
        assert_eq!(backup, Backup::default());
    }
}
