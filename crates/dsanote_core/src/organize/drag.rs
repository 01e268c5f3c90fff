//! Drag gesture resolution.
//!
//! A gesture names the dragged item and the item under the pointer on
//! release. Resolution reads the current organizer state and picks one of
//! four moves, or nothing when the references are stale or self-referencing.

use super::organizer::{MoveOutcome, Organizer, OrganizerError};
use crate::model::entry::EntryId;
use crate::model::group::GroupId;
use log::debug;

/// Item taking part in a drag gesture.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DragItem {
    /// Folder header. `None` is the virtual "unorganized" folder.
    Group(Option<GroupId>),
    Entry(EntryId),
}

/// Move chosen for a drag gesture.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DragAction {
    /// Folder dropped on another folder.
    GroupReorder { moved: GroupId, target: GroupId },
    /// Entry dropped on a sibling.
    EntryReorderSameParent {
        group: Option<GroupId>,
        moved: EntryId,
        target: EntryId,
    },
    /// Entry dropped on an entry of another folder; lands before it.
    EntryReparent {
        entry: EntryId,
        target_entry: EntryId,
        dest: Option<GroupId>,
    },
    /// Entry dropped on a folder header or its empty area.
    EntryDropOnGroup {
        entry: EntryId,
        dest: Option<GroupId>,
    },
}

impl Organizer {
    /// Checks that a drag may start and returns the overlay label.
    ///
    /// Returns `Ok(None)` for stale items and for the virtual folder header,
    /// which cannot be dragged.
    pub fn start_drag(&self, source: &DragItem) -> Result<Option<&str>, OrganizerError> {
        self.ensure_idle()?;
        let label = match source {
            DragItem::Group(Some(id)) => self.group(id).map(|group| group.name.as_str()),
            DragItem::Group(None) => None,
            DragItem::Entry(id) => self.entry(id).map(|entry| entry.title()),
        };
        Ok(label)
    }

    /// Picks the move for a released drag, or `None` to ignore it.
    pub fn resolve_drop(&self, source: &DragItem, target: &DragItem) -> Option<DragAction> {
        if source == target {
            return None;
        }

        match (source, target) {
            (DragItem::Group(Some(moved)), DragItem::Group(Some(target))) => {
                self.group(moved)?;
                self.group(target)?;
                Some(DragAction::GroupReorder {
                    moved: moved.clone(),
                    target: target.clone(),
                })
            }
            (DragItem::Entry(moved), DragItem::Entry(target)) => {
                let moved_parent = self.entry(moved)?.parent_id.clone();
                let target_parent = self.entry(target)?.parent_id.clone();
                if moved_parent == target_parent {
                    Some(DragAction::EntryReorderSameParent {
                        group: moved_parent,
                        moved: moved.clone(),
                        target: target.clone(),
                    })
                } else {
                    Some(DragAction::EntryReparent {
                        entry: moved.clone(),
                        target_entry: target.clone(),
                        dest: target_parent,
                    })
                }
            }
            (DragItem::Entry(entry), DragItem::Group(dest)) => {
                let current = self.entry(entry)?;
                if !self.has_group(dest.as_deref()) || current.parent_id == *dest {
                    return None;
                }
                Some(DragAction::EntryDropOnGroup {
                    entry: entry.clone(),
                    dest: dest.clone(),
                })
            }
            _ => None,
        }
    }

    /// Applies one resolved move.
    pub fn apply_action(&mut self, action: &DragAction) -> Result<MoveOutcome, OrganizerError> {
        match action {
            DragAction::GroupReorder { moved, target } => self.reorder_groups(moved, target),
            DragAction::EntryReorderSameParent {
                group,
                moved,
                target,
            } => self.reorder_entries_within_group(group.as_deref(), moved, target),
            DragAction::EntryReparent {
                entry,
                target_entry,
                ..
            } => self.move_entry_before(entry, target_entry),
            DragAction::EntryDropOnGroup { entry, dest } => {
                self.move_entry_to_group(entry, dest.as_deref())
            }
        }
    }

    /// Resolves and applies a released drag.
    pub fn apply_drop(
        &mut self,
        source: &DragItem,
        target: &DragItem,
    ) -> Result<MoveOutcome, OrganizerError> {
        self.ensure_idle()?;
        match self.resolve_drop(source, target) {
            Some(action) => self.apply_action(&action),
            None => {
                debug!("event=drag_drop module=organizer status=ignored");
                Ok(MoveOutcome::Ignored)
            }
        }
    }
}
