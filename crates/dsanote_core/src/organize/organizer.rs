//! Organizer aggregate and its operations.

use crate::config::{OrganizerConfig, UnorganizedPosition};
use crate::model::entry::{Entry, EntryId};
use crate::model::group::{parse_parent_ref, Group, GroupId, UNORGANIZED_ID, UNORGANIZED_NAME};
use crate::model::placement::{
    EntryPlacement, GroupPlacement, ResetReport, SaveBatch, SaveReport,
};
use crate::print::{paginate, PrintPage, PrintSection};
use crate::repo::order_repo::{OrderStore, StoreError};
use log::{debug, error, info, warn};
use std::collections::{BTreeSet, HashMap, HashSet};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Whether an operation changed organizer state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveOutcome {
    Applied,
    /// Stale or self-referencing input; state is unchanged.
    Ignored,
}

/// Errors surfaced to the caller by organizer operations.
#[derive(Debug)]
pub enum OrganizerError {
    /// Folder name is blank after trim.
    BlankGroupName,
    /// Bulk move requested with no selected entries.
    EmptySelection,
    /// Bulk move requested with no destination folder picked.
    NoDestination,
    /// A save is in flight; structural changes are rejected until it settles.
    SaveInProgress,
    /// Persistence collaborator failed.
    Store(StoreError),
}

impl OrganizerError {
    /// True for input problems the user can fix without retrying storage.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::BlankGroupName | Self::EmptySelection | Self::NoDestination
        )
    }
}

impl Display for OrganizerError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::BlankGroupName => write!(f, "folder name must not be blank"),
            Self::EmptySelection => write!(f, "select at least one entry to move"),
            Self::NoDestination => write!(f, "select a destination folder"),
            Self::SaveInProgress => write!(f, "a save is already in progress"),
            Self::Store(err) => write!(f, "{err}"),
        }
    }
}

impl Error for OrganizerError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Store(err) => Some(err),
            _ => None,
        }
    }
}

impl From<StoreError> for OrganizerError {
    fn from(value: StoreError) -> Self {
        Self::Store(value)
    }
}

/// One folder as presented to the user, entries in display order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupView<'a> {
    /// `None` for the virtual "unorganized" folder.
    pub id: Option<&'a str>,
    pub name: &'a str,
    pub entries: Vec<&'a Entry>,
}

/// Owned state of one print-organization session.
#[derive(Debug, Default)]
pub struct Organizer {
    config: OrganizerConfig,
    groups: Vec<Group>,
    entries: Vec<Entry>,
    selection: BTreeSet<EntryId>,
    move_destination: Option<GroupId>,
    save_in_progress: bool,
}

impl Organizer {
    pub fn new(config: OrganizerConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    pub fn config(&self) -> OrganizerConfig {
        self.config
    }

    /// Real folders in display order.
    pub fn groups(&self) -> &[Group] {
        &self.groups
    }

    /// Session sequence of entries.
    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    pub fn entry(&self, id: &str) -> Option<&Entry> {
        self.entries.iter().find(|entry| entry.id == id)
    }

    pub fn group(&self, id: &str) -> Option<&Group> {
        self.groups.iter().find(|group| group.id == id)
    }

    pub fn is_save_in_progress(&self) -> bool {
        self.save_in_progress
    }

    /// Returns whether `group_id` names the virtual folder or a loaded folder.
    pub fn has_group(&self, group_id: Option<&str>) -> bool {
        match group_id {
            None => true,
            Some(id) => self.group(id).is_some(),
        }
    }

    /// Entries of one folder in display order.
    pub fn entries_in(&self, group_id: Option<&str>) -> Vec<&Entry> {
        self.entries
            .iter()
            .filter(|entry| entry.in_group(group_id))
            .collect()
    }

    /// Presentation list: the virtual folder first, then real folders.
    pub fn group_views(&self) -> Vec<GroupView<'_>> {
        let mut views = Vec::with_capacity(self.groups.len() + 1);
        views.push(GroupView {
            id: None,
            name: UNORGANIZED_NAME,
            entries: self.entries_in(None),
        });
        views.extend(self.groups.iter().map(|group| GroupView {
            id: Some(group.id.as_str()),
            name: group.name.as_str(),
            entries: self.entries_in(Some(group.id.as_str())),
        }));
        views
    }

    /// Replaces session state with a store snapshot.
    ///
    /// Folders and entries are stable-sorted by `print_order`, so ties keep
    /// the order the snapshot delivered them in. Entries pointing at a folder
    /// missing from the snapshot fall back to the virtual folder.
    pub fn load_snapshot(
        &mut self,
        mut groups: Vec<Group>,
        mut entries: Vec<Entry>,
    ) -> Result<(), OrganizerError> {
        self.ensure_idle()?;

        groups.retain(|group| group.id != UNORGANIZED_ID);
        groups.sort_by_key(|group| group.print_order);
        entries.sort_by_key(|entry| entry.print_order);

        let known: HashSet<&str> = groups.iter().map(|group| group.id.as_str()).collect();
        let mut dangling = 0usize;
        for entry in &mut entries {
            if let Some(parent_id) = entry.parent_id.as_deref() {
                if !known.contains(parent_id) {
                    entry.parent_id = None;
                    dangling += 1;
                }
            }
        }
        if dangling > 0 {
            warn!("event=load_snapshot module=organizer status=repaired dangling_parents={dangling}");
        }

        info!(
            "event=load_snapshot module=organizer status=ok groups={} entries={}",
            groups.len(),
            entries.len()
        );
        self.groups = groups;
        self.entries = entries;
        self.selection.clear();
        self.move_destination = None;
        Ok(())
    }

    /// Reloads state from the store. On failure the session is left empty.
    pub fn reload(&mut self, store: &impl OrderStore) -> Result<(), OrganizerError> {
        self.ensure_idle()?;
        let snapshot = store
            .list_groups()
            .and_then(|groups| Ok((groups, store.list_entries()?)));
        match snapshot {
            Ok((groups, entries)) => self.load_snapshot(groups, entries),
            Err(err) => {
                error!("event=load_snapshot module=organizer status=error error={err}");
                self.groups.clear();
                self.entries.clear();
                self.selection.clear();
                self.move_destination = None;
                Err(err.into())
            }
        }
    }

    /// Creates a folder and persists it immediately.
    ///
    /// The new folder goes last with `print_order` equal to the number of
    /// folders before it.
    pub fn add_group(
        &mut self,
        store: &impl OrderStore,
        name: &str,
    ) -> Result<Group, OrganizerError> {
        self.ensure_idle()?;
        let name = name.trim();
        if name.is_empty() {
            warn!("event=add_group module=organizer status=rejected reason=blank_name");
            return Err(OrganizerError::BlankGroupName);
        }

        let group = Group::new(name, self.groups.len() as i64);
        let stored = store.create_group(&group).map_err(|err| {
            error!("event=add_group module=organizer status=error error={err}");
            OrganizerError::from(err)
        })?;
        info!(
            "event=add_group module=organizer status=ok group_id={} print_order={}",
            stored.id, stored.print_order
        );
        self.groups.push(stored.clone());
        Ok(stored)
    }

    /// Moves folder `moved_id` to where `target_id` sits.
    pub fn reorder_groups(
        &mut self,
        moved_id: &str,
        target_id: &str,
    ) -> Result<MoveOutcome, OrganizerError> {
        self.ensure_idle()?;
        if moved_id == target_id || moved_id == UNORGANIZED_ID || target_id == UNORGANIZED_ID {
            return Ok(ignored("reorder_groups"));
        }
        let from = self.groups.iter().position(|group| group.id == moved_id);
        let to = self.groups.iter().position(|group| group.id == target_id);
        let (Some(from), Some(to)) = (from, to) else {
            return Ok(ignored("reorder_groups"));
        };
        array_move(&mut self.groups, from, to);
        debug!("event=reorder_groups module=organizer status=ok from={from} to={to}");
        Ok(MoveOutcome::Applied)
    }

    /// Moves entry `moved_id` to where `target_id` sits inside one folder.
    ///
    /// Only the sequence slots held by that folder's entries are rewritten,
    /// so every other folder keeps its members and their relative order.
    pub fn reorder_entries_within_group(
        &mut self,
        group_id: Option<&str>,
        moved_id: &str,
        target_id: &str,
    ) -> Result<MoveOutcome, OrganizerError> {
        self.ensure_idle()?;
        if moved_id == target_id {
            return Ok(ignored("reorder_entries"));
        }

        let slots: Vec<usize> = self
            .entries
            .iter()
            .enumerate()
            .filter(|(_, entry)| entry.in_group(group_id))
            .map(|(index, _)| index)
            .collect();
        let find = |id: &str| slots.iter().position(|&slot| self.entries[slot].id == id);
        let (Some(from), Some(to)) = (find(moved_id), find(target_id)) else {
            return Ok(ignored("reorder_entries"));
        };

        let mut members: Vec<Entry> = slots.iter().map(|&slot| self.entries[slot].clone()).collect();
        array_move(&mut members, from, to);
        for (slot, entry) in slots.into_iter().zip(members) {
            self.entries[slot] = entry;
        }
        debug!("event=reorder_entries module=organizer status=ok from={from} to={to}");
        Ok(MoveOutcome::Applied)
    }

    /// Reparents one entry, appending it after the destination's members.
    ///
    /// `print_order` is left alone; it is re-derived at save time.
    pub fn move_entry_to_group(
        &mut self,
        entry_id: &str,
        dest_group_id: Option<&str>,
    ) -> Result<MoveOutcome, OrganizerError> {
        self.ensure_idle()?;
        if !self.has_group(dest_group_id) {
            return Ok(ignored("move_entry"));
        }
        let Some(index) = self.entries.iter().position(|entry| entry.id == entry_id) else {
            return Ok(ignored("move_entry"));
        };
        if self.entries[index].in_group(dest_group_id) {
            return Ok(ignored("move_entry"));
        }

        let mut entry = self.entries.remove(index);
        entry.parent_id = dest_group_id.map(str::to_string);
        self.entries.push(entry);
        debug!("event=move_entry module=organizer status=ok");
        Ok(MoveOutcome::Applied)
    }

    /// Reparents `entry_id` into the folder of `target_entry_id`, placing it
    /// right before the target.
    pub(super) fn move_entry_before(
        &mut self,
        entry_id: &str,
        target_entry_id: &str,
    ) -> Result<MoveOutcome, OrganizerError> {
        self.ensure_idle()?;
        if entry_id == target_entry_id {
            return Ok(ignored("reparent_entry"));
        }
        let Some(from) = self.entries.iter().position(|entry| entry.id == entry_id) else {
            return Ok(ignored("reparent_entry"));
        };
        let mut entry = self.entries.remove(from);
        let Some(to) = self
            .entries
            .iter()
            .position(|candidate| candidate.id == target_entry_id)
        else {
            self.entries.insert(from, entry);
            return Ok(ignored("reparent_entry"));
        };
        entry.parent_id = self.entries[to].parent_id.clone();
        self.entries.insert(to, entry);
        debug!("event=reparent_entry module=organizer status=ok");
        Ok(MoveOutcome::Applied)
    }

    /// Moves every listed entry into one folder.
    ///
    /// `destination` is the picked folder id; `None` or a blank id means
    /// nothing was picked. Moved entries are appended in their current
    /// relative order; selected entries already in the destination keep
    /// their place. The selection is cleared when anything moved.
    pub fn move_selected_entries(
        &mut self,
        entry_ids: &BTreeSet<EntryId>,
        destination: Option<&str>,
    ) -> Result<MoveOutcome, OrganizerError> {
        self.ensure_idle()?;
        let destination = match destination {
            Some(raw) if !raw.trim().is_empty() => parse_parent_ref(raw),
            _ => {
                warn!("event=move_selected module=organizer status=rejected reason=no_destination");
                return Err(OrganizerError::NoDestination);
            }
        };
        if entry_ids.is_empty() {
            warn!("event=move_selected module=organizer status=rejected reason=empty_selection");
            return Err(OrganizerError::EmptySelection);
        }
        if !self.has_group(destination.as_deref()) {
            return Ok(ignored("move_selected"));
        }

        let dest = destination.as_deref();
        let (mut moving, staying): (Vec<Entry>, Vec<Entry>) = std::mem::take(&mut self.entries)
            .into_iter()
            .partition(|entry| entry_ids.contains(&entry.id) && !entry.in_group(dest));
        self.entries = staying;
        if moving.is_empty() {
            return Ok(ignored("move_selected"));
        }

        let moved = moving.len();
        for entry in &mut moving {
            entry.parent_id = destination.clone();
        }
        self.entries.extend(moving);
        self.selection.clear();
        info!("event=move_selected module=organizer status=ok moved={moved}");
        Ok(MoveOutcome::Applied)
    }

    /// Runs [`Self::move_selected_entries`] with the current selection and
    /// picked destination.
    pub fn move_selection(&mut self) -> Result<MoveOutcome, OrganizerError> {
        let selection = self.selection.clone();
        let destination = self.move_destination.clone();
        self.move_selected_entries(&selection, destination.as_deref())
    }

    /// Picks the bulk-move destination. Only real folders can be picked.
    pub fn set_move_destination(&mut self, group_id: Option<&str>) -> MoveOutcome {
        match group_id {
            Some(id) if self.group(id).is_some() => {
                self.move_destination = Some(id.to_string());
                MoveOutcome::Applied
            }
            Some(_) => MoveOutcome::Ignored,
            None => {
                self.move_destination = None;
                MoveOutcome::Applied
            }
        }
    }

    pub fn move_destination(&self) -> Option<&str> {
        self.move_destination.as_deref()
    }

    pub fn selection(&self) -> &BTreeSet<EntryId> {
        &self.selection
    }

    /// Flips selection of one entry and returns whether it is now selected.
    /// Unknown ids are ignored.
    pub fn toggle_selection(&mut self, entry_id: &str) -> bool {
        if self.entry(entry_id).is_none() {
            return false;
        }
        if self.selection.remove(entry_id) {
            false
        } else {
            self.selection.insert(entry_id.to_string());
            true
        }
    }

    /// Sets selection of one entry explicitly. Unknown ids are ignored.
    pub fn set_selected(&mut self, entry_id: &str, selected: bool) {
        if selected {
            if self.entry(entry_id).is_some() {
                self.selection.insert(entry_id.to_string());
            }
        } else {
            self.selection.remove(entry_id);
        }
    }

    pub fn clear_selection(&mut self) {
        self.selection.clear();
    }

    /// Derives the bulk placement update from current display order.
    ///
    /// Folders are numbered by position; entries are numbered `0..k` within
    /// their folder, ignoring whatever `print_order` they carried.
    pub fn compute_save_batch(&self) -> SaveBatch {
        let groups = self
            .groups
            .iter()
            .enumerate()
            .map(|(index, group)| GroupPlacement {
                id: group.id.clone(),
                print_order: index as i64,
            })
            .collect();

        let mut next_order: HashMap<Option<&str>, i64> = HashMap::new();
        let entries = self
            .entries
            .iter()
            .map(|entry| {
                let counter = next_order.entry(entry.parent_id.as_deref()).or_insert(0);
                let print_order = *counter;
                *counter += 1;
                EntryPlacement {
                    id: entry.id.clone(),
                    print_order,
                    parent_id: entry.parent_id.clone(),
                }
            })
            .collect();

        SaveBatch { groups, entries }
    }

    /// First half of a save: computes the batch and raises the save guard.
    pub fn begin_save(&mut self) -> Result<SaveBatch, OrganizerError> {
        self.ensure_idle()?;
        self.save_in_progress = true;
        Ok(self.compute_save_batch())
    }

    /// Settles a successful save: adopts the batch numbering for every record
    /// the store wrote and lowers the guard.
    ///
    /// Records listed as missing or orphaned in `report` keep their previous
    /// `print_order`, matching what storage still holds.
    pub fn commit_save(&mut self, batch: &SaveBatch, report: &SaveReport) {
        let skipped_groups: HashSet<&str> =
            report.missing_groups.iter().map(String::as_str).collect();
        let group_orders: HashMap<&str, i64> = batch
            .groups
            .iter()
            .filter(|placement| !skipped_groups.contains(placement.id.as_str()))
            .map(|placement| (placement.id.as_str(), placement.print_order))
            .collect();
        for group in &mut self.groups {
            if let Some(order) = group_orders.get(group.id.as_str()) {
                group.print_order = *order;
            }
        }

        let skipped_entries: HashSet<&str> = report
            .missing_entries
            .iter()
            .chain(&report.orphaned_entries)
            .map(String::as_str)
            .collect();
        let entry_orders: HashMap<&str, i64> = batch
            .entries
            .iter()
            .filter(|placement| !skipped_entries.contains(placement.id.as_str()))
            .map(|placement| (placement.id.as_str(), placement.print_order))
            .collect();
        for entry in &mut self.entries {
            if let Some(order) = entry_orders.get(entry.id.as_str()) {
                entry.print_order = *order;
            }
        }
        self.save_in_progress = false;
    }

    /// Settles a failed save: state is untouched, the guard is lowered.
    pub fn abort_save(&mut self) {
        self.save_in_progress = false;
    }

    /// Persists current display order as one bulk update.
    pub fn save(&mut self, store: &impl OrderStore) -> Result<SaveReport, OrganizerError> {
        let batch = self.begin_save()?;
        match store.apply_save_batch(&batch) {
            Ok(report) => {
                self.commit_save(&batch, &report);
                info!(
                    "event=save_order module=organizer status=ok groups={} entries={}",
                    batch.groups.len(),
                    batch.entries.len()
                );
                Ok(report)
            }
            Err(err) => {
                self.abort_save();
                error!("event=save_order module=organizer status=error error={err}");
                Err(err.into())
            }
        }
    }

    /// Deletes all folders, returns every entry to the virtual folder, then
    /// reloads. Irreversible.
    pub fn reset_all(&mut self, store: &impl OrderStore) -> Result<ResetReport, OrganizerError> {
        self.ensure_idle()?;
        let report = store.reset_order().map_err(|err| {
            error!("event=reset_order module=organizer status=error error={err}");
            OrganizerError::from(err)
        })?;
        self.reload(store)?;
        info!(
            "event=reset_order module=organizer status=ok entries={} groups_deleted={}",
            report.entries_reset, report.groups_deleted
        );
        Ok(report)
    }

    /// Linear print sequence of the current display order, 1-based pages.
    ///
    /// Derived on every call; callers must not hold on to it across moves.
    pub fn flatten_for_print(&self) -> Vec<PrintPage<'_>> {
        let mut sections: Vec<PrintSection<'_>> = self
            .group_views()
            .into_iter()
            .map(|view| PrintSection {
                group_id: view.id,
                group_name: view.name,
                entries: view.entries,
            })
            .collect();
        if self.config.unorganized_position == UnorganizedPosition::Last {
            sections.rotate_left(1);
        }
        paginate(sections)
    }

    pub(super) fn ensure_idle(&self) -> Result<(), OrganizerError> {
        if self.save_in_progress {
            debug!("event=mutation module=organizer status=rejected reason=save_in_progress");
            return Err(OrganizerError::SaveInProgress);
        }
        Ok(())
    }
}

fn ignored(operation: &str) -> MoveOutcome {
    debug!("event={operation} module=organizer status=ignored reason=stale_or_self_reference");
    MoveOutcome::Ignored
}

/// Removes the item at `from` and reinserts it at `to`.
fn array_move<T>(items: &mut Vec<T>, from: usize, to: usize) {
    let item = items.remove(from);
    items.insert(to, item);
}
