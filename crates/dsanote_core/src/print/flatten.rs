use crate::config::UnorganizedPosition;
use crate::model::entry::Entry;
use crate::model::group::{Group, UNORGANIZED_NAME};
use log::debug;
use std::collections::HashSet;

/// One folder's entries in print order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrintSection<'a> {
    /// `None` for the virtual "unorganized" folder.
    pub group_id: Option<&'a str>,
    pub group_name: &'a str,
    pub entries: Vec<&'a Entry>,
}

/// Render-ready descriptor of one printed page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PrintPage<'a> {
    /// 1-based.
    pub page_number: usize,
    pub group_id: Option<&'a str>,
    pub group_name: &'a str,
    pub entry: &'a Entry,
}

/// Concatenates sections in order and numbers pages from 1.
pub fn paginate(sections: Vec<PrintSection<'_>>) -> Vec<PrintPage<'_>> {
    let pages: Vec<PrintPage<'_>> = sections
        .into_iter()
        .flat_map(|section| {
            let group_id = section.group_id;
            let group_name = section.group_name;
            section
                .entries
                .into_iter()
                .map(move |entry| (group_id, group_name, entry))
        })
        .enumerate()
        .map(|(index, (group_id, group_name, entry))| PrintPage {
            page_number: index + 1,
            group_id,
            group_name,
            entry,
        })
        .collect();
    debug!("event=paginate module=print status=ok pages={}", pages.len());
    pages
}

/// Flattens stored folders and entries into print order.
///
/// Folders are taken in slice order. Inside each folder entries are
/// stable-sorted by `print_order`, so ties keep slice order. Entries whose
/// folder is not in `groups` print with the virtual folder.
pub fn flatten<'a>(
    groups: &'a [Group],
    entries: &'a [Entry],
    position: UnorganizedPosition,
) -> Vec<PrintPage<'a>> {
    let known: HashSet<&str> = groups.iter().map(|group| group.id.as_str()).collect();
    let sorted_members = |matches: &dyn Fn(&Entry) -> bool| {
        let mut members: Vec<&'a Entry> = entries.iter().filter(|entry| matches(entry)).collect();
        members.sort_by_key(|entry| entry.print_order);
        members
    };

    let unorganized = PrintSection {
        group_id: None,
        group_name: UNORGANIZED_NAME,
        entries: sorted_members(&|entry: &Entry| match entry.parent_id.as_deref() {
            None => true,
            Some(parent_id) => !known.contains(parent_id),
        }),
    };
    let folders = groups.iter().map(|group| PrintSection {
        group_id: Some(group.id.as_str()),
        group_name: group.name.as_str(),
        entries: sorted_members(&|entry: &Entry| entry.in_group(Some(group.id.as_str()))),
    });

    let sections = match position {
        UnorganizedPosition::First => std::iter::once(unorganized).chain(folders).collect(),
        UnorganizedPosition::Last => folders.chain(std::iter::once(unorganized)).collect(),
    };
    paginate(sections)
}
