use super::Session;
use crate::cli::OrganizeCommand;
use anyhow::{bail, Result};
use dsanote_core::model::group::UNORGANIZED_ID;
use dsanote_core::{MoveOutcome, Organizer, SaveReport, SqliteOrderStore};
use log::info;

pub fn run(command: OrganizeCommand, session: &Session) -> Result<()> {
    let store = session.store()?;
    let mut organizer = session.organizer(&store)?;
    match command {
        OrganizeCommand::Show => show(&organizer),
        OrganizeCommand::SelectMove { to, ids } => {
            for id in &ids {
                organizer.set_selected(id, true);
            }
            if let Some(to) = to.as_deref() {
                if organizer.set_move_destination(Some(to)) == MoveOutcome::Ignored {
                    eprintln!("note: `{to}` is not a folder you can move entries into");
                }
            }
            match organizer.move_selection()? {
                MoveOutcome::Applied => save(&mut organizer, &store)?,
                MoveOutcome::Ignored => eprintln!("note: no matching entries; nothing moved"),
            }
        }
        OrganizeCommand::Drag { source, target } => {
            organizer.start_drag(&source)?;
            match organizer.apply_drop(&source, &target)? {
                MoveOutcome::Applied => save(&mut organizer, &store)?,
                MoveOutcome::Ignored => eprintln!("note: drop ignored; nothing changed"),
            }
        }
        OrganizeCommand::Save => save(&mut organizer, &store)?,
        OrganizeCommand::Reset { yes } => {
            if !yes {
                bail!("reset deletes every folder and cannot be undone; pass --yes to confirm");
            }
            let report = organizer.reset_all(&store)?;
            println!(
                "reset: entries={} folders_deleted={}",
                report.entries_reset, report.groups_deleted
            );
        }
    }
    Ok(())
}

fn show(organizer: &Organizer) {
    for view in organizer.group_views() {
        println!("{} ({})", view.name, view.id.unwrap_or(UNORGANIZED_ID));
        for (position, entry) in view.entries.iter().enumerate() {
            println!("  {}. {}\t{}", position + 1, entry.id, entry.title());
        }
    }
}

fn save(organizer: &mut Organizer, store: &SqliteOrderStore<'_>) -> Result<()> {
    let report = organizer.save(store)?;
    print_report(&report);
    info!(
        "event=cli_save module=cli status=ok complete={}",
        report.is_complete()
    );
    Ok(())
}

fn print_report(report: &SaveReport) {
    println!(
        "saved: folders={} entries={}",
        report.groups_updated, report.entries_updated
    );
    for id in &report.missing_groups {
        eprintln!("warning: folder {id} no longer exists; skipped");
    }
    for id in &report.missing_entries {
        eprintln!("warning: entry {id} no longer exists; skipped");
    }
    for id in &report.orphaned_entries {
        eprintln!("warning: entry {id} points at a deleted folder; skipped");
    }
}
