use super::Session;
use crate::cli::{AddEntryArgs, ContentArgs, EntriesCommand, UpdateEntryArgs};
use anyhow::{Context, Result};
use dsanote_core::model::group::{parent_ref_label, parse_parent_ref};
use dsanote_core::{EntryContent, EntryPatch, EntryService, NewEntry};
use std::io::Read;

pub fn run(command: EntriesCommand, session: &Session) -> Result<()> {
    let service = EntryService::new(session.store()?);
    match command {
        EntriesCommand::Add(args) => {
            let entry = service.create_entry(&new_entry(args))?;
            println!("created {} (row {})", entry.id, entry.row_id);
        }
        EntriesCommand::Update(args) => {
            let id = args.id.clone();
            let patch = entry_patch(args);
            if patch.is_empty() {
                println!("nothing to update for {id}");
                return Ok(());
            }
            let entry = service.update_entry(&id, patch)?;
            println!("updated {}", entry.id);
        }
        EntriesCommand::Show { id } => {
            let entry = service
                .get_entry(&id)?
                .with_context(|| format!("entry not found: {id}"))?;
            println!("{}", serde_json::to_string_pretty(&entry)?);
        }
        EntriesCommand::List { json } => {
            let entries = service.list_entries()?;
            if json {
                println!("{}", serde_json::to_string_pretty(&entries)?);
            } else {
                for entry in &entries {
                    println!(
                        "{}\t{}\t{}\t{}",
                        entry.id,
                        parent_ref_label(entry.parent_id.as_deref()),
                        entry.print_order,
                        entry.title()
                    );
                }
            }
        }
        EntriesCommand::Export { out } => {
            let json = service.export_entries()?;
            match out {
                Some(path) => std::fs::write(&path, json)
                    .with_context(|| format!("failed to write `{}`", path.display()))?,
                None => println!("{json}"),
            }
        }
        EntriesCommand::Import { file } => {
            let json = read_input(&file)?;
            let report = service.import_entries(&json)?;
            println!(
                "imported: groups_created={} groups_updated={} created={} updated={}",
                report.groups_created, report.groups_updated, report.created, report.updated
            );
        }
    }
    Ok(())
}

fn read_input(file: &str) -> Result<String> {
    if file == "-" {
        let mut buffer = String::new();
        std::io::stdin()
            .read_to_string(&mut buffer)
            .context("failed to read stdin")?;
        return Ok(buffer);
    }
    std::fs::read_to_string(file).with_context(|| format!("failed to read `{file}`"))
}

fn new_entry(args: AddEntryArgs) -> NewEntry {
    let mut content = EntryContent::titled(args.title);
    fill_content(&mut content, args.fields);
    let mut entry = match args.id {
        Some(id) => NewEntry::with_id(id, content),
        None => NewEntry::new(content),
    };
    entry.parent_id = args.group.as_deref().and_then(parse_parent_ref);
    entry.print_order = args.order.unwrap_or(0);
    entry
}

fn fill_content(content: &mut EntryContent, fields: ContentArgs) {
    let patch = content_patch(fields);
    content.intuition = patch.intuition.unwrap_or_default();
    content.approach = patch.approach.unwrap_or_default();
    content.dry_run = patch.dry_run.unwrap_or_default();
    content.time_complexity = patch.time_complexity.unwrap_or_default();
    content.space_complexity = patch.space_complexity.unwrap_or_default();
    content.quick_revision = patch.quick_revision.unwrap_or_default();
    content.code = patch.code.unwrap_or_default();
    content.tags = patch.tags.unwrap_or_default();
    content.images = patch.images.unwrap_or_default();
}

fn entry_patch(args: UpdateEntryArgs) -> EntryPatch {
    let mut patch = content_patch(args.fields);
    patch.title = args.title;
    patch.parent_id = args.group.as_deref().map(parse_parent_ref);
    patch.print_order = args.order;
    patch
}

/// Empty repeatable flags leave list fields unchanged.
fn content_patch(fields: ContentArgs) -> EntryPatch {
    let list = |values: Vec<String>| (!values.is_empty()).then_some(values);
    EntryPatch {
        intuition: fields.intuition,
        approach: list(fields.approach),
        dry_run: fields.dry_run,
        time_complexity: fields.time_complexity,
        space_complexity: fields.space_complexity,
        quick_revision: list(fields.quick_revision),
        code: fields.code,
        tags: list(fields.tags),
        images: list(fields.images),
        ..EntryPatch::default()
    }
}
