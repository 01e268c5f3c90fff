use clap::{Args, Parser, Subcommand};
use dsanote_core::model::group::parse_parent_ref;
use dsanote_core::DragItem;
use std::path::PathBuf;

/// dsanote - arrange DSA study notes into folders and print them in order
#[derive(Debug, Parser)]
#[command(name = "dsanote", version)]
#[command(propagate_version = true)]
pub struct Cli {
    /// SQLite database file
    #[arg(long, global = true, env = "DSANOTE_DB_PATH", value_name = "PATH")]
    pub db: Option<String>,

    /// Write rotating log files into this directory
    #[arg(long, global = true, env = "DSANOTE_LOG_DIR", value_name = "DIR")]
    pub log_dir: Option<String>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, global = true, env = "DSANOTE_LOG_LEVEL", value_name = "LEVEL")]
    pub log_level: Option<String>,

    /// Print unorganized entries before every folder
    #[arg(long, global = true)]
    pub unorganized_first: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Create, edit and back up study entries
    #[command(subcommand)]
    Entries(EntriesCommand),

    /// Create and list print folders
    #[command(subcommand)]
    Groups(GroupsCommand),

    /// Rearrange folders and entries for printing
    #[command(subcommand)]
    Organize(OrganizeCommand),

    /// Show the print sequence
    Print(PrintArgs),

    /// Show version information
    Version,
}

#[derive(Debug, Subcommand)]
pub enum EntriesCommand {
    /// Add a new entry
    Add(AddEntryArgs),
    /// Replace fields of an existing entry
    Update(UpdateEntryArgs),
    /// Show one entry as JSON
    Show {
        #[arg(value_name = "ID")]
        id: String,
    },
    /// List entries in stored order
    List {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Write every folder and entry as a JSON backup
    Export {
        /// Output file (defaults to stdout)
        #[arg(long, value_name = "FILE")]
        out: Option<PathBuf>,
    },
    /// Restore folders and entries from a JSON backup
    Import {
        /// Backup file, or `-` for stdin
        #[arg(value_name = "FILE")]
        file: String,
    },
}

#[derive(Debug, Subcommand)]
pub enum GroupsCommand {
    /// Create a folder at the end of the folder list
    Add {
        #[arg(value_name = "NAME")]
        name: String,
    },
    /// List folders in print order
    List,
}

#[derive(Debug, Subcommand)]
pub enum OrganizeCommand {
    /// Show folders and their entries in display order
    Show,
    /// Move several entries into one folder and save
    SelectMove {
        /// Destination folder id
        #[arg(long, value_name = "GROUP")]
        to: Option<String>,
        /// Entries to move
        #[arg(value_name = "ID")]
        ids: Vec<String>,
    },
    /// Drop one item onto another and save
    ///
    /// Items are written `entry:<id>` or `group:<id>`; `group:unorganized`
    /// names the virtual folder.
    Drag {
        #[arg(value_name = "SOURCE", value_parser = parse_drag_item)]
        source: DragItem,
        #[arg(value_name = "TARGET", value_parser = parse_drag_item)]
        target: DragItem,
    },
    /// Renumber stored order from the current display order
    Save,
    /// Delete every folder and return all entries to unorganized
    Reset {
        /// Confirm the irreversible reset
        #[arg(long)]
        yes: bool,
    },
}

#[derive(Debug, Args)]
pub struct PrintArgs {
    /// Render the full plain-text print sheet
    #[arg(long)]
    pub text: bool,
}

#[derive(Debug, Args)]
pub struct AddEntryArgs {
    /// Client id (random when omitted)
    #[arg(long)]
    pub id: Option<String>,

    #[arg(long)]
    pub title: String,

    /// Folder id; `unorganized` or omitted means no folder
    #[arg(long, value_name = "GROUP")]
    pub group: Option<String>,

    #[arg(long, value_name = "N")]
    pub order: Option<i64>,

    #[command(flatten)]
    pub fields: ContentArgs,
}

#[derive(Debug, Args)]
pub struct UpdateEntryArgs {
    #[arg(value_name = "ID")]
    pub id: String,

    #[arg(long)]
    pub title: Option<String>,

    /// Folder id; `unorganized` moves the entry out of its folder
    #[arg(long, value_name = "GROUP")]
    pub group: Option<String>,

    #[arg(long, value_name = "N")]
    pub order: Option<i64>,

    #[command(flatten)]
    pub fields: ContentArgs,
}

/// Optional study content fields shared by add and update.
#[derive(Debug, Default, Args)]
pub struct ContentArgs {
    #[arg(long)]
    pub intuition: Option<String>,

    /// Approach step (repeatable)
    #[arg(long = "approach", value_name = "STEP")]
    pub approach: Vec<String>,

    #[arg(long)]
    pub dry_run: Option<String>,

    #[arg(long = "time", value_name = "BIG_O")]
    pub time_complexity: Option<String>,

    #[arg(long = "space", value_name = "BIG_O")]
    pub space_complexity: Option<String>,

    /// Quick revision point (repeatable)
    #[arg(long = "revision", value_name = "POINT")]
    pub quick_revision: Vec<String>,

    #[arg(long)]
    pub code: Option<String>,

    /// Tag (repeatable)
    #[arg(long = "tag", value_name = "TAG")]
    pub tags: Vec<String>,

    /// Image URL or data URI (repeatable)
    #[arg(long = "image", value_name = "REF")]
    pub images: Vec<String>,
}

fn parse_drag_item(raw: &str) -> Result<DragItem, String> {
    let (kind, id) = raw
        .split_once(':')
        .ok_or_else(|| format!("expected `entry:<id>` or `group:<id>`, got `{raw}`"))?;
    match kind {
        "entry" if !id.trim().is_empty() => Ok(DragItem::Entry(id.trim().to_string())),
        "group" => Ok(DragItem::Group(parse_parent_ref(id))),
        _ => Err(format!(
            "expected `entry:<id>` or `group:<id>`, got `{raw}`"
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn command_tree_is_well_formed() {
        Cli::command().debug_assert();
    }

    #[test]
    fn drag_items_parse_both_kinds() {
        assert_eq!(
            parse_drag_item("entry:two-sum"),
            Ok(DragItem::Entry("two-sum".to_string()))
        );
        assert_eq!(
            parse_drag_item("group:g1"),
            Ok(DragItem::Group(Some("g1".to_string())))
        );
        assert_eq!(parse_drag_item("group:unorganized"), Ok(DragItem::Group(None)));
        assert!(parse_drag_item("entry:").is_err());
        assert!(parse_drag_item("folder:g1").is_err());
        assert!(parse_drag_item("two-sum").is_err());
    }
}
