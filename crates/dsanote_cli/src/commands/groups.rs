use super::Session;
use crate::cli::GroupsCommand;
use anyhow::Result;
use dsanote_core::OrderStore;

pub fn run(command: GroupsCommand, session: &Session) -> Result<()> {
    let store = session.store()?;
    match command {
        GroupsCommand::Add { name } => {
            let mut organizer = session.organizer(&store)?;
            let group = organizer.add_group(&store, &name)?;
            println!("created folder {} ({})", group.name, group.id);
        }
        GroupsCommand::List => {
            for group in store.list_groups()? {
                println!("{}\t{}\t{}", group.id, group.print_order, group.name);
            }
        }
    }
    Ok(())
}
