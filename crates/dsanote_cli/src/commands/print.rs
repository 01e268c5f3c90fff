use super::Session;
use crate::cli::PrintArgs;
use anyhow::Result;
use dsanote_core::render_text;

pub fn run(args: &PrintArgs, session: &Session) -> Result<()> {
    let store = session.store()?;
    let organizer = session.organizer(&store)?;
    let pages = organizer.flatten_for_print();
    if args.text {
        print!("{}", render_text(&pages));
        return Ok(());
    }
    for page in &pages {
        println!(
            "{:>4}  {}\t{}\t{}",
            page.page_number,
            page.group_name,
            page.entry.id,
            page.entry.title()
        );
    }
    Ok(())
}
