use clap::Subcommand;
use colored::Colorize;
use wedge_lib::{KeyValueStore, Notice, RowEdit, RowId, Session, ValueDomain};

use crate::chart::swatch;

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// List rows
    List,
    /// Add a new row
    Add,
    /// Remove a row
    Remove { id: RowId },
    /// Change one or more fields of a row
    Set {
        id: RowId,
        #[arg(long)]
        label: Option<String>,
        /// Numbers are clamped into the row's domain
        #[arg(long, allow_hyphen_values = true)]
        value: Option<String>,
        #[arg(long)]
        color: Option<String>,
        #[arg(long, value_enum)]
        domain: Option<ValueDomain>,
    },
}

pub fn handle<S: KeyValueStore>(session: &mut Session<S>, cmd: &Command) -> Result<(), Notice> {
    match cmd {
        Command::List => list(session),
        Command::Add => {
            let id = session.add_row()?;
            println!("Added row {id}");
        }
        Command::Remove { id } => session.remove_row(*id)?,
        Command::Set {
            id,
            label,
            value,
            color,
            domain,
        } => {
            // Domain first so a value given alongside it is clamped into the new domain
            let edits = [
                domain.map(RowEdit::Domain),
                label.clone().map(RowEdit::Label),
                color.clone().map(RowEdit::Color),
                value.clone().map(RowEdit::Value),
            ];
            for edit in edits.into_iter().flatten() {
                session.update_row(*id, edit);
            }
        }
    }

    Ok(())
}

fn list<S: KeyValueStore>(session: &Session<S>) {
    let rules = session.rules();

    println!(
        "{}",
        format!("{:>4}  {:<24} {:>6}  {:<9} {}", "ID", "LABEL", "VALUE", "COLOR", "DOMAIN").bold()
    );
    for row in session.dataset() {
        println!(
            "{:>4}  {:<24} {:>6}  {} {:<7} {}",
            row.id(),
            row.label(),
            row.value(),
            swatch(row.color(), "■"),
            row.color(),
            row.effective_domain(&rules)
        );
    }
}
