use clap::Subcommand;
use colored::Colorize;
use wedge_lib::{Confirm, KeyValueStore, Notice, ProfileId, Removal, Session};

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// List profiles
    List,
    /// Add a new profile and select it
    Add { name: String },
    /// Select a profile by id or name
    Select { profile: String },
    /// Rename a profile
    Rename { profile: String, name: String },
    /// Remove a profile
    Remove { profile: String },
}

pub fn handle<S: KeyValueStore>(
    session: &mut Session<S>,
    cmd: &Command,
    confirm: &mut impl Confirm,
) -> Result<(), Notice> {
    match cmd {
        Command::List => {
            for profile in session.profiles() {
                let current = session.current_profile_id() == Some(profile.id());
                let line = format!("{}  {}", profile.id(), profile.name());
                if current {
                    println!("{} {}", "*".green(), line.bold());
                } else {
                    println!("  {line}");
                }
            }
        }
        Command::Add { name } => {
            let id = session.add_profile(name);
            println!("Added {name} ({id})");
        }
        Command::Select { profile } => {
            let id = resolve(session, profile);
            session.select_profile(&id)?;
        }
        Command::Rename { profile, name } => {
            let id = resolve(session, profile);
            session.rename_profile(&id, name)?;
        }
        Command::Remove { profile } => {
            let id = resolve(session, profile);
            match session.remove_profile(&id, confirm)? {
                Removal::Cancelled => println!("Nothing changed"),
                Removal::Done { current } => {
                    let name = session
                        .current_profile()
                        .map(|p| p.name().as_str())
                        .unwrap_or_default();
                    println!("Removed. Current profile is now {name} ({current})");
                }
            }
        }
    }

    Ok(())
}

/// Match a profile by exact id, falling back to its name.
fn resolve<S: KeyValueStore>(session: &Session<S>, query: &str) -> ProfileId {
    session
        .profiles()
        .iter()
        .find(|p| p.id().as_str() == query)
        .or_else(|| session.profiles().iter().find(|p| p.name() == query))
        .map(|p| p.id().clone())
        .unwrap_or_else(|| ProfileId::from(query))
}
