use std::{
    io::{self, BufRead, Write},
    path::PathBuf,
};

use clap::{Parser, Subcommand};
use colored::Colorize;
use sysexits::ExitCode;
use tracing_subscriber::{EnvFilter, FmtSubscriber};
use wedge_lib::{Confirm, CoreConfig, Db, Notice, Removal, Session};

mod chart;
mod profile;
mod row;

#[derive(Parser, Debug)]
#[command(name = "wedge")]
#[command(author, version, about)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Use the database at this path instead of the one in the state directory
    #[arg(long, global = true)]
    db: Option<PathBuf>,

    /// Answer yes to every confirmation
    #[arg(short, long, global = true)]
    yes: bool,
}

#[derive(Subcommand, Debug, Clone)]
enum Command {
    /// Operate on profiles
    #[command(subcommand)]
    Profile(profile::Command),
    /// Operate on the current profile's rows
    #[command(subcommand)]
    Row(row::Command),
    /// Draw the current profile's chart
    Chart,
    /// Remove every profile and start over
    Reset,
}

/// Asks on stderr and reads the answer from stdin.
struct Prompt {
    assume_yes: bool,
}

impl Confirm for Prompt {
    fn confirm(&mut self, prompt: &str) -> bool {
        if self.assume_yes {
            return true;
        }

        eprint!("{prompt} [y/N] ");
        let _ = io::stderr().flush();

        let mut answer = String::new();
        if io::stdin().lock().read_line(&mut answer).is_err() {
            return false;
        }

        matches!(answer.trim().to_lowercase().as_str(), "y" | "yes")
    }
}

fn main() -> ExitCode {
    // Human friendly panicking in release mode
    human_panic::setup_panic!();

    // Logging
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .expect("setting default subscriber failed");

    let cli = Cli::parse();

    let cfg = match CoreConfig::load() {
        Ok(cfg) => cfg,
        Err(err) => {
            eprintln!("{} {err}", "Failed to load configuration:".red());
            return ExitCode::Config;
        }
    };

    let db = match &cli.db {
        Some(path) => Db::open(path),
        None => Db::new(),
    };
    let db = match db {
        Ok(db) => db,
        Err(err) => {
            eprintln!("{} {err}", "Failed to open database:".red());
            return ExitCode::IoErr;
        }
    };

    let mut session = Session::open(db.clone(), cfg.into_handle());
    let mut prompt = Prompt {
        assume_yes: cli.yes,
    };

    let result = match &cli.command {
        Command::Profile(cmd) => profile::handle(&mut session, cmd, &mut prompt),
        Command::Row(cmd) => row::handle(&mut session, cmd),
        Command::Chart => {
            chart::print(&session);
            Ok(())
        }
        Command::Reset => reset(&mut session, &db, &mut prompt),
    };

    if let Err(notice) = &result {
        eprintln!("{}", notice.to_string().yellow());
    }

    exit_code(&result)
}

/// A declined edit is reported as a usage error.
fn exit_code(result: &Result<(), Notice>) -> ExitCode {
    match result {
        Ok(()) => ExitCode::Ok,
        Err(_) => ExitCode::Usage,
    }
}

fn reset(session: &mut Session<Db>, db: &Db, prompt: &mut Prompt) -> Result<(), Notice> {
    let backup = || match db.snapshot() {
        Ok(path) => println!("Backed up to {}", path.display()),
        Err(err) => tracing::warn!("Failed to back up before reset: {err}"),
    };

    match session.reset(&mut once_confirmed(prompt, backup)) {
        Removal::Cancelled => println!("Nothing changed"),
        Removal::Done { .. } => println!("Started over with a default profile"),
    }

    Ok(())
}

/// Wrap `confirm` so that `then` runs after a yes, before the caller acts on it.
fn once_confirmed<'a, C: Confirm>(
    confirm: &'a mut C,
    mut then: impl FnMut() + 'a,
) -> impl FnMut(&str) -> bool + 'a {
    move |question: &str| {
        let yes = confirm.confirm(question);
        if yes {
            then();
        }
        yes
    }
}
