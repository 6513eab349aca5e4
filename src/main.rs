//! Main entry point for the TimeTracker console
//! Opens the store, then reads commands from the `TimeTracker> ` prompt until exit.

use anyhow::{Context, Result};
use clap::Parser;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use timetracker::commands::{self, Flow};
use timetracker::infra::db::Database;

#[derive(Parser, Debug)]
#[command(name = "timetracker")]
#[command(version)]
#[command(about = "Track time spent on clients, projects and tasks", long_about = None)]
struct Args {
    /// SQLite file to use instead of the configured one
    #[arg(long, value_name = "PATH")]
    db: Option<PathBuf>,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let args = Args::parse();

    let db = match args.db {
        Some(path) => Database::open_at(path),
        None => Database::open(),
    }
    .context("Failed to open the TimeTracker database")?;
    if let Some(path) = db.path() {
        log::info!("Using database at {}", path.display());
    }

    let stdin = io::stdin();
    let mut stdout = io::stdout();
    let mut line = String::new();

    loop {
        write!(stdout, "TimeTracker> ")?;
        stdout.flush()?;

        line.clear();
        if stdin.lock().read_line(&mut line)? == 0 {
            // EOF
            writeln!(stdout)?;
            break;
        }

        match commands::run_line(&db, &line, &mut stdout) {
            Ok(Flow::Continue) => {}
            Ok(Flow::Exit) => break,
            Err(err) => eprintln!("error: {err:#}"),
        }
    }

    writeln!(stdout, "Exiting...")?;
    Ok(())
}
