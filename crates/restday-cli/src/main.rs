use std::path::PathBuf;

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "restday-cli", version, about = "Restday CLI")]
struct Cli {
    /// Host collection file (default: <data dir>/collection.json)
    #[arg(long, global = true, value_name = "FILE")]
    collection: Option<PathBuf>,

    /// State record file (default: <data dir>/state.json)
    #[arg(long, global = true, value_name = "FILE")]
    state: Option<PathBuf>,

    /// Action journal file (default: <data dir>/actions.log)
    #[arg(long, global = true, value_name = "FILE")]
    journal: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Evaluate today's rest-day decision and apply it
    Check {
        /// Report the would-be changes without writing anything
        #[arg(long)]
        dry_run: bool,
        /// Print the full report as JSON
        #[arg(long)]
        json: bool,
    },
    /// Force the blocked state regardless of the calendar
    Pause {
        #[arg(long)]
        json: bool,
    },
    /// Clear the manual pause and re-evaluate today
    Resume {
        #[arg(long)]
        json: bool,
    },
    /// Put every entry back to its baseline value
    Restore {
        #[arg(long)]
        json: bool,
    },
    /// Turn the automation on and evaluate immediately
    Enable {
        #[arg(long)]
        json: bool,
    },
    /// Turn the automation off
    Disable {
        #[arg(long)]
        json: bool,
    },
    /// Show flags, mode, and per-entry limits
    Status {
        #[arg(long)]
        json: bool,
    },
    /// Forget the captured baseline so the next run recaptures
    ForgetBaseline {
        /// Confirm losing the recorded original limits
        #[arg(long)]
        yes: bool,
    },
    /// Show the rest/study classification for the coming days
    Preview {
        /// How many days to show
        #[arg(
            long,
            default_value = "7",
            value_parser = clap::value_parser!(u32)
                .range(1..=restday_core::calendar::MAX_OUTLOOK_DAYS as i64)
        )]
        days: u32,
    },
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();
    let paths = commands::Paths {
        collection: cli.collection,
        state: cli.state,
        journal: cli.journal,
    };

    let result = match cli.command {
        Commands::Check { dry_run, json } => commands::check::run(&paths, dry_run, json),
        Commands::Pause { json } => commands::toggle::run(&paths, commands::toggle::Toggle::Pause, json),
        Commands::Resume { json } => {
            commands::toggle::run(&paths, commands::toggle::Toggle::Resume, json)
        }
        Commands::Restore { json } => commands::restore::run(&paths, json),
        Commands::Enable { json } => {
            commands::toggle::run(&paths, commands::toggle::Toggle::Enable, json)
        }
        Commands::Disable { json } => {
            commands::toggle::run(&paths, commands::toggle::Toggle::Disable, json)
        }
        Commands::Status { json } => commands::status::run(&paths, json),
        Commands::ForgetBaseline { yes } => commands::restore::run_forget(&paths, yes),
        Commands::Preview { days } => commands::preview::run(days),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
