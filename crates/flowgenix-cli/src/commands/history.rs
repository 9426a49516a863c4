use clap::Subcommand;

use crate::common::{fmt_datetime, open_app, CliResult};

#[derive(Subcommand)]
pub enum HistoryAction {
    /// Recent activity, newest first
    List {
        /// Maximum entries to show
        #[arg(long, short, default_value = "20")]
        limit: usize,
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },
    /// Recent distractions, newest first
    Distractions {
        /// Maximum entries to show
        #[arg(long, short, default_value = "20")]
        limit: usize,
    },
}

pub fn run(action: HistoryAction) -> CliResult {
    let app = open_app()?;

    match action {
        HistoryAction::List { limit, json } => {
            let entries: Vec<_> = app.state().history.iter().take(limit).collect();
            if json {
                println!("{}", serde_json::to_string_pretty(&entries)?);
                return Ok(());
            }
            if entries.is_empty() {
                println!("no activity yet");
            }
            for entry in entries {
                println!(
                    "{}  {:<18} {}",
                    fmt_datetime(entry.timestamp),
                    entry.action.as_str(),
                    entry.description
                );
            }
        }
        HistoryAction::Distractions { limit } => {
            let log = &app.state().distractions;
            if log.is_empty() {
                println!("no distractions logged");
            }
            for d in log.iter().take(limit) {
                println!("{}  {:<10} {}", fmt_datetime(d.timestamp), d.kind, d.description);
            }
        }
    }
    Ok(())
}
