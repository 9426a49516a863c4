use clap::Subcommand;
use flowgenix_core::{Action, Event};

use crate::common::{open_app, CliResult};

#[derive(Subcommand)]
pub enum DistractionAction {
    /// Log a distraction against the running session
    Log {
        /// Kind of distraction (e.g. phone, tab-switch)
        kind: String,
        /// What happened
        #[arg(default_value = "")]
        description: String,
    },
}

pub fn run(action: DistractionAction) -> CliResult {
    let mut app = open_app()?;

    match action {
        DistractionAction::Log { kind, description } => {
            let out = app.dispatch(Action::LogDistraction { kind, description })?;
            let logged = out
                .events
                .iter()
                .any(|e| matches!(e, Event::DistractionLogged { .. }));
            if logged {
                println!("logged");
            } else {
                println!("no focus session is running here; use `d <kind>` inside `focus start`");
            }
        }
    }
    Ok(())
}
