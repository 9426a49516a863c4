use clap::Subcommand;
use flowgenix_core::Action;

use crate::common::{fmt_datetime, open_app, CliResult};

#[derive(Subcommand)]
pub enum ProfileAction {
    /// Show the stored profile
    Show,
    /// Set the display name
    Set {
        /// Display name
        name: String,
    },
}

pub fn run(action: ProfileAction) -> CliResult {
    let mut app = open_app()?;

    match action {
        ProfileAction::Show => match &app.state().user {
            Some(user) => println!(
                "{} (since {})",
                user.display_name,
                fmt_datetime(user.created_at)
            ),
            None => println!("no profile; set one with `flowgenix profile set <name>`"),
        },
        ProfileAction::Set { name } => {
            app.dispatch(Action::SetProfile { display_name: name })?;
            println!("ok");
        }
    }
    Ok(())
}
