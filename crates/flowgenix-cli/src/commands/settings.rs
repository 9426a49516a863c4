use clap::Subcommand;
use flowgenix_core::Action;

use crate::common::{open_app, CliResult};

const KEYS: [&str; 7] = [
    "theme",
    "notifications",
    "camera_check",
    "background_music",
    "app_blocking",
    "reminder_voice",
    "default_minutes",
];

#[derive(Subcommand)]
pub enum SettingsAction {
    /// Get a setting
    Get {
        /// Setting name (e.g. "theme", "app_blocking")
        key: String,
    },
    /// Change a setting
    Set {
        /// Setting name
        key: String,
        /// New value
        value: String,
    },
    /// List all settings
    List,
}

pub fn run(action: SettingsAction) -> CliResult {
    let mut app = open_app()?;

    match action {
        SettingsAction::Get { key } => match app.state().settings.get(&key) {
            Some(value) => println!("{value}"),
            None => return Err(format!("unknown setting: {key}").into()),
        },
        SettingsAction::Set { key, value } => {
            app.dispatch(Action::UpdateSetting { key, value })?;
            println!("ok");
        }
        SettingsAction::List => {
            for key in KEYS {
                let value = app.state().settings.get(key).unwrap_or_default();
                println!("{key} = {value}");
            }
        }
    }
    Ok(())
}
