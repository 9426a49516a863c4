use clap::Subcommand;
use flowgenix_core::{AppBlocker, Config, HttpAppBlocker};

use crate::common::CliResult;

#[derive(Subcommand)]
pub enum BlockerAction {
    /// Ask the app blocker service for its status
    Status,
}

pub fn run(action: BlockerAction) -> CliResult {
    let config = Config::load_or_default();
    let rt = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;

    match action {
        BlockerAction::Status => {
            let blocker = HttpAppBlocker::new(&config.blocker)?;
            match rt.block_on(blocker.status()) {
                Ok(status) => println!("{}", serde_json::to_string_pretty(&status)?),
                Err(e) => println!("unavailable at {}: {e}", config.blocker.base_url),
            }
        }
    }
    Ok(())
}
