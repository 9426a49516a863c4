use clap::{Parser, Subcommand};
use flowgenix_core::Config;
use tracing_subscriber::EnvFilter;

mod commands;
mod common;
mod terminal;

#[derive(Parser)]
#[command(name = "flowgenix", version, about = "FlowGenix focus timer")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run and configure focus sessions
    Focus {
        #[command(subcommand)]
        action: commands::focus::FocusAction,
    },
    /// Todo list management
    Todo {
        #[command(subcommand)]
        action: commands::todo::TodoAction,
    },
    /// Calendar events
    Calendar {
        #[command(subcommand)]
        action: commands::calendar::CalendarAction,
    },
    /// Rewards store and coupons
    Rewards {
        #[command(subcommand)]
        action: commands::rewards::RewardsAction,
    },
    /// Activity and distraction history
    History {
        #[command(subcommand)]
        action: commands::history::HistoryAction,
    },
    /// Record a distraction
    Distraction {
        #[command(subcommand)]
        action: commands::distraction::DistractionAction,
    },
    /// Ask the study assistant
    Chat {
        /// Message to send; omit for an interactive conversation
        message: Option<String>,
    },
    /// User preferences
    Settings {
        #[command(subcommand)]
        action: commands::settings::SettingsAction,
    },
    /// Local profile
    Profile {
        #[command(subcommand)]
        action: commands::profile::ProfileAction,
    },
    /// Environment configuration
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
    /// Coins, streak and focus totals
    Stats {
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },
    /// App blocker service
    Blocker {
        #[command(subcommand)]
        action: commands::blocker::BlockerAction,
    },
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(Config::load_or_default().log.filter));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_tracing();

    let result = match cli.command {
        Commands::Focus { action } => commands::focus::run(action),
        Commands::Todo { action } => commands::todo::run(action),
        Commands::Calendar { action } => commands::calendar::run(action),
        Commands::Rewards { action } => commands::rewards::run(action),
        Commands::History { action } => commands::history::run(action),
        Commands::Distraction { action } => commands::distraction::run(action),
        Commands::Chat { message } => commands::chat::run(message),
        Commands::Settings { action } => commands::settings::run(action),
        Commands::Profile { action } => commands::profile::run(action),
        Commands::Config { action } => commands::config::run(action),
        Commands::Stats { json } => commands::stats::run(json),
        Commands::Blocker { action } => commands::blocker::run(action),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
