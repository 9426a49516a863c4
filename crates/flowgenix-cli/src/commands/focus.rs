use clap::Subcommand;
use flowgenix_core::app::format_secs;
use flowgenix_core::blocker::BridgeOutcome;
use flowgenix_core::{
    Action, App, AppBlocker, BlockerBridge, BlockerCommand, CoreError, Event, HttpAppBlocker,
    Outcome, SessionState, Theme,
};
use std::io::Write;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, BufReader};

use crate::common::{open_app, CliResult};

const BAR_WIDTH: usize = 20;

#[derive(Subcommand)]
pub enum FocusAction {
    /// Run a focus session in the foreground
    Start {
        /// Session length in minutes (defaults to the saved duration)
        #[arg(long, short)]
        minutes: Option<u32>,
        /// Theme: kpop, anime, car or music
        #[arg(long, short)]
        theme: Option<Theme>,
    },
    /// Set the default session length
    Duration {
        /// Minutes
        minutes: u32,
    },
    /// List available themes
    Themes,
}

pub fn run(action: FocusAction) -> CliResult {
    match action {
        FocusAction::Start { minutes, theme } => {
            let rt = tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()?;
            rt.block_on(focus_loop(minutes, theme))
        }
        FocusAction::Duration { minutes } => {
            if minutes == 0 {
                return Err("duration must be at least one minute".into());
            }
            let mut app = open_app()?;
            app.dispatch(Action::UpdateSetting {
                key: "default_minutes".into(),
                value: minutes.to_string(),
            })?;
            println!("default focus duration: {minutes} minutes");
            Ok(())
        }
        FocusAction::Themes => {
            for theme in Theme::ALL {
                println!("{:<6} {:<12} {}", theme.as_str(), theme.title(), theme.ambient_track());
            }
            Ok(())
        }
    }
}

async fn focus_loop(minutes: Option<u32>, theme: Option<Theme>) -> CliResult {
    let mut app = open_app()?;
    if let Some(theme) = theme {
        app.dispatch(Action::SetTheme(theme))?;
    }
    if let Some(minutes) = minutes {
        app.dispatch(Action::SetDuration(minutes))?;
    }
    let mut bridge = BlockerBridge::new(HttpAppBlocker::new(&app.config().blocker)?);
    let result = drive(&mut app, &mut bridge).await;
    release_on_error(&mut bridge, result).await
}

/// An engaged blocker is stopped before the error is reported.
async fn release_on_error<B: AppBlocker>(bridge: &mut BlockerBridge<B>, result: CliResult) -> CliResult {
    if result.is_err() && bridge.is_engaged() {
        bridge.apply(BlockerCommand::Stop).await;
    }
    result
}

async fn drive<B: AppBlocker>(app: &mut App, bridge: &mut BlockerBridge<B>) -> CliResult {
    let started = app.dispatch(Action::StartSession)?;
    carry_out(app, bridge, started.blocker).await?;
    println!("commands: p pause | r resume | d <kind> distraction | x reset | q quit");

    let mut ticker = tokio::time::interval(Duration::from_secs(1));
    ticker.tick().await;
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdin_open = true;
    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                let running = app.state().session.state() == SessionState::Running;
                let out = app.dispatch(if running { Action::Tick } else { Action::Poll })?;
                let rewarded = out.events.iter().find_map(|e| match e {
                    Event::SessionRewarded { coins_earned, balance, streak_days, .. } => {
                        Some((*coins_earned, *balance, *streak_days))
                    }
                    _ => None,
                });
                carry_out(app, bridge, out.blocker).await?;
                if let Some((coins, balance, streak)) = rewarded {
                    println!("earned {coins} coins, balance {balance}, streak {streak} days");
                    break;
                }
                if running {
                    render(app);
                }
            }
            line = lines.next_line(), if stdin_open => {
                let Some(line) = line? else {
                    stdin_open = false;
                    continue;
                };
                let mut parts = line.trim().splitn(2, ' ');
                match parts.next().unwrap_or_default() {
                    "" => {}
                    "p" => {
                        report(app.dispatch(Action::PauseSession));
                    }
                    "r" => {
                        report(app.dispatch(Action::ResumeSession));
                    }
                    "d" => {
                        let kind = parts.next().unwrap_or("other").trim().to_string();
                        report(app.dispatch(Action::LogDistraction {
                            kind,
                            description: String::new(),
                        }));
                    }
                    "x" => {
                        if let Some(out) = report(app.dispatch(Action::ResetSession { confirmed: true })) {
                            carry_out(app, bridge, out.blocker).await?;
                        }
                        break;
                    }
                    "q" => match app.dispatch(Action::ResetSession { confirmed: false }) {
                        Ok(out) => {
                            carry_out(app, bridge, out.blocker).await?;
                            break;
                        }
                        Err(CoreError::ConfirmationRequired { elapsed_secs }) => {
                            println!(
                                "\n{} of progress would be lost. Press x to reset or keep focusing.",
                                format_secs(elapsed_secs)
                            );
                        }
                        Err(e) => println!("\n[warning] {e}"),
                    },
                    other => println!("\nunknown command: {other}"),
                }
            }
            _ = &mut ctrl_c => {
                println!();
                if let Some(out) = report(app.dispatch(Action::ResetSession { confirmed: true })) {
                    carry_out(app, bridge, out.blocker).await?;
                }
                break;
            }
        }
    }
    Ok(())
}

/// Run a blocker command and feed its result back into the app.
async fn carry_out<B: AppBlocker>(
    app: &mut App,
    bridge: &mut BlockerBridge<B>,
    command: Option<BlockerCommand>,
) -> Result<(), CoreError> {
    if let Some(command) = command {
        let outcome: BridgeOutcome = bridge.apply(command).await;
        app.dispatch(Action::BlockerApplied(outcome))?;
    }
    Ok(())
}

fn report(result: Result<Outcome, CoreError>) -> Option<Outcome> {
    match result {
        Ok(out) => Some(out),
        Err(e) => {
            println!("\n[warning] {e}");
            None
        }
    }
}

fn render(app: &App) {
    let Event::StateSnapshot {
        theme,
        time_left_secs,
        progress_pct,
        ..
    } = app.state().session.snapshot(app.now())
    else {
        return;
    };
    let filled = ((progress_pct / 100.0) * BAR_WIDTH as f64).round() as usize;
    let filled = filled.min(BAR_WIDTH);
    print!(
        "\r{} {} [{}{}] {:>3.0}% ",
        theme.title(),
        format_secs(time_left_secs),
        "#".repeat(filled),
        "-".repeat(BAR_WIDTH - filled),
        progress_pct
    );
    let _ = std::io::stdout().flush();
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use flowgenix_core::blocker::BlockerReply;
    use flowgenix_core::error::BlockerError;
    use flowgenix_core::BlockerStatus;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Default)]
    struct Counting {
        stops: AtomicUsize,
    }

    fn ok() -> BlockerReply {
        BlockerReply {
            success: true,
            message: String::new(),
        }
    }

    #[async_trait]
    impl AppBlocker for Counting {
        async fn health(&self) -> Result<(), BlockerError> {
            Ok(())
        }
        async fn start(&self, _minutes: u32) -> Result<BlockerReply, BlockerError> {
            Ok(ok())
        }
        async fn stop(&self) -> Result<BlockerReply, BlockerError> {
            self.stops.fetch_add(1, Ordering::SeqCst);
            Ok(ok())
        }
        async fn status(&self) -> Result<BlockerStatus, BlockerError> {
            Ok(BlockerStatus::default())
        }
    }

    #[tokio::test]
    async fn failing_session_releases_the_blocker() {
        let mut bridge = BlockerBridge::new(Counting::default());
        bridge.apply(BlockerCommand::Start { minutes: 25 }).await;
        assert!(bridge.is_engaged());

        let result = release_on_error(&mut bridge, Err("store went away".into())).await;
        assert!(result.is_err());
        assert!(!bridge.is_engaged());
        assert_eq!(bridge.blocker().stops.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn clean_exit_leaves_the_bridge_alone() {
        let mut bridge = BlockerBridge::new(Counting::default());
        bridge.apply(BlockerCommand::Start { minutes: 5 }).await;
        assert!(release_on_error(&mut bridge, Ok(())).await.is_ok());
        assert_eq!(bridge.blocker().stops.load(Ordering::SeqCst), 0);
    }
}
