use flowgenix_core::chatbot::QUICK_QUESTIONS;
use flowgenix_core::{Action, App, Event};
use std::io::{self, BufRead, Write};

use crate::common::{open_app, CliResult};

pub fn run(message: Option<String>) -> CliResult {
    let mut app = open_app()?;

    if let Some(message) = message {
        ask(&mut app, &message)?;
        return Ok(());
    }

    println!("Ask me anything about focus. Try:");
    for q in QUICK_QUESTIONS {
        println!("  - {q}");
    }
    println!("(empty line or Ctrl-D to leave)");

    let stdin = io::stdin();
    loop {
        print!("> ");
        io::stdout().flush()?;
        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 || line.trim().is_empty() {
            break;
        }
        ask(&mut app, &line)?;
    }
    Ok(())
}

fn ask(app: &mut App, message: &str) -> CliResult {
    let out = app.dispatch(Action::Chat(message.to_string()))?;
    for event in out.events {
        if let Event::AssistantReplied { text, .. } = event {
            println!("{text}");
        }
    }
    Ok(())
}
