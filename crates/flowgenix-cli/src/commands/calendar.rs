use chrono::{NaiveDate, NaiveTime};
use clap::Subcommand;
use flowgenix_core::{Action, CalendarEvent, Event, EventDraft};

use crate::common::{open_app, parse_date, parse_time, CliResult};

#[derive(Subcommand)]
pub enum CalendarAction {
    /// Add an event
    Add {
        /// Event title
        title: String,
        /// Date (YYYY-MM-DD)
        #[arg(long, value_parser = parse_date)]
        date: NaiveDate,
        /// Start time (HH:MM)
        #[arg(long, value_parser = parse_time)]
        time: Option<NaiveTime>,
        /// Description
        #[arg(long, short, default_value = "")]
        description: String,
        /// Do not schedule reminders for this event
        #[arg(long)]
        no_reminder: bool,
    },
    /// List events on a date, or all upcoming events
    List {
        /// Date (YYYY-MM-DD)
        #[arg(long, value_parser = parse_date)]
        date: Option<NaiveDate>,
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },
    /// Today's events
    Today,
    /// Delete an event
    Delete {
        /// Event ID
        id: String,
    },
}

pub fn run(action: CalendarAction) -> CliResult {
    let mut app = open_app()?;

    match action {
        CalendarAction::Add {
            title,
            date,
            time,
            description,
            no_reminder,
        } => {
            let out = app.dispatch(Action::AddEvent(EventDraft {
                title,
                date,
                time,
                description,
                reminder_enabled: !no_reminder,
            }))?;
            for event in &out.events {
                if let Event::CalendarEventAdded { id, .. } = event {
                    println!("{id}");
                }
            }
        }
        CalendarAction::List { date, json } => {
            let events = match date {
                Some(date) => app.state().calendar.on(date),
                None => app.state().calendar.upcoming(app.now()),
            };
            if json {
                println!("{}", serde_json::to_string_pretty(&events)?);
            } else {
                print_events(&events);
            }
        }
        CalendarAction::Today => {
            let events = app.state().calendar.on(app.now().date());
            print_events(&events);
        }
        CalendarAction::Delete { id } => {
            app.dispatch(Action::DeleteEvent(id))?;
            println!("deleted");
        }
    }
    Ok(())
}

fn print_events(events: &[&CalendarEvent]) {
    if events.is_empty() {
        println!("no events");
        return;
    }
    for event in events {
        let bell = if event.reminder_enabled { "*" } else { " " };
        println!(
            "{} {} {}{bell} {}",
            event.id,
            event.date,
            event.time.format("%H:%M"),
            event.title
        );
    }
}
