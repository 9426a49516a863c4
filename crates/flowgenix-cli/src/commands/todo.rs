use clap::Subcommand;
use flowgenix_core::{Action, Event, Priority, TodoDraft, TodoFilter};
use std::path::PathBuf;

use crate::common::{fmt_datetime, open_app, parse_datetime, CliResult};

#[derive(Subcommand)]
pub enum TodoAction {
    /// Add a task
    Add {
        /// Task title
        title: String,
        /// Due date and time (YYYY-MM-DD HH:MM)
        #[arg(long, value_parser = parse_datetime)]
        due: chrono::NaiveDateTime,
        /// Description
        #[arg(long, short, default_value = "")]
        description: String,
        /// Priority: low, medium or high
        #[arg(long, short, default_value = "medium")]
        priority: Priority,
    },
    /// List tasks
    List {
        /// Filter: all, today, upcoming or completed
        #[arg(long, short, default_value = "all")]
        filter: TodoFilter,
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },
    /// Toggle a task's completion
    Done {
        /// Task ID
        id: String,
    },
    /// Edit a task; omitted fields keep their value
    Edit {
        /// Task ID
        id: String,
        #[arg(long)]
        title: Option<String>,
        #[arg(long, value_parser = parse_datetime)]
        due: Option<chrono::NaiveDateTime>,
        #[arg(long, short)]
        description: Option<String>,
        #[arg(long, short)]
        priority: Option<Priority>,
    },
    /// Delete a task
    Delete {
        /// Task ID
        id: String,
    },
    /// Delete every completed task
    ClearCompleted,
    /// Counts of total, completed, pending and overdue tasks
    Stats,
    /// Export tasks as JSON
    Export {
        /// Output file (stdout when omitted)
        path: Option<PathBuf>,
    },
    /// Import tasks from a JSON file
    Import {
        /// Input file
        path: PathBuf,
    },
    /// Pending reminders in firing order
    Reminders,
}

pub fn run(action: TodoAction) -> CliResult {
    let mut app = open_app()?;

    match action {
        TodoAction::Add {
            title,
            due,
            description,
            priority,
        } => {
            let out = app.dispatch(Action::AddTodo(TodoDraft {
                title,
                description,
                due_at: Some(due),
                priority,
            }))?;
            for event in &out.events {
                if let Event::TaskAdded { id, .. } = event {
                    println!("{id}");
                }
            }
        }
        TodoAction::List { filter, json } => {
            let todos = app.state().todos.filter(filter, app.now());
            if json {
                println!("{}", serde_json::to_string_pretty(&todos)?);
            } else if todos.is_empty() {
                println!("no tasks");
            } else {
                let now = app.now();
                for todo in todos {
                    let mark = if todo.completed {
                        "x"
                    } else if todo.is_overdue(now) {
                        "!"
                    } else {
                        " "
                    };
                    println!(
                        "[{mark}] {}  {:<6} {}  {}",
                        todo.id,
                        todo.priority,
                        fmt_datetime(todo.due_at),
                        todo.title
                    );
                }
            }
        }
        TodoAction::Done { id } => {
            let out = app.dispatch(Action::ToggleTodo(id))?;
            for event in &out.events {
                match event {
                    Event::TaskCompleted { coins_earned, .. } => {
                        println!("completed (+{coins_earned} coins, balance {})", app.state().ledger.coins());
                    }
                    Event::TaskReopened { .. } => println!("reopened"),
                    _ => {}
                }
            }
        }
        TodoAction::Edit {
            id,
            title,
            due,
            description,
            priority,
        } => {
            let current = app
                .state()
                .todos
                .get(&id)
                .ok_or_else(|| format!("task not found: {id}"))?;
            let draft = TodoDraft {
                title: title.unwrap_or_else(|| current.title.clone()),
                description: description.unwrap_or_else(|| current.description.clone()),
                due_at: Some(due.unwrap_or(current.due_at)),
                priority: priority.unwrap_or(current.priority),
            };
            app.dispatch(Action::EditTodo { id, draft })?;
            println!("ok");
        }
        TodoAction::Delete { id } => {
            app.dispatch(Action::DeleteTodo(id))?;
            println!("deleted");
        }
        TodoAction::ClearCompleted => {
            let out = app.dispatch(Action::ClearCompleted)?;
            let count = out
                .events
                .iter()
                .find_map(|e| match e {
                    Event::CompletedCleared { count, .. } => Some(*count),
                    _ => None,
                })
                .unwrap_or(0);
            println!("removed {count} completed tasks");
        }
        TodoAction::Stats => {
            let stats = app.state().todos.stats(app.now());
            println!("{}", serde_json::to_string_pretty(&stats)?);
        }
        TodoAction::Export { path } => {
            let json = app.state().todos.export_json()?;
            match path {
                Some(path) => {
                    std::fs::write(&path, json)?;
                    println!("exported {} tasks to {}", app.state().todos.len(), path.display());
                }
                None => println!("{json}"),
            }
        }
        TodoAction::Import { path } => {
            let json = std::fs::read_to_string(&path)?;
            let out = app.dispatch(Action::ImportTodos(json))?;
            let count = out
                .events
                .iter()
                .find_map(|e| match e {
                    Event::TasksImported { ids, .. } => Some(ids.len()),
                    _ => None,
                })
                .unwrap_or(0);
            println!("imported {count} tasks");
        }
        TodoAction::Reminders => {
            let pending = app.pending_reminders();
            if pending.is_empty() {
                println!("no pending reminders");
            }
            for (at, reminder) in pending {
                let title = app
                    .state()
                    .todos
                    .get(reminder.target.id())
                    .map(|t| t.title.as_str())
                    .or_else(|| {
                        app.state()
                            .calendar
                            .get(reminder.target.id())
                            .map(|e| e.title.as_str())
                    })
                    .unwrap_or("?");
                println!("{}  {:<14} {title}", fmt_datetime(at), reminder.kind.label());
            }
        }
    }
    Ok(())
}
