use crate::common::{open_app, CliResult};

pub fn run(json: bool) -> CliResult {
    let app = open_app()?;
    let state = app.state();
    let ledger = &state.ledger;
    let today = ledger.focus_minutes_on(app.now().date());
    let todos = state.todos.stats(app.now());

    if json {
        let value = serde_json::json!({
            "coins": ledger.coins(),
            "streak_days": ledger.streak_days,
            "total_sessions": ledger.total_sessions,
            "total_focus_minutes": ledger.total_focus_minutes,
            "today_focus_minutes": today,
            "last_session_date": ledger.last_session_date,
            "todos": todos,
            "coupons": state.coupons.len(),
        });
        println!("{}", serde_json::to_string_pretty(&value)?);
        return Ok(());
    }

    println!("coins:          {}", ledger.coins());
    println!("streak:         {} days", ledger.streak_days);
    println!("sessions:       {}", ledger.total_sessions);
    println!("focus minutes:  {} total, {} today", ledger.total_focus_minutes, today);
    println!(
        "tasks:          {} done, {} pending, {} overdue",
        todos.completed, todos.pending, todos.overdue
    );
    println!("coupons:        {}", state.coupons.len());
    Ok(())
}
