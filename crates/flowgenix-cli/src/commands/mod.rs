pub mod blocker;
pub mod calendar;
pub mod chat;
pub mod config;
pub mod distraction;
pub mod focus;
pub mod history;
pub mod profile;
pub mod rewards;
pub mod settings;
pub mod stats;
pub mod todo;
