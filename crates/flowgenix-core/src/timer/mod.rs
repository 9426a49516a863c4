mod engine;
mod theme;

pub use engine::{completion_reward, FocusSession, SessionState, COINS_PER_FIVE_MINUTES};
pub use theme::Theme;
