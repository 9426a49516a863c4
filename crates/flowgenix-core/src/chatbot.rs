//! Keyword-rule assistant.
//!
//! Rules are checked in order against the lowercased message; the first
//! whose keyword appears anywhere in it answers with a random pick from its
//! pool. Messages matching no rule get a generic reply.

use chrono::NaiveDateTime;
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

struct Rule {
    keywords: &'static [&'static str],
    replies: &'static [&'static str],
}

/// `{coins}` is replaced with the current balance.
const RULES: &[Rule] = &[
    Rule {
        keywords: &["focus", "study"],
        replies: &[
            "Great! Starting a focus session can really boost your productivity. Would you like to begin a 25-minute Pomodoro session?",
            "Focus is key to success! Remember to eliminate distractions and take breaks every 25 minutes.",
            "I recommend trying the focus timer with your current theme. It's designed to help you stay concentrated!",
        ],
    },
    Rule {
        keywords: &["motivation", "motivated"],
        replies: &[
            "You've got this! Remember, every small step counts towards your goals.",
            "Stay strong! Your future self will thank you for the hard work you're putting in today.",
            "Believe in yourself! You've overcome challenges before, and you can do it again.",
        ],
    },
    Rule {
        keywords: &["task", "todo"],
        replies: &[
            "Managing tasks effectively is crucial! Have you checked your todo list? You can add new tasks and set priorities to stay organized.",
        ],
    },
    Rule {
        keywords: &["reward", "coin"],
        replies: &[
            "You currently have {coins} focus coins! You can use them in the rewards section to unlock coupons and treats. Keep focusing to earn more!",
        ],
    },
    Rule {
        keywords: &["theme"],
        replies: &[
            "Each theme has its own vibe: K-Pop for energy, Anime for power, Car for speed, and Music for creativity! Change it with `flowgenix settings set theme <name>`.",
        ],
    },
];

const GENERIC: &[&str] = &[
    "That's interesting! How can I help you stay focused today?",
    "I'm here to help you with your productivity journey. What would you like to know?",
    "Great question! Is there something specific about focus or productivity you'd like help with?",
    "I'm your FlowGenix assistant! I can help with focus sessions, task management, and motivation.",
];

pub const QUICK_QUESTIONS: [&str; 4] = [
    "How do I start focusing?",
    "Give me motivation",
    "What are focus coins?",
    "How do themes work?",
];

/// Reply to `text`, given the user's coin balance.
pub fn respond(text: &str, coins: u64) -> String {
    respond_with(text, coins, &mut rand::thread_rng())
}

pub fn respond_with(text: &str, coins: u64, rng: &mut impl Rng) -> String {
    let lowered = text.to_lowercase();
    let pool = RULES
        .iter()
        .find(|rule| rule.keywords.iter().any(|k| lowered.contains(k)))
        .map(|rule| rule.replies)
        .unwrap_or(GENERIC);
    let reply = pool.choose(rng).copied().unwrap_or(GENERIC[0]);
    reply.replace("{coins}", &coins.to_string())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    User,
    Assistant,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub sender: Sender,
    pub text: String,
    pub timestamp: NaiveDateTime,
}

/// Conversation for the current run. Never persisted.
#[derive(Debug, Clone, Default)]
pub struct Transcript {
    messages: Vec<ChatMessage>,
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the user's message and the reply; returns the reply.
    pub fn ask(&mut self, text: &str, coins: u64, at: NaiveDateTime) -> &ChatMessage {
        let reply = respond(text, coins);
        self.push(Sender::User, text.to_string(), at);
        self.push(Sender::Assistant, reply, at)
    }

    fn push(&mut self, sender: Sender, text: String, timestamp: NaiveDateTime) -> &ChatMessage {
        let idx = self.messages.len();
        self.messages.push(ChatMessage {
            sender,
            text,
            timestamp,
        });
        &self.messages[idx]
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn clear(&mut self) {
        self.messages.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn reply(text: &str) -> String {
        respond_with(text, 120, &mut StdRng::seed_from_u64(3))
    }

    #[test]
    fn first_matching_rule_wins() {
        // "study" beats "task" because focus/study comes first.
        let r = reply("Which task should I study?");
        assert!(RULES[0].replies.contains(&r.as_str()));
    }

    #[test]
    fn matching_is_case_insensitive_substring() {
        assert!(RULES[1].replies.contains(&reply("I feel UNMOTIVATED").as_str()));
        assert!(reply("my TODOs").starts_with("Managing tasks"));
    }

    #[test]
    fn coin_reply_includes_balance() {
        assert!(reply("how many coins do I have").contains("120 focus coins"));
    }

    #[test]
    fn unmatched_gets_generic_reply() {
        assert!(GENERIC.contains(&reply("hello there").as_str()));
    }

    #[test]
    fn transcript_keeps_both_sides() {
        let at = NaiveDate::from_ymd_opt(2026, 1, 1)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap();
        let mut t = Transcript::new();
        assert_eq!(t.ask("theme?", 0, at).sender, Sender::Assistant);
        assert_eq!(t.messages().len(), 2);
        assert_eq!(t.messages()[0].sender, Sender::User);
        t.clear();
        assert!(t.messages().is_empty());
    }
}
