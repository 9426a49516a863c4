//! Coin ledger, focus statistics and the rewards catalogue.
//!
//! Generic spending clamps at zero, while coupon redemption refuses outright
//! when the balance is short. The two paths are intentionally kept apart.

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::LedgerError;

/// Persisted under the `stats` key.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Ledger {
    #[serde(default)]
    coins: u64,
    #[serde(default)]
    pub streak_days: u32,
    #[serde(default)]
    pub total_focus_minutes: u64,
    #[serde(default)]
    pub total_sessions: u64,
    #[serde(default)]
    pub last_session_date: Option<NaiveDate>,
    /// Focus minutes on `last_session_date`.
    #[serde(default)]
    pub today_focus_minutes: u64,
}

impl Ledger {
    pub fn with_coins(coins: u64) -> Self {
        Self {
            coins,
            ..Self::default()
        }
    }

    pub fn coins(&self) -> u64 {
        self.coins
    }

    pub fn earn(&mut self, amount: u64) -> u64 {
        self.coins = self.coins.saturating_add(amount);
        self.coins
    }

    /// Generic deduction: takes up to `amount` and clamps at zero instead of
    /// failing. Coupon redemption checks the balance first and refuses when
    /// it is short; see [`Ledger::redeem`].
    /// Returns the amount actually deducted.
    pub fn spend(&mut self, amount: u64) -> u64 {
        let spent = amount.min(self.coins);
        self.coins -= spent;
        spent
    }

    pub fn can_afford(&self, cost: u64) -> bool {
        self.coins >= cost
    }

    /// Exchange coins for a coupon. Refused when the balance is short.
    pub fn redeem(&mut self, reward: &Reward, at: NaiveDateTime) -> Result<Coupon, LedgerError> {
        if !self.can_afford(reward.cost) {
            return Err(LedgerError::InsufficientCoins {
                needed: reward.cost,
                available: self.coins,
            });
        }
        self.spend(reward.cost);
        Ok(Coupon {
            id: Uuid::new_v4().to_string(),
            reward_id: reward.id,
            name: reward.name.to_string(),
            cost: reward.cost,
            redeemed_at: at,
        })
    }

    /// Fold a completed session into the totals and the daily streak.
    ///
    /// Same day keeps the streak, the following day extends it, any gap
    /// restarts it at one.
    pub fn record_session(&mut self, minutes: u32, day: NaiveDate) {
        let minutes = u64::from(minutes);
        match self.last_session_date {
            Some(last) if last == day => {
                self.today_focus_minutes += minutes;
            }
            Some(last) if last.succ_opt() == Some(day) => {
                self.streak_days += 1;
                self.today_focus_minutes = minutes;
            }
            _ => {
                self.streak_days = 1;
                self.today_focus_minutes = minutes;
            }
        }
        self.last_session_date = Some(day);
        self.total_focus_minutes += minutes;
        self.total_sessions += 1;
    }

    /// Focus minutes logged on `day`.
    pub fn focus_minutes_on(&self, day: NaiveDate) -> u64 {
        if self.last_session_date == Some(day) {
            self.today_focus_minutes
        } else {
            0
        }
    }
}

/// An item in the rewards store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Reward {
    pub id: u32,
    pub name: &'static str,
    pub cost: u64,
    pub description: &'static str,
}

pub const REWARDS: [Reward; 6] = [
    Reward {
        id: 1,
        name: "Coffee Break",
        cost: 50,
        description: "15 min coffee break coupon",
    },
    Reward {
        id: 2,
        name: "Movie Night",
        cost: 100,
        description: "Watch your favorite movie",
    },
    Reward {
        id: 3,
        name: "Snack Time",
        cost: 25,
        description: "Treat yourself to a snack",
    },
    Reward {
        id: 4,
        name: "Music Session",
        cost: 30,
        description: "Listen to music for 30 min",
    },
    Reward {
        id: 5,
        name: "Social Media",
        cost: 75,
        description: "20 min social media time",
    },
    Reward {
        id: 6,
        name: "Gaming Break",
        cost: 120,
        description: "1 hour gaming session",
    },
];

pub fn find_reward(id: u32) -> Result<&'static Reward, LedgerError> {
    REWARDS
        .iter()
        .find(|r| r.id == id)
        .ok_or(LedgerError::UnknownReward(id))
}

/// A redeemed reward. Non-refundable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Coupon {
    pub id: String,
    pub reward_id: u32,
    pub name: String,
    pub cost: u64,
    pub redeemed_at: NaiveDateTime,
}
