use clap::Subcommand;
use flowgenix_core::{Action, Event, REWARDS};

use crate::common::{fmt_datetime, open_app, CliResult};

#[derive(Subcommand)]
pub enum RewardsAction {
    /// Show the rewards catalogue
    List,
    /// Spend coins on a reward
    Redeem {
        /// Reward ID from `rewards list`
        id: u32,
    },
    /// Coupons redeemed so far
    Coupons,
    /// Current coin balance
    Balance,
}

pub fn run(action: RewardsAction) -> CliResult {
    let mut app = open_app()?;

    match action {
        RewardsAction::List => {
            let coins = app.state().ledger.coins();
            for reward in &REWARDS {
                let mark = if app.state().ledger.can_afford(reward.cost) { " " } else { "-" };
                println!(
                    "{mark}{}  {:<14} {:>4} coins  {}",
                    reward.id, reward.name, reward.cost, reward.description
                );
            }
            println!("balance: {coins} coins");
        }
        RewardsAction::Redeem { id } => {
            let out = app.dispatch(Action::Redeem(id))?;
            for event in &out.events {
                if let Event::CouponRedeemed {
                    coupon_id, balance, ..
                } = event
                {
                    println!("coupon {coupon_id} (balance {balance} coins)");
                }
            }
        }
        RewardsAction::Coupons => {
            let coupons = &app.state().coupons;
            if coupons.is_empty() {
                println!("no coupons yet");
            }
            for coupon in coupons.iter().rev() {
                println!(
                    "{}  {}  {:<14} {} coins",
                    coupon.id,
                    fmt_datetime(coupon.redeemed_at),
                    coupon.name,
                    coupon.cost
                );
            }
        }
        RewardsAction::Balance => println!("{}", app.state().ledger.coins()),
    }
    Ok(())
}
