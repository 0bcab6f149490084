//! One-shot settlement of pending bets once a fight result is declared.
//!
//! Settlement only reads the odds locked at placement; it never re-derives a
//! quote. Operating on pending bets alone makes a second invocation a no-op,
//! so a double settlement can never double-pay.

use chrono::{DateTime, Utc};

use crate::config::PayoutSettings;
use crate::types::{Bet, BetStatus, Market};

use super::payout;

/// Settle every pending bet on the market's fight against the declared winner,
/// returning the updated collection.
///
/// Bets on other fights and bets already settled pass through untouched. A bet
/// whose chosen fighter is not in the fight is a data-integrity fault: it is
/// left pending and logged, never settled against a non-existent fighter. A
/// declared winner who is not in the fight refuses the whole settlement.
pub fn settle_fight(
    bets: Vec<Bet>,
    market: &Market,
    winner_id: &str,
    settings: &PayoutSettings,
) -> Vec<Bet> {
    if !market.has_fighter(winner_id) {
        tracing::warn!(
            fight_id = %market.fight_id,
            winner_id = %winner_id,
            "declared winner is not in this fight, refusing to settle"
        );
        return bets;
    }

    let settled_at = Utc::now();
    let mut won = 0usize;
    let mut lost = 0usize;

    let bets: Vec<Bet> = bets
        .into_iter()
        .map(|bet| {
            if bet.fight_id != market.fight_id || bet.status != BetStatus::Pending {
                return bet;
            }
            if !market.has_fighter(&bet.fighter_id) {
                tracing::warn!(
                    bet_id = %bet.id,
                    fighter_id = %bet.fighter_id,
                    fight_id = %bet.fight_id,
                    "bet references a fighter not in this fight, leaving unsettled"
                );
                return bet;
            }
            let settled = settle_one(bet, winner_id, settings, settled_at);
            match settled.status {
                BetStatus::Won => won += 1,
                _ => lost += 1,
            }
            settled
        })
        .collect();

    tracing::info!(
        fight_id = %market.fight_id,
        winner_id = %winner_id,
        won = won,
        lost = lost,
        "fight settled"
    );
    bets
}

/// Resolve a single pending bet into a fresh settled value.
fn settle_one(
    bet: Bet,
    winner_id: &str,
    settings: &PayoutSettings,
    settled_at: DateTime<Utc>,
) -> Bet {
    let (status, breakdown) = if bet.fighter_id == winner_id {
        (
            BetStatus::Won,
            payout::winning_breakdown(bet.stake, bet.potential_payout, settings),
        )
    } else {
        (BetStatus::Lost, payout::losing_breakdown(bet.stake, settings))
    };

    Bet {
        status,
        actual_payout: Some(breakdown.bettor_payout),
        breakdown: Some(breakdown),
        settled_at: Some(settled_at),
        ..bet
    }
}
