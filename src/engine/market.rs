//! Per-fight market construction.
//!
//! Runs the strength and probability models over a fighter pair, blends in the
//! live pool, and snapshots the result as a Market. Rebuilding the Market after
//! each accepted bet is the only path that moves quoted odds; bets already on
//! the book keep the odds they locked at placement.

use chrono::Utc;

use crate::types::{Bet, BetStatus, FighterRecord, Market};

use super::odds::{self, OddsFormat};
use super::probability;
use super::strength;

/// Sum of pending stakes backing `fighter_id` in `fight_id`.
fn wagered_on(bets: &[Bet], fight_id: &str, fighter_id: &str) -> f64 {
    bets.iter()
        .filter(|bet| {
            bet.status == BetStatus::Pending
                && bet.fight_id == fight_id
                && bet.fighter_id == fighter_id
        })
        .map(|bet| bet.stake)
        .sum()
}

/// Build the quoted market for one fight.
///
/// Existing pending bets on the fight seed the per-side pool totals; a fresh
/// market with an empty pool quotes the pure model probabilities.
pub fn build_market(
    fighter1: &FighterRecord,
    fighter2: &FighterRecord,
    fight_id: &str,
    roster: &[FighterRecord],
    bets: &[Bet],
    format: OddsFormat,
    vig_percent: f64,
) -> Market {
    let strength1 = strength::strength_score(fighter1, roster);
    let strength2 = strength::strength_score(fighter2, roster);
    let (base1, base2) = probability::implied_pair(strength1, strength2);

    let pool1 = wagered_on(bets, fight_id, &fighter1.id);
    let pool2 = wagered_on(bets, fight_id, &fighter2.id);
    let (p1, p2) = probability::pool_adjusted_pair(base1, base2, pool1, pool2, vig_percent);

    Market {
        fight_id: fight_id.to_string(),
        fighter1_id: fighter1.id.clone(),
        fighter2_id: fighter2.id.clone(),
        fighter1_odds: odds::probability_to_odds(p1, format),
        fighter2_odds: odds::probability_to_odds(p2, format),
        fighter1_probability: p1,
        fighter2_probability: p2,
        fighter1_wagered: pool1,
        fighter2_wagered: pool2,
        total_pool: pool1 + pool2,
        format,
        updated_at: Utc::now(),
    }
}
