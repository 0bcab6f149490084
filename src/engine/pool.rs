//! Betting-pool assembly for a fight card.
//!
//! One Market per bout, a minimum stake derived from the event type, and
//! aggregate totals seeded from the pending bets already tied to the card.

use chrono::{DateTime, Utc};

use crate::config::{BettingConfig, PayoutSettings};
use crate::types::{Bet, BetStatus, BettingPool, EventType, FighterRecord, PoolStatus};

use super::market;

/// A bout scheduled on the card: both fighter ids plus the fight id.
#[derive(Debug, Clone)]
pub struct CardFight {
    pub fighter1_id: String,
    pub fighter2_id: String,
    pub fight_id: String,
}

/// Minimum stake for an event type. Tournaments charge a fixed entry per
/// participant rather than a bet floor.
pub fn minimum_bet(event_type: EventType, betting: &BettingConfig) -> f64 {
    match event_type {
        EventType::Regular => betting.min_bet_regular,
        EventType::Special => betting.min_bet_special,
        EventType::Tournament => betting.tournament_entry_fee,
    }
}

/// Build the betting pool for a fight card.
///
/// Fights referencing a fighter missing from the roster are skipped and logged
/// rather than quoted against a non-existent record.
pub fn build_pool(
    event_id: &str,
    event_date: DateTime<Utc>,
    event_type: EventType,
    fights: &[CardFight],
    roster: &[FighterRecord],
    bets: &[Bet],
    betting: &BettingConfig,
    settings: &PayoutSettings,
) -> BettingPool {
    let mut markets = Vec::with_capacity(fights.len());
    for fight in fights {
        let fighter1 = roster.iter().find(|f| f.id == fight.fighter1_id);
        let fighter2 = roster.iter().find(|f| f.id == fight.fighter2_id);
        let (Some(fighter1), Some(fighter2)) = (fighter1, fighter2) else {
            tracing::warn!(
                fight_id = %fight.fight_id,
                "skipping fight with an unknown fighter reference"
            );
            continue;
        };
        markets.push(market::build_market(
            fighter1,
            fighter2,
            &fight.fight_id,
            roster,
            bets,
            betting.odds_format,
            betting.vig_percent,
        ));
    }

    let card_bets: Vec<&Bet> = bets
        .iter()
        .filter(|bet| bet.event_id == event_id && bet.status == BetStatus::Pending)
        .collect();

    BettingPool {
        event_id: event_id.to_string(),
        event_date,
        event_type,
        min_bet: minimum_bet(event_type, betting),
        markets,
        bet_count: card_bets.len(),
        total_wagered: card_bets.iter().map(|bet| bet.stake).sum(),
        status: PoolStatus::Open,
        settings: settings.clone(),
    }
}
