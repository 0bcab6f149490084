use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::config::PayoutSettings;
use crate::engine::odds::OddsFormat;

/// Normalized domain types consumed and produced by the engine (backend-agnostic).
/// The fighter-management backend owns FighterRecord; the CRUD layer stores
/// Bets, Markets, and Pools as opaque records.

/// Outcome tag on one entry of a fighter's history, most-recent-first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FightOutcome {
    Win,
    Loss,
    /// A win by knockout.
    Knockout,
    /// Scheduled but not yet fought; ignored by the strength model.
    Pending,
}

/// Career snapshot of one fighter, as provided by the fighter registry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FighterRecord {
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    pub wins: u32,
    pub losses: u32,
    pub knockouts: u32,
    pub ranking_points: f64,
    /// Most-recent-first.
    #[serde(default)]
    pub fight_history: Vec<FightOutcome>,
}

impl FighterRecord {
    pub fn total_fights(&self) -> u32 {
        self.wins + self.losses
    }

    pub fn display_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventType {
    Regular,
    Special,
    Tournament,
}

/// Quoted market for one bout: odds, implied probabilities, and the live pool.
///
/// A Market is a value snapshot. Placing a bet replaces the whole record with a
/// freshly computed one; fields are never patched in place.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Market {
    pub fight_id: String,
    pub fighter1_id: String,
    pub fighter2_id: String,
    /// Odds values in `format`'s convention (fractional stores the profit ratio).
    pub fighter1_odds: f64,
    pub fighter2_odds: f64,
    /// Normalized implied probabilities; the pair sums to 1.0 within rounding.
    pub fighter1_probability: f64,
    pub fighter2_probability: f64,
    pub fighter1_wagered: f64,
    pub fighter2_wagered: f64,
    pub total_pool: f64,
    pub format: OddsFormat,
    pub updated_at: DateTime<Utc>,
}

impl Market {
    pub fn has_fighter(&self, fighter_id: &str) -> bool {
        self.fighter1_id == fighter_id || self.fighter2_id == fighter_id
    }

    /// Quoted odds for one side, `None` if the fighter is not in this bout.
    pub fn odds_for(&self, fighter_id: &str) -> Option<f64> {
        if fighter_id == self.fighter1_id {
            Some(self.fighter1_odds)
        } else if fighter_id == self.fighter2_id {
            Some(self.fighter2_odds)
        } else {
            None
        }
    }

    pub fn probability_for(&self, fighter_id: &str) -> Option<f64> {
        if fighter_id == self.fighter1_id {
            Some(self.fighter1_probability)
        } else if fighter_id == self.fighter2_id {
            Some(self.fighter2_probability)
        } else {
            None
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PoolStatus {
    Open,
    Closed,
    Settled,
}

/// One betting pool per fight card.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BettingPool {
    pub event_id: String,
    pub event_date: DateTime<Utc>,
    pub event_type: EventType,
    /// Minimum stake, derived from the event type at creation.
    pub min_bet: f64,
    pub markets: Vec<Market>,
    pub bet_count: usize,
    pub total_wagered: f64,
    pub status: PoolStatus,
    /// Settings in effect when the pool was created.
    pub settings: PayoutSettings,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BetStatus {
    Pending,
    Won,
    Lost,
}

/// Fee/profit split produced at settlement.
///
/// For a loss: `original_bet == house_profit + bettor_payout + platform_fee`.
/// For a win: `total_winnings == bettor_payout + platform_fee` and
/// `house_profit = original_bet - total_winnings` (negative when the house pays
/// out more than it held).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PayoutBreakdown {
    pub original_bet: f64,
    /// 0 for losing bets.
    pub total_winnings: f64,
    pub bettor_payout: f64,
    pub platform_fee: f64,
    pub house_profit: f64,
}

/// A wager against one side of a Market. Odds are locked at placement and never
/// re-derived; status transitions exactly once, at settlement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bet {
    pub id: String,
    pub bettor_id: String,
    pub bettor_name: String,
    pub event_id: String,
    pub fight_id: String,
    /// The side this bet backs.
    pub fighter_id: String,
    pub stake: f64,
    /// Odds at time of placement, in `format`'s convention.
    pub odds: f64,
    pub format: OddsFormat,
    pub potential_payout: f64,
    pub placed_at: DateTime<Utc>,
    pub status: BetStatus,
    pub actual_payout: Option<f64>,
    pub breakdown: Option<PayoutBreakdown>,
    pub settled_at: Option<DateTime<Utc>>,
}

/// Declared result for one bout, as delivered by the results boundary.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FightResult {
    pub fight_id: String,
    pub winner_id: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn market() -> Market {
        Market {
            fight_id: "fight-1".to_string(),
            fighter1_id: "f1".to_string(),
            fighter2_id: "f2".to_string(),
            fighter1_odds: -150.0,
            fighter2_odds: 150.0,
            fighter1_probability: 0.6,
            fighter2_probability: 0.4,
            fighter1_wagered: 0.0,
            fighter2_wagered: 0.0,
            total_pool: 0.0,
            format: OddsFormat::American,
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_odds_for_each_side() {
        let m = market();
        assert_eq!(m.odds_for("f1"), Some(-150.0));
        assert_eq!(m.odds_for("f2"), Some(150.0));
        assert_eq!(m.odds_for("ghost"), None);
    }

    #[test]
    fn test_has_fighter() {
        let m = market();
        assert!(m.has_fighter("f1"));
        assert!(m.has_fighter("f2"));
        assert!(!m.has_fighter("f3"));
    }

    #[test]
    fn test_records_round_trip_as_opaque_json() {
        // The CRUD layer stores engine output as opaque records; the derives
        // must survive a round trip.
        let m = market();
        let json = serde_json::to_string(&m).unwrap();
        let back: Market = serde_json::from_str(&json).unwrap();
        assert_eq!(back.fight_id, m.fight_id);
        assert_eq!(back.format, m.format);
        assert_eq!(back.fighter1_odds, m.fighter1_odds);

        let status: PoolStatus = serde_json::from_str("\"settled\"").unwrap();
        assert_eq!(status, PoolStatus::Settled);
    }

    #[test]
    fn test_total_fights() {
        let f = FighterRecord {
            id: "f1".to_string(),
            first_name: "Sonny".to_string(),
            last_name: "Liston".to_string(),
            wins: 10,
            losses: 4,
            knockouts: 8,
            ranking_points: 500.0,
            fight_history: vec![],
        };
        assert_eq!(f.total_fights(), 14);
        assert_eq!(f.display_name(), "Sonny Liston");
    }
}
