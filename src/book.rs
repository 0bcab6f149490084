//! Shared-state bet desk over one betting pool.
//!
//! A Market is shared mutable state: quoting reads it, settlement reads it,
//! and every accepted bet replaces it. Each fight gets its own short-lived
//! critical section covering read totals -> validate -> lock odds -> commit
//! the replaced Market, so two simultaneous placements on the same fight can
//! never race on the pool totals. Fights are independent; there is no
//! cross-fight locking.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock};

use chrono::{DateTime, Utc};
use tokio::sync::Mutex;

use crate::config::{BettingConfig, PayoutSettings};
use crate::engine::{market, payout, settlement};
use crate::error::BetError;
use crate::types::{
    Bet, BetStatus, BettingPool, EventType, FighterRecord, Market, PoolStatus,
};

/// Everything guarded by one fight's critical section.
struct FightSlot {
    market: Market,
    bets: Vec<Bet>,
    open: bool,
    settled: bool,
}

/// A bet placement request from the caller's transaction.
#[derive(Debug, Clone)]
pub struct BetRequest {
    pub bettor_id: String,
    pub bettor_name: String,
    pub fight_id: String,
    pub fighter_id: String,
    pub stake: f64,
    /// Available balance, when the caller tracks one.
    pub balance: Option<f64>,
}

pub struct MarketBook {
    event_id: String,
    event_date: DateTime<Utc>,
    event_type: EventType,
    min_bet: f64,
    roster: Vec<FighterRecord>,
    betting: BettingConfig,
    settings: RwLock<PayoutSettings>,
    slots: HashMap<String, Arc<Mutex<FightSlot>>>,
    status: RwLock<PoolStatus>,
    next_bet_id: AtomicU64,
}

impl MarketBook {
    /// Open a book over a freshly built pool. Markets whose fighters cannot be
    /// resolved against the roster are dropped with a warning; they could
    /// never be requoted after a bet.
    pub fn from_pool(pool: BettingPool, roster: Vec<FighterRecord>, betting: BettingConfig) -> Self {
        let mut slots = HashMap::new();
        for market in pool.markets {
            let resolvable = roster.iter().any(|f| f.id == market.fighter1_id)
                && roster.iter().any(|f| f.id == market.fighter2_id);
            if !resolvable {
                tracing::warn!(
                    fight_id = %market.fight_id,
                    "dropping market with fighters missing from the roster"
                );
                continue;
            }
            slots.insert(
                market.fight_id.clone(),
                Arc::new(Mutex::new(FightSlot {
                    market,
                    bets: Vec::new(),
                    open: true,
                    settled: false,
                })),
            );
        }

        Self {
            event_id: pool.event_id,
            event_date: pool.event_date,
            event_type: pool.event_type,
            min_bet: pool.min_bet,
            roster,
            betting,
            settings: RwLock::new(pool.settings),
            slots,
            status: RwLock::new(pool.status),
            next_bet_id: AtomicU64::new(1),
        }
    }

    pub fn event_id(&self) -> &str {
        &self.event_id
    }

    pub fn min_bet(&self) -> f64 {
        self.min_bet
    }

    pub fn status(&self) -> PoolStatus {
        *self.status.read().expect("status lock poisoned")
    }

    pub fn fight_ids(&self) -> Vec<String> {
        self.slots.keys().cloned().collect()
    }

    /// Administrative update path for the payout settings; affects future
    /// settlements only.
    pub fn update_settings(&self, settings: PayoutSettings) {
        let mut guard = self.settings.write().expect("settings lock poisoned");
        tracing::info!(
            old_fee = guard.platform_fee_percent,
            new_fee = settings.platform_fee_percent,
            "payout settings updated"
        );
        *guard = settings;
    }

    pub fn settings(&self) -> PayoutSettings {
        self.settings.read().expect("settings lock poisoned").clone()
    }

    /// Validate and commit one bet under the fight's critical section.
    ///
    /// The returned Bet carries the odds quoted at placement; the market is
    /// replaced with a recomputed snapshot before the section is released.
    pub async fn place_bet(&self, request: BetRequest) -> Result<Bet, BetError> {
        if self.status() != PoolStatus::Open {
            return Err(BetError::PoolNotOpen(self.event_id.clone()));
        }
        let slot = self
            .slots
            .get(&request.fight_id)
            .ok_or_else(|| BetError::UnknownFight(request.fight_id.clone()))?
            .clone();

        let mut slot = slot.lock().await;
        if !slot.open {
            return Err(BetError::MarketClosed(request.fight_id.clone()));
        }
        if request.stake <= 0.0 {
            return Err(BetError::NonPositiveStake(request.stake));
        }
        if request.stake < self.min_bet {
            return Err(BetError::BelowMinimum {
                stake: request.stake,
                min_bet: self.min_bet,
            });
        }
        if let Some(balance) = request.balance {
            if request.stake > balance {
                return Err(BetError::InsufficientBalance {
                    stake: request.stake,
                    balance,
                });
            }
        }
        let quoted_odds =
            slot.market
                .odds_for(&request.fighter_id)
                .ok_or_else(|| BetError::UnknownFighter {
                    fighter_id: request.fighter_id.clone(),
                    fight_id: request.fight_id.clone(),
                })?;

        let bet = Bet {
            id: format!("bet-{}", self.next_bet_id.fetch_add(1, Ordering::Relaxed)),
            bettor_id: request.bettor_id,
            bettor_name: request.bettor_name,
            event_id: self.event_id.clone(),
            fight_id: request.fight_id.clone(),
            fighter_id: request.fighter_id,
            stake: request.stake,
            odds: quoted_odds,
            format: slot.market.format,
            potential_payout: payout::potential_payout(
                request.stake,
                quoted_odds,
                slot.market.format,
            ),
            placed_at: Utc::now(),
            status: BetStatus::Pending,
            actual_payout: None,
            breakdown: None,
            settled_at: None,
        };
        slot.bets.push(bet.clone());

        // Requote from the updated pool; this replacement is the only path
        // that moves the fight's odds.
        self.requote(&mut slot);
        tracing::info!(
            fight_id = %bet.fight_id,
            bet_id = %bet.id,
            stake = bet.stake,
            odds = bet.odds,
            pool = slot.market.total_pool,
            "bet accepted"
        );
        Ok(bet)
    }

    fn requote(&self, slot: &mut FightSlot) {
        let fighter1 = self
            .roster
            .iter()
            .find(|f| f.id == slot.market.fighter1_id);
        let fighter2 = self
            .roster
            .iter()
            .find(|f| f.id == slot.market.fighter2_id);
        // Checked at construction; a miss here means the roster changed under us.
        let (Some(fighter1), Some(fighter2)) = (fighter1, fighter2) else {
            tracing::warn!(
                fight_id = %slot.market.fight_id,
                "cannot requote, fighters missing from the roster"
            );
            return;
        };
        let fight_id = slot.market.fight_id.clone();
        let format = slot.market.format;
        slot.market = market::build_market(
            fighter1,
            fighter2,
            &fight_id,
            &self.roster,
            &slot.bets,
            format,
            self.betting.vig_percent,
        );
    }

    /// Stop accepting bets on one fight.
    pub async fn close_fight(&self, fight_id: &str) -> Result<(), BetError> {
        let slot = self
            .slots
            .get(fight_id)
            .ok_or_else(|| BetError::UnknownFight(fight_id.to_string()))?;
        slot.lock().await.open = false;
        Ok(())
    }

    /// Stop accepting bets on the whole card.
    pub fn close(&self) {
        let mut status = self.status.write().expect("status lock poisoned");
        if *status == PoolStatus::Open {
            *status = PoolStatus::Closed;
        }
    }

    /// Settle one fight under its critical section and return that fight's
    /// bets. The fight is closed to new bets before any payout is computed, so
    /// nothing lands in the stale pool after the result is declared.
    pub async fn settle_fight(&self, fight_id: &str, winner_id: &str) -> Result<Vec<Bet>, BetError> {
        let slot = self
            .slots
            .get(fight_id)
            .ok_or_else(|| BetError::UnknownFight(fight_id.to_string()))?
            .clone();

        let mut slot = slot.lock().await;
        slot.open = false;

        if !slot.market.has_fighter(winner_id) {
            return Err(BetError::UnknownFighter {
                fighter_id: winner_id.to_string(),
                fight_id: fight_id.to_string(),
            });
        }

        let settings = self.settings();
        let bets = std::mem::take(&mut slot.bets);
        slot.bets = settlement::settle_fight(bets, &slot.market, winner_id, &settings);
        slot.settled = true;
        drop(slot);

        self.mark_settled_if_done().await;
        Ok(self.bets_for(fight_id).await)
    }

    /// Once every fight has settled, the pool itself is settled; it is never
    /// re-opened afterwards.
    async fn mark_settled_if_done(&self) {
        for slot in self.slots.values() {
            if !slot.lock().await.settled {
                return;
            }
        }
        *self.status.write().expect("status lock poisoned") = PoolStatus::Settled;
    }

    /// Snapshot of one fight's current market.
    pub async fn market(&self, fight_id: &str) -> Option<Market> {
        match self.slots.get(fight_id) {
            Some(slot) => Some(slot.lock().await.market.clone()),
            None => None,
        }
    }

    /// Snapshot of one fight's bets.
    pub async fn bets_for(&self, fight_id: &str) -> Vec<Bet> {
        match self.slots.get(fight_id) {
            Some(slot) => slot.lock().await.bets.clone(),
            None => Vec::new(),
        }
    }

    /// Snapshot of every bet on the card.
    pub async fn all_bets(&self) -> Vec<Bet> {
        let mut bets = Vec::new();
        for slot in self.slots.values() {
            bets.extend(slot.lock().await.bets.iter().cloned());
        }
        bets
    }

    /// Assemble the pool record reflecting the book's current state.
    pub async fn pool_snapshot(&self) -> BettingPool {
        let mut markets = Vec::with_capacity(self.slots.len());
        let mut bet_count = 0usize;
        let mut total_wagered = 0.0f64;
        for slot in self.slots.values() {
            let slot = slot.lock().await;
            markets.push(slot.market.clone());
            bet_count += slot.bets.len();
            total_wagered += slot.bets.iter().map(|b| b.stake).sum::<f64>();
        }
        markets.sort_by(|a, b| a.fight_id.cmp(&b.fight_id));

        BettingPool {
            event_id: self.event_id.clone(),
            event_date: self.event_date,
            event_type: self.event_type,
            min_bet: self.min_bet,
            markets,
            bet_count,
            total_wagered,
            status: self.status(),
            settings: self.settings(),
        }
    }
}
