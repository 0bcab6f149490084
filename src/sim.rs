//! Simulated event day for exercising the book end to end: a seeded roster, a
//! fight card, concurrent bettors, and a results source standing in for the
//! judges' table.

use std::collections::VecDeque;
use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::book::{BetRequest, MarketBook};
use crate::config::SimulationConfig;
use crate::engine::pool::CardFight;
use crate::engine::{probability, strength};
use crate::error::BetError;
use crate::types::{FightOutcome, FightResult, FighterRecord};

const FIRST_NAMES: &[&str] = &[
    "Marco", "Deon", "Ivan", "Tommy", "Rocco", "Elias", "Andre", "Felix", "Hugo", "Sefo", "Nikolai",
    "Ray", "Custio", "Benny", "Oscar", "Teofimo",
];

const LAST_NAMES: &[&str] = &[
    "Barrios", "Castillo", "Drago", "Fury", "Galvez", "Holm", "Ivanov", "Jacobs", "Kovacs",
    "Leonard", "Mendez", "Novak", "Okafor", "Pryor", "Quinn", "Rios",
];

/// Source of declared fight results. In production this is the judges' table
/// or an official results backend; the simulator stands one in.
#[async_trait]
pub trait ResultFeed: Send + Sync {
    /// Next declared result, `None` once the card is decided.
    async fn next_result(&mut self) -> Result<Option<FightResult>>;
}

/// Generate a roster of fighters with plausible records. Seeded, so a given
/// configuration always produces the same card.
pub fn generate_roster(count: usize, rng: &mut StdRng) -> Vec<FighterRecord> {
    (0..count)
        .map(|i| {
            let wins = rng.gen_range(0..25u32);
            let losses = rng.gen_range(0..12u32);
            let knockouts = if wins == 0 { 0 } else { rng.gen_range(0..=wins) };
            let history_len = rng.gen_range(0..8usize);
            let fight_history = (0..history_len)
                .map(|_| match rng.gen_range(0..10u8) {
                    0..=3 => FightOutcome::Win,
                    4..=5 => FightOutcome::Knockout,
                    6..=8 => FightOutcome::Loss,
                    _ => FightOutcome::Pending,
                })
                .collect();
            FighterRecord {
                id: format!("fighter-{}", i + 1),
                first_name: FIRST_NAMES[i % FIRST_NAMES.len()].to_string(),
                last_name: LAST_NAMES[(i / FIRST_NAMES.len() + i) % LAST_NAMES.len()].to_string(),
                wins,
                losses,
                knockouts,
                ranking_points: rng.gen_range(0.0..1500.0),
                fight_history,
            }
        })
        .collect()
}

/// Pair the roster off into a card of `bouts` fights.
pub fn fight_card(roster: &[FighterRecord], bouts: usize) -> Vec<CardFight> {
    roster
        .chunks(2)
        .take(bouts)
        .enumerate()
        .filter_map(|(i, pair)| match pair {
            [fighter1, fighter2] => Some(CardFight {
                fighter1_id: fighter1.id.clone(),
                fighter2_id: fighter2.id.clone(),
                fight_id: format!("fight-{}", i + 1),
            }),
            _ => None,
        })
        .collect()
}

/// Simulated judges: each winner is drawn once up front, weighted by the
/// model's own probabilities.
pub struct SimulatedResults {
    results: VecDeque<FightResult>,
}

impl SimulatedResults {
    pub fn new(roster: &[FighterRecord], fights: &[CardFight], rng: &mut StdRng) -> Self {
        let mut results = VecDeque::new();
        for fight in fights {
            let fighter1 = roster.iter().find(|f| f.id == fight.fighter1_id);
            let fighter2 = roster.iter().find(|f| f.id == fight.fighter2_id);
            let (Some(fighter1), Some(fighter2)) = (fighter1, fighter2) else {
                continue;
            };
            let (p1, _) = probability::implied_pair(
                strength::strength_score(fighter1, roster),
                strength::strength_score(fighter2, roster),
            );
            let winner_id = if rng.gen::<f64>() < p1 {
                fighter1.id.clone()
            } else {
                fighter2.id.clone()
            };
            results.push_back(FightResult {
                fight_id: fight.fight_id.clone(),
                winner_id,
            });
        }
        Self { results }
    }
}

#[async_trait]
impl ResultFeed for SimulatedResults {
    async fn next_result(&mut self) -> Result<Option<FightResult>> {
        Ok(self.results.pop_front())
    }
}

/// Outcome counts from a simulated betting window.
#[derive(Debug, Default, Clone, Copy)]
pub struct BettingWindowReport {
    pub accepted: usize,
    pub rejected: usize,
}

/// Spawn `bettor_count` concurrent bettors against the book. Each bettor picks
/// a fight, leans toward the quoted favorite, and stakes a seeded random
/// amount; stakes below the event minimum come up occasionally and bounce off
/// the book's validation.
pub async fn run_bettors(book: Arc<MarketBook>, sim: &SimulationConfig) -> BettingWindowReport {
    let fight_ids = {
        let mut ids = book.fight_ids();
        ids.sort();
        ids
    };
    if fight_ids.is_empty() {
        return BettingWindowReport::default();
    }

    let mut handles = Vec::with_capacity(sim.bettor_count);
    for i in 0..sim.bettor_count {
        let book = book.clone();
        let fight_ids = fight_ids.clone();
        let seed = sim.seed.wrapping_add(i as u64 + 1);
        let max_stake = sim.max_stake;
        handles.push(tokio::spawn(async move {
            let mut rng = StdRng::seed_from_u64(seed);
            let fight_id = fight_ids[rng.gen_range(0..fight_ids.len())].clone();
            let market = match book.market(&fight_id).await {
                Some(market) => market,
                None => return Err(BetError::UnknownFight(fight_id)),
            };
            // Two thirds of the crowd backs the favorite.
            let favorite_first = market.fighter1_probability >= market.fighter2_probability;
            let back_favorite = rng.gen::<f64>() < 0.66;
            let fighter_id = if favorite_first == back_favorite {
                market.fighter1_id.clone()
            } else {
                market.fighter2_id.clone()
            };
            let stake = (rng.gen_range(0.05..1.0) * max_stake).round();
            book.place_bet(BetRequest {
                bettor_id: format!("bettor-{}", i + 1),
                bettor_name: format!("Bettor {}", i + 1),
                fight_id,
                fighter_id,
                stake,
                balance: None,
            })
            .await
        }));
    }

    let mut report = BettingWindowReport::default();
    for handle in handles {
        match handle.await {
            Ok(Ok(_)) => report.accepted += 1,
            Ok(Err(error)) => {
                tracing::debug!(%error, "bet rejected");
                report.rejected += 1;
            }
            Err(join_error) => {
                tracing::warn!(%join_error, "bettor task panicked");
                report.rejected += 1;
            }
        }
    }
    report
}
