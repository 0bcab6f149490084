use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::engine::odds::OddsFormat;
use crate::engine::probability::DEFAULT_VIG_PERCENT;

#[derive(Debug, Deserialize, Clone, Default)]
pub struct Config {
    #[serde(default)]
    pub betting: BettingConfig,
    #[serde(default)]
    pub payout: PayoutSettings,
    pub revenue: Option<RevenueConfig>,
    pub simulation: Option<SimulationConfig>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct BettingConfig {
    #[serde(default = "default_vig_percent")]
    pub vig_percent: f64,
    #[serde(default = "default_odds_format")]
    pub odds_format: OddsFormat,
    #[serde(default = "default_min_bet_regular")]
    pub min_bet_regular: f64,
    #[serde(default = "default_min_bet_special")]
    pub min_bet_special: f64,
    /// Tournaments charge a fixed entry per participant instead of a bet floor.
    #[serde(default = "default_tournament_entry_fee")]
    pub tournament_entry_fee: f64,
}

fn default_vig_percent() -> f64 { DEFAULT_VIG_PERCENT }
fn default_odds_format() -> OddsFormat { OddsFormat::American }
fn default_min_bet_regular() -> f64 { 50.0 }
fn default_min_bet_special() -> f64 { 100.0 }
fn default_tournament_entry_fee() -> f64 { 250.0 }

impl Default for BettingConfig {
    fn default() -> Self {
        Self {
            vig_percent: default_vig_percent(),
            odds_format: default_odds_format(),
            min_bet_regular: default_min_bet_regular(),
            min_bet_special: default_min_bet_special(),
            tournament_entry_fee: default_tournament_entry_fee(),
        }
    }
}

/// Platform cut applied at settlement. Read by both quoting and settlement as
/// an explicit value; the only mutation path is the book's admin update.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct PayoutSettings {
    #[serde(default = "default_platform_fee_percent")]
    pub platform_fee_percent: f64,
}

fn default_platform_fee_percent() -> f64 { 10.0 }

impl Default for PayoutSettings {
    fn default() -> Self {
        Self {
            platform_fee_percent: default_platform_fee_percent(),
        }
    }
}

/// Extended revenue knobs for the league's back office. The engine itself only
/// reads the platform fee; these split the fee revenue in reporting.
#[derive(Debug, Deserialize, Clone)]
pub struct RevenueConfig {
    #[serde(default = "default_trainer_wage_percent")]
    pub trainer_wage_percent: f64,
    #[serde(default = "default_event_cut_percent")]
    pub event_cut_percent: f64,
    #[serde(default = "default_manager_commission_percent")]
    pub manager_commission_percent: f64,
}

fn default_trainer_wage_percent() -> f64 { 40.0 }
fn default_event_cut_percent() -> f64 { 35.0 }
fn default_manager_commission_percent() -> f64 { 25.0 }

impl Default for RevenueConfig {
    fn default() -> Self {
        Self {
            trainer_wage_percent: default_trainer_wage_percent(),
            event_cut_percent: default_event_cut_percent(),
            manager_commission_percent: default_manager_commission_percent(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct SimulationConfig {
    #[serde(default = "default_roster_size")]
    pub roster_size: usize,
    #[serde(default = "default_bouts")]
    pub bouts: usize,
    #[serde(default = "default_bettor_count")]
    pub bettor_count: usize,
    #[serde(default = "default_max_stake")]
    pub max_stake: f64,
    #[serde(default = "default_seed")]
    pub seed: u64,
}

fn default_roster_size() -> usize { 16 }
fn default_bouts() -> usize { 4 }
fn default_bettor_count() -> usize { 24 }
fn default_max_stake() -> f64 { 500.0 }
fn default_seed() -> u64 { 7 }

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            roster_size: default_roster_size(),
            bouts: default_bouts(),
            bettor_count: default_bettor_count(),
            max_stake: default_max_stake(),
            seed: default_seed(),
        }
    }
}

impl Config {
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let config: Config =
            toml::from_str(&content).with_context(|| "Failed to parse config TOML")?;
        Ok(config)
    }

    /// Load `path` if it exists, defaults otherwise.
    pub fn load_or_default(path: &Path) -> Result<Self> {
        if path.exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }
}
