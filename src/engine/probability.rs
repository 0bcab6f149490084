//! Win-probability pair and parimutuel pool blending.
//!
//! Model probabilities come from the strength scores alone; once money is in
//! the pool they are blended 70/30 with the wager distribution and loaded with
//! the house vig, then the pair is renormalized so both sides sum to 1.

pub const DEFAULT_VIG_PERCENT: f64 = 5.0;

const MODEL_WEIGHT: f64 = 0.7;
const POOL_WEIGHT: f64 = 0.3;

/// Clamp bounds keeping quotes away from degenerate near-certainties.
const PROB_FLOOR: f64 = 0.05;
const PROB_CEILING: f64 = 0.95;

/// Complementary implied win probabilities from two strength scores:
/// `p1 = s1/(s1+s2)`, `p2 = s2/(s1+s2)`. Falls back to a coin flip if both
/// strengths are zero (strengths are floor-clamped upstream, so this guard is
/// for callers feeding raw values).
pub fn implied_pair(strength1: f64, strength2: f64) -> (f64, f64) {
    let total = strength1 + strength2;
    if total == 0.0 {
        return (0.5, 0.5);
    }
    (strength1 / total, strength2 / total)
}

/// One side's pool-adjusted, vig-loaded probability, before renormalization.
///
/// With an empty pool the model probability passes through untouched. Otherwise
/// the side with less money on it reads as "more likely" to a book seeking
/// balance: `pool_prob = opponent_pool / total_pool`.
fn adjust_side(base: f64, own_pool: f64, opponent_pool: f64, vig_percent: f64) -> f64 {
    let total_pool = own_pool + opponent_pool;
    if total_pool == 0.0 {
        return base;
    }
    let pool_prob = opponent_pool / total_pool;
    let adjusted = MODEL_WEIGHT * base + POOL_WEIGHT * pool_prob;
    let with_vig = adjusted * (1.0 + vig_percent / 100.0);
    with_vig.clamp(PROB_FLOOR, PROB_CEILING)
}

/// Pool-adjusted probability pair for both sides of a fight.
///
/// Each side is adjusted independently; the two vig-loaded values do not sum
/// to 1 on their own, so the renormalization here is mandatory before odds are
/// derived from the pair.
pub fn pool_adjusted_pair(
    base1: f64,
    base2: f64,
    pool1: f64,
    pool2: f64,
    vig_percent: f64,
) -> (f64, f64) {
    let adjusted1 = adjust_side(base1, pool1, pool2, vig_percent);
    let adjusted2 = adjust_side(base2, pool2, pool1, vig_percent);
    let total = adjusted1 + adjusted2;
    if total == 0.0 {
        return (0.5, 0.5);
    }
    (adjusted1 / total, adjusted2 / total)
}
