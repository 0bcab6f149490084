//! Fighter strength model.
//!
//! Folds rank, career record, ranking points, experience, and recent form into
//! one fitness score, clamped so no fighter is ever quoted as a certainty:
//!
//! `strength = 0.30*rank + 0.25*win_rate + 0.20*points + 0.10*ko_rate
//!           + 0.10*experience + 0.05*recent_form`, clamped to [0.1, 0.9].

use crate::types::{FightOutcome, FighterRecord};

pub const MIN_STRENGTH: f64 = 0.1;
pub const MAX_STRENGTH: f64 = 0.9;

const RANK_WEIGHT: f64 = 0.30;
const WIN_RATE_WEIGHT: f64 = 0.25;
const POINTS_WEIGHT: f64 = 0.20;
const KO_RATE_WEIGHT: f64 = 0.10;
const EXPERIENCE_WEIGHT: f64 = 0.10;
const RECENT_FORM_WEIGHT: f64 = 0.05;

/// Points that saturate the points component.
const POINTS_CEILING: f64 = 1000.0;
/// Fights that saturate the experience component.
const EXPERIENCE_CEILING: f64 = 20.0;
/// How many recent results feed the form component.
const FORM_WINDOW: usize = 5;

/// 1-based rank among fighters with positive ranking points, sorted by points
/// descending, then wins descending, then losses ascending, then id for a
/// deterministic order. `None` if the fighter holds no positive points.
fn rank_of(fighter: &FighterRecord, roster: &[FighterRecord]) -> Option<usize> {
    let mut ranked: Vec<&FighterRecord> =
        roster.iter().filter(|f| f.ranking_points > 0.0).collect();
    ranked.sort_by(|a, b| {
        b.ranking_points
            .total_cmp(&a.ranking_points)
            .then(b.wins.cmp(&a.wins))
            .then(a.losses.cmp(&b.losses))
            .then(a.id.cmp(&b.id))
    });
    ranked.iter().position(|f| f.id == fighter.id).map(|i| i + 1)
}

/// Rank normalized so rank 1 of N scores 1.0 and rank N scores 1/N.
/// 0.5 for an unranked fighter or an empty ranking.
fn rank_score(fighter: &FighterRecord, roster: &[FighterRecord]) -> f64 {
    let n = roster.iter().filter(|f| f.ranking_points > 0.0).count();
    if n == 0 {
        return 0.5;
    }
    match rank_of(fighter, roster) {
        Some(rank) => (n - rank + 1) as f64 / n as f64,
        None => 0.5,
    }
}

/// Weighted average over up to the 5 most recent non-pending results.
/// Index 0 is the most recent fight and carries the most weight; a knockout win
/// scores above a regular win, anything else scores 0.3. 0.5 with no history.
fn recent_form_score(history: &[FightOutcome]) -> f64 {
    let recent: Vec<&FightOutcome> = history
        .iter()
        .filter(|outcome| **outcome != FightOutcome::Pending)
        .take(FORM_WINDOW)
        .collect();
    if recent.is_empty() {
        return 0.5;
    }

    let total: f64 = recent
        .iter()
        .enumerate()
        .map(|(index, outcome)| {
            let weight = 1.0 - 0.1 * index as f64;
            match outcome {
                FightOutcome::Win => 1.0 * weight,
                FightOutcome::Knockout => 1.2 * weight,
                _ => 0.3 * weight,
            }
        })
        .sum();
    total / recent.len() as f64
}

/// Strength score for one fighter relative to the full roster.
pub fn strength_score(fighter: &FighterRecord, roster: &[FighterRecord]) -> f64 {
    let total_fights = fighter.total_fights();
    let win_rate = if total_fights == 0 {
        0.5
    } else {
        fighter.wins as f64 / total_fights as f64
    };
    let ko_rate = if total_fights == 0 {
        0.0
    } else {
        fighter.knockouts as f64 / total_fights as f64
    };
    let points_score = (fighter.ranking_points / POINTS_CEILING).min(1.0);
    let experience_score = (total_fights as f64 / EXPERIENCE_CEILING).min(1.0);

    let strength = rank_score(fighter, roster) * RANK_WEIGHT
        + win_rate * WIN_RATE_WEIGHT
        + points_score * POINTS_WEIGHT
        + ko_rate * KO_RATE_WEIGHT
        + experience_score * EXPERIENCE_WEIGHT
        + recent_form_score(&fighter.fight_history) * RECENT_FORM_WEIGHT;

    strength.clamp(MIN_STRENGTH, MAX_STRENGTH)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fighter(id: &str, wins: u32, losses: u32, knockouts: u32, points: f64) -> FighterRecord {
        FighterRecord {
            id: id.to_string(),
            first_name: "Test".to_string(),
            last_name: id.to_string(),
            wins,
            losses,
            knockouts,
            ranking_points: points,
            fight_history: vec![],
        }
    }

    #[test]
    fn test_rank_sorted_by_points_then_record() {
        let roster = vec![
            fighter("a", 5, 5, 0, 800.0),
            fighter("b", 8, 2, 1, 800.0),
            fighter("c", 0, 0, 0, 1200.0),
            fighter("d", 3, 3, 0, 0.0), // unranked: no positive points
        ];
        assert_eq!(rank_of(&roster[2], &roster), Some(1)); // most points
        assert_eq!(rank_of(&roster[1], &roster), Some(2)); // tied points, more wins
        assert_eq!(rank_of(&roster[0], &roster), Some(3));
        assert_eq!(rank_of(&roster[3], &roster), None);
    }

    #[test]
    fn test_rank_score_unranked_is_half() {
        let roster = vec![fighter("a", 5, 5, 0, 800.0), fighter("b", 3, 3, 0, 0.0)];
        assert!((rank_score(&roster[1], &roster) - 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_rank_score_empty_roster_is_half() {
        let f = fighter("a", 5, 5, 0, 800.0);
        assert!((rank_score(&f, &[]) - 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_recent_form_weights() {
        // [KO, Win, Loss]: (1.2*1.0 + 1.0*0.9 + 0.3*0.8) / 3 = 2.34 / 3 = 0.78
        let history = vec![
            FightOutcome::Knockout,
            FightOutcome::Win,
            FightOutcome::Loss,
        ];
        assert!((recent_form_score(&history) - 0.78).abs() < 1e-9);
    }

    #[test]
    fn test_recent_form_skips_pending_and_windows_to_five() {
        // Pending entries are dropped before the window is applied, so the
        // sixth non-pending result never contributes.
        let history = vec![
            FightOutcome::Pending,
            FightOutcome::Win,
            FightOutcome::Win,
            FightOutcome::Win,
            FightOutcome::Win,
            FightOutcome::Win,
            FightOutcome::Loss,
        ];
        // Five wins: (1.0 + 0.9 + 0.8 + 0.7 + 0.6) / 5 = 0.8
        assert!((recent_form_score(&history) - 0.8).abs() < 1e-9);
    }

    #[test]
    fn test_recent_form_empty_is_half() {
        assert!((recent_form_score(&[]) - 0.5).abs() < 1e-9);
        assert!((recent_form_score(&[FightOutcome::Pending]) - 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_debut_fighter_components() {
        // 0 fights, 0 points, empty roster: rank 0.5, win rate 0.5, ko 0,
        // points 0, experience 0, form 0.5
        // = 0.15 + 0.125 + 0 + 0 + 0 + 0.025 = 0.30
        let f = fighter("rookie", 0, 0, 0, 0.0);
        assert!((strength_score(&f, &[]) - 0.30).abs() < 1e-9);
    }

    #[test]
    fn test_strength_clamped_high() {
        // Rank 1, 18-2 with 18 KOs, saturated points/experience, KO streak:
        // raw 0.3 + 0.225 + 0.2 + 0.09 + 0.1 + 0.048 = 0.963 > ceiling
        let mut champ = fighter("champ", 18, 2, 18, 1500.0);
        champ.fight_history = vec![FightOutcome::Knockout; 5];
        let mut roster = vec![champ.clone()];
        roster.push(fighter("b", 5, 5, 0, 100.0));
        assert!((strength_score(&champ, &roster) - MAX_STRENGTH).abs() < 1e-9);
    }

    #[test]
    fn test_strength_clamped_low() {
        // Bottom-ranked 0-2 fighter on a losing streak:
        // rank 1/20 -> 0.05*0.3 = 0.015; win rate 0; points 1/1000 * 0.2 = 0.0002;
        // ko 0; experience 2/20 * 0.1 = 0.01; form 0.3*0.95 * 0.05 = 0.01425
        // = 0.03945 -> clamps to the 0.1 floor.
        let mut hopeless = fighter("h", 0, 2, 0, 1.0);
        hopeless.fight_history = vec![FightOutcome::Loss, FightOutcome::Loss];
        let mut roster = vec![hopeless.clone()];
        for i in 0..19 {
            roster.push(fighter(&format!("f{i}"), 10, 2, 4, 500.0 + i as f64));
        }
        assert!((strength_score(&hopeless, &roster) - MIN_STRENGTH).abs() < 1e-9);
    }

    #[test]
    fn test_contender_vs_journeyman_ordering() {
        let mut a = fighter("a", 10, 0, 8, 1200.0);
        a.fight_history = vec![FightOutcome::Knockout; 5];
        let mut b = fighter("b", 2, 8, 0, 50.0);
        b.fight_history = vec![FightOutcome::Loss; 5];
        let roster = vec![a.clone(), b.clone()];

        let sa = strength_score(&a, &roster);
        let sb = strength_score(&b, &roster);
        assert!(sa > sb + 0.3, "expected a dominant gap, got {sa} vs {sb}");
    }
}
