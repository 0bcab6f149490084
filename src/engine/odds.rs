//! Odds conversions between the American, decimal, and fractional conventions.
//!
//! All three are views over the same normalized probability; conversions are
//! exact and round-trip within rounding tolerance. Fractional odds are stored
//! as the profit ratio `numerator/denominator` and rendered reduced.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OddsFormat {
    American,
    Decimal,
    Fractional,
}

impl fmt::Display for OddsFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            OddsFormat::American => "american",
            OddsFormat::Decimal => "decimal",
            OddsFormat::Fractional => "fractional",
        };
        f.write_str(name)
    }
}

/// An unrecognized format string is a programming error at the call boundary,
/// never silently defaulted.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unrecognized odds format: {0:?}")]
pub struct ParseOddsFormatError(pub String);

impl FromStr for OddsFormat {
    type Err = ParseOddsFormatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "american" => Ok(OddsFormat::American),
            "decimal" => Ok(OddsFormat::Decimal),
            "fractional" => Ok(OddsFormat::Fractional),
            _ => Err(ParseOddsFormatError(s.to_string())),
        }
    }
}

/// American odds from a win probability. `p >= 0.5` quotes the favorite
/// (negative), `p < 0.5` the underdog (positive); both round to a whole number.
pub fn probability_to_american(p: f64) -> f64 {
    if p >= 0.5 {
        (-100.0 * p / (1.0 - p)).round()
    } else {
        (100.0 * (1.0 - p) / p).round()
    }
}

/// Decimal odds (`1/p`), rounded to 2 decimals.
pub fn probability_to_decimal(p: f64) -> f64 {
    round2(1.0 / p)
}

/// Reduced fractional odds derived through the decimal quote:
/// `num = round((decimal - 1) * 100)`, `den = 100`, reduced by GCD.
pub fn probability_to_fractional(p: f64) -> (u64, u64) {
    let decimal = probability_to_decimal(p);
    let numerator = ((decimal - 1.0) * 100.0).round() as u64;
    let denominator = 100u64;
    let divisor = gcd(numerator, denominator);
    (numerator / divisor, denominator / divisor)
}

/// Implied win probability from an American quote:
/// `|odds|/(|odds|+100)` for favorites, `100/(odds+100)` for underdogs.
pub fn american_to_probability(odds: f64) -> f64 {
    if odds < 0.0 {
        let abs = odds.abs();
        abs / (abs + 100.0)
    } else {
        100.0 / (odds + 100.0)
    }
}

/// The odds value stored on a Market for `format`. Fractional markets store
/// the profit ratio (e.g. 3/2 is stored as 1.5).
pub fn probability_to_odds(p: f64, format: OddsFormat) -> f64 {
    match format {
        OddsFormat::American => probability_to_american(p),
        OddsFormat::Decimal => probability_to_decimal(p),
        OddsFormat::Fractional => {
            let (numerator, denominator) = probability_to_fractional(p);
            numerator as f64 / denominator as f64
        }
    }
}

/// Display string for a stored odds value. American quotes carry an explicit
/// `+` for underdogs; fractional quotes derive the reduced fraction from the
/// probability when it is known and fall back to `odds/1` otherwise.
pub fn format_odds(odds: f64, format: OddsFormat, probability: Option<f64>) -> String {
    match format {
        OddsFormat::American => {
            if odds > 0.0 {
                format!("+{}", odds as i64)
            } else {
                format!("{}", odds as i64)
            }
        }
        OddsFormat::Decimal => format!("{odds:.2}"),
        OddsFormat::Fractional => match probability {
            Some(p) => {
                let (numerator, denominator) = probability_to_fractional(p);
                format!("{numerator}/{denominator}")
            }
            None => format!("{odds}/1"),
        },
    }
}

fn round2(x: f64) -> f64 {
    (x * 100.0).round() / 100.0
}

/// Greatest common divisor, iterative Euclid.
fn gcd(mut a: u64, mut b: u64) -> u64 {
    while b != 0 {
        let remainder = a % b;
        a = b;
        b = remainder;
    }
    a
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_american_favorite_and_underdog() {
        // p=0.6 -> -100*0.6/0.4 = -150; p=0.4 -> 100*0.6/0.4 = +150
        assert_eq!(probability_to_american(0.6), -150.0);
        assert_eq!(probability_to_american(0.4), 150.0);
        // Pick-em quotes the favorite side of the boundary.
        assert_eq!(probability_to_american(0.5), -100.0);
    }

    #[test]
    fn test_american_rounds_to_whole_number() {
        // p=0.52 -> -108.33 -> -108
        assert_eq!(probability_to_american(0.52), -108.0);
    }

    #[test]
    fn test_decimal() {
        assert_eq!(probability_to_decimal(0.5), 2.0);
        assert_eq!(probability_to_decimal(0.4), 2.5);
        // 1/0.3 = 3.333... -> 3.33
        assert_eq!(probability_to_decimal(0.3), 3.33);
    }

    #[test]
    fn test_fractional_reduces() {
        // p=0.4 -> decimal 2.50 -> 150/100 -> 3/2
        assert_eq!(probability_to_fractional(0.4), (3, 2));
        // p=0.5 -> decimal 2.00 -> 100/100 -> 1/1
        assert_eq!(probability_to_fractional(0.5), (1, 1));
        // p=0.8 -> decimal 1.25 -> 25/100 -> 1/4
        assert_eq!(probability_to_fractional(0.8), (1, 4));
    }

    #[test]
    fn test_american_to_probability() {
        assert!((american_to_probability(-150.0) - 0.6).abs() < 1e-9);
        assert!((american_to_probability(150.0) - 0.4).abs() < 1e-9);
        assert!((american_to_probability(-100.0) - 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_american_round_trip_law() {
        // Whole-number rounding perturbs the probability by at most ~1/800
        // anywhere on the quotable range.
        let mut p = 0.05;
        while p < 0.95 {
            let odds = probability_to_american(p);
            let back = american_to_probability(odds);
            assert!((back - p).abs() < 5e-3, "p={p} odds={odds} back={back}");
            p += 0.01;
        }
    }

    #[test]
    fn test_probability_to_odds_fractional_ratio() {
        // Stored fractional value is the profit ratio: 3/2 -> 1.5
        assert!((probability_to_odds(0.4, OddsFormat::Fractional) - 1.5).abs() < 1e-9);
    }

    #[test]
    fn test_format_odds_display() {
        assert_eq!(format_odds(150.0, OddsFormat::American, None), "+150");
        assert_eq!(format_odds(-150.0, OddsFormat::American, None), "-150");
        assert_eq!(format_odds(2.5, OddsFormat::Decimal, None), "2.50");
        assert_eq!(format_odds(1.5, OddsFormat::Fractional, Some(0.4)), "3/2");
        assert_eq!(format_odds(1.5, OddsFormat::Fractional, None), "1.5/1");
    }

    #[test]
    fn test_format_parse_round_trip() {
        for format in [
            OddsFormat::American,
            OddsFormat::Decimal,
            OddsFormat::Fractional,
        ] {
            assert_eq!(format.to_string().parse::<OddsFormat>(), Ok(format));
        }
    }

    #[test]
    fn test_unrecognized_format_is_rejected() {
        let err = "martingale".parse::<OddsFormat>().unwrap_err();
        assert_eq!(err, ParseOddsFormatError("martingale".to_string()));
    }

    #[test]
    fn test_gcd() {
        assert_eq!(gcd(150, 100), 50);
        assert_eq!(gcd(100, 100), 100);
        assert_eq!(gcd(0, 100), 100);
        assert_eq!(gcd(7, 100), 1);
    }
}
