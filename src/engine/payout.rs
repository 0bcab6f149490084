//! Payout math: gross returns for a stake at quoted odds, and the three-way
//! settlement split between bettor, house, and platform.

use crate::config::PayoutSettings;
use crate::engine::odds::OddsFormat;
use crate::types::PayoutBreakdown;

/// Total return (stake + profit) for a stake at the given odds.
///
/// American favorites pay `stake + stake/|odds|*100`, underdogs
/// `stake + stake*odds/100`; decimal pays `stake * odds`; fractional odds are
/// stored as the profit ratio, so they pay `stake * (1 + ratio)`.
pub fn potential_payout(stake: f64, odds: f64, format: OddsFormat) -> f64 {
    match format {
        OddsFormat::American => {
            if odds < 0.0 {
                stake + stake / odds.abs() * 100.0
            } else {
                stake + stake * odds / 100.0
            }
        }
        OddsFormat::Decimal => stake * odds,
        OddsFormat::Fractional => stake * (1.0 + odds),
    }
}

/// The platform fee is always computed from the original stake, independent of
/// the bet's outcome.
pub fn platform_fee(stake: f64, settings: &PayoutSettings) -> f64 {
    stake * settings.platform_fee_percent / 100.0
}

/// Split for a winning bet. `total_winnings` is the potential payout locked at
/// placement; the house books the shortfall between the stake it held and the
/// gross it pays out, which goes negative on a net-losing book.
pub fn winning_breakdown(
    stake: f64,
    total_winnings: f64,
    settings: &PayoutSettings,
) -> PayoutBreakdown {
    let fee = platform_fee(stake, settings);
    PayoutBreakdown {
        original_bet: stake,
        total_winnings,
        bettor_payout: total_winnings - fee,
        platform_fee: fee,
        house_profit: stake - total_winnings,
    }
}

/// Split for a losing bet: the bettor gets nothing and the house keeps the
/// stake net of the platform fee.
pub fn losing_breakdown(stake: f64, settings: &PayoutSettings) -> PayoutBreakdown {
    let fee = platform_fee(stake, settings);
    PayoutBreakdown {
        original_bet: stake,
        total_winnings: 0.0,
        bettor_payout: 0.0,
        platform_fee: fee,
        house_profit: stake - fee,
    }
}
