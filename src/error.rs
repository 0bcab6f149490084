use thiserror::Error;

/// Recoverable bet-placement and settlement errors, reported to the caller
/// with a specific message rather than silently clamped or defaulted.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum BetError {
    #[error("stake ${stake:.2} is below the ${min_bet:.2} minimum for this event")]
    BelowMinimum { stake: f64, min_bet: f64 },

    #[error("stake ${stake:.2} exceeds available balance ${balance:.2}")]
    InsufficientBalance { stake: f64, balance: f64 },

    #[error("stake must be positive, got ${0:.2}")]
    NonPositiveStake(f64),

    #[error("fighter {fighter_id} is not in fight {fight_id}")]
    UnknownFighter {
        fighter_id: String,
        fight_id: String,
    },

    #[error("no market for fight {0}")]
    UnknownFight(String),

    #[error("betting is closed for fight {0}")]
    MarketClosed(String),

    #[error("the pool for event {0} is not open")]
    PoolNotOpen(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_name_the_amounts() {
        let err = BetError::BelowMinimum {
            stake: 10.0,
            min_bet: 50.0,
        };
        assert_eq!(
            err.to_string(),
            "stake $10.00 is below the $50.00 minimum for this event"
        );

        let err = BetError::InsufficientBalance {
            stake: 200.0,
            balance: 120.5,
        };
        assert_eq!(
            err.to_string(),
            "stake $200.00 exceeds available balance $120.50"
        );
    }
}
