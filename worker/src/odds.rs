//! Display odds derived from pool balances.
//!
//! Odds are parimutuel estimates, not a price: they show what one unit staked
//! on an outcome would return if the pools froze right now. They are kept as
//! integer hundredths so the whole pipeline stays float-free.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::amount::Amount;
use crate::types::{Outcome, Pools};

/// Floor applied to any computed odds so a dominant pool never drops the
/// multiplier below break-even minus one percent.
const MIN_ODDS_HUNDREDTHS: u128 = 101;

/// Cold-start defaults shown before any money is in the pools.
const DEFAULT_HOME_HUNDREDTHS: u128 = 200;
const DEFAULT_AWAY_HUNDREDTHS: u128 = 200;
const DEFAULT_DRAW_HUNDREDTHS: u128 = 300;

/// A payout multiplier in hundredths, e.g. `OddsValue(166)` renders as `1.66x`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OddsValue(pub u128);

impl fmt::Display for OddsValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{:02}x", self.0 / 100, self.0 % 100)
    }
}

/// Current odds for all three outcomes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OddsTable {
    pub home: OddsValue,
    pub away: OddsValue,
    pub draw: OddsValue,
}

/// Computes display odds from the current pools.
///
/// With an empty market the cold-start defaults apply. An outcome nobody has
/// backed yet gets a longshot quote of one whole token above the total pool.
/// Otherwise the multiplier is `floor(total * 100 / pool)` hundredths,
/// clamped to [`MIN_ODDS_HUNDREDTHS`].
pub fn calculate_odds(pools: &Pools, total_pool: Amount) -> OddsTable {
    if total_pool.is_zero() {
        return OddsTable {
            home: OddsValue(DEFAULT_HOME_HUNDREDTHS),
            away: OddsValue(DEFAULT_AWAY_HUNDREDTHS),
            draw: OddsValue(DEFAULT_DRAW_HUNDREDTHS),
        };
    }

    let quote = |outcome: Outcome| {
        let pool = pools.get(outcome);
        if pool.is_zero() {
            OddsValue((total_pool.whole_tokens() + 1) * 100)
        } else {
            OddsValue((total_pool.0 * 100 / pool.0).max(MIN_ODDS_HUNDREDTHS))
        }
    };

    OddsTable {
        home: quote(Outcome::Home),
        away: quote(Outcome::Away),
        draw: quote(Outcome::Draw),
    }
}
