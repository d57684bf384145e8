//! Shared domain types mirrored from the on-chain market accounts.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::amount::Amount;

/// The three outcomes a match can settle to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Outcome {
    Home,
    Away,
    Draw,
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Outcome::Home => "Home Win",
            Outcome::Away => "Away Win",
            Outcome::Draw => "Draw",
        };
        f.write_str(label)
    }
}

/// Lifecycle of a market as reported by the ledger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", content = "winner")]
pub enum MarketStatus {
    Open,
    Locked,
    Resolved(Outcome),
    Cancelled,
}

impl MarketStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(self, MarketStatus::Resolved(_) | MarketStatus::Cancelled)
    }
}

/// Final score of a completed match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Score {
    pub home: u32,
    pub away: u32,
}

/// Stake totals per outcome.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pools {
    pub home: Amount,
    pub away: Amount,
    pub draw: Amount,
}

impl Pools {
    pub fn get(&self, outcome: Outcome) -> Amount {
        match outcome {
            Outcome::Home => self.home,
            Outcome::Away => self.away,
            Outcome::Draw => self.draw,
        }
    }

    pub fn get_mut(&mut self, outcome: Outcome) -> &mut Amount {
        match outcome {
            Outcome::Home => &mut self.home,
            Outcome::Away => &mut self.away,
            Outcome::Draw => &mut self.draw,
        }
    }
}

/// One recorded bet inside a market snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BetInfo {
    pub bet_id: u64,
    pub bettor: String,
    pub outcome: Outcome,
    pub amount: Amount,
}

/// A market as fetched from the ledger, with every bet it holds.
///
/// Invariant: `total_pool` equals the sum of `pools` and of all bet amounts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarketSnapshot {
    pub event_id: String,
    pub status: MarketStatus,
    pub pools: Pools,
    pub total_pool: Amount,
    pub bets: Vec<BetInfo>,
}

/// An instruction to credit one bettor for one settled bet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayoutInstruction {
    pub event_id: String,
    pub bet_id: u64,
    pub bettor: String,
    pub amount: Amount,
}

/// The published outcome of a finished event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventResult {
    pub event_id: String,
    pub outcome: Outcome,
    pub score: Option<Score>,
    pub timestamp: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn market_status_wire_format_is_stable() {
        assert_eq!(
            serde_json::to_string(&MarketStatus::Open).unwrap(),
            r#"{"status":"Open"}"#
        );
        assert_eq!(
            serde_json::to_string(&MarketStatus::Resolved(Outcome::Away)).unwrap(),
            r#"{"status":"Resolved","winner":"Away"}"#
        );
        let parsed: MarketStatus =
            serde_json::from_str(r#"{"status":"Resolved","winner":"Draw"}"#).unwrap();
        assert_eq!(parsed, MarketStatus::Resolved(Outcome::Draw));
    }

    #[test]
    fn amounts_serialize_as_bare_integers() {
        let instruction = PayoutInstruction {
            event_id: "g1".to_string(),
            bet_id: 4,
            bettor: "alice".to_string(),
            amount: Amount(250),
        };
        let json = serde_json::to_string(&instruction).unwrap();
        assert_eq!(
            json,
            r#"{"event_id":"g1","bet_id":4,"bettor":"alice","amount":250}"#
        );
        let back: PayoutInstruction = serde_json::from_str(&json).unwrap();
        assert_eq!(back, instruction);
    }
}
