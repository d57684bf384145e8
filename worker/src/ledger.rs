//! Ledger access.
//!
//! [`LedgerClient`] is the seam between the saga and whatever actually hosts
//! the markets. [`InMemoryLedger`] is a local implementation of the same
//! contract, used by tests and by the worker in mock mode.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::amount::Amount;
use crate::error::TransportError;
use crate::types::{
    BetInfo, EventResult, MarketSnapshot, MarketStatus, Outcome, PayoutInstruction, Pools,
};

/// Acknowledgement from a resolve call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolveAck {
    Resolved,
    /// The market was already terminal. Not an error; the saga treats a
    /// replayed resolve as success.
    AlreadyResolved,
}

/// Remote operations the saga needs. Every call may fail in transit and is
/// safe to retry.
#[async_trait]
pub trait LedgerClient: Send + Sync {
    async fn publish_result(&self, result: &EventResult) -> Result<(), TransportError>;
    async fn resolve_market(
        &self,
        event_id: &str,
        outcome: Outcome,
    ) -> Result<ResolveAck, TransportError>;
    async fn fetch_snapshot(&self, event_id: &str) -> Result<MarketSnapshot, TransportError>;
    async fn credit_payout(&self, instruction: &PayoutInstruction) -> Result<(), TransportError>;
}

#[derive(Debug, Clone)]
struct MarketEntry {
    status: MarketStatus,
    pools: Pools,
    total_pool: Amount,
    bets: Vec<BetInfo>,
}

/// A self-contained ledger holding markets, published results, and credited
/// payouts behind mutexes.
#[derive(Default)]
pub struct InMemoryLedger {
    markets: Mutex<HashMap<String, MarketEntry>>,
    published: Mutex<HashMap<String, EventResult>>,
    credited: Mutex<Vec<PayoutInstruction>>,
}

impl InMemoryLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn create_market(&self, event_id: &str) {
        let mut markets = self.markets.lock().unwrap_or_else(|e| e.into_inner());
        markets.entry(event_id.to_string()).or_insert(MarketEntry {
            status: MarketStatus::Open,
            pools: Pools::default(),
            total_pool: Amount::ZERO,
            bets: Vec::new(),
        });
    }

    /// Records a bet directly, for seeding scenarios.
    pub fn place_bet(
        &self,
        event_id: &str,
        bettor: &str,
        outcome: Outcome,
        amount: Amount,
    ) -> Result<u64, TransportError> {
        let mut markets = self.markets.lock().unwrap_or_else(|e| e.into_inner());
        let market = markets
            .get_mut(event_id)
            .ok_or_else(|| TransportError::new(format!("unknown market {event_id}")))?;
        if market.status != MarketStatus::Open {
            return Err(TransportError::new(format!("market {event_id} not open")));
        }
        let pool = market.pools.get_mut(outcome);
        *pool = pool
            .checked_add(amount)
            .ok_or_else(|| TransportError::new("pool overflow"))?;
        market.total_pool = market
            .total_pool
            .checked_add(amount)
            .ok_or_else(|| TransportError::new("pool overflow"))?;
        let bet_id = market.bets.len() as u64;
        market.bets.push(BetInfo {
            bet_id,
            bettor: bettor.to_string(),
            outcome,
            amount,
        });
        Ok(bet_id)
    }

    pub fn cancel_market(&self, event_id: &str) {
        let mut markets = self.markets.lock().unwrap_or_else(|e| e.into_inner());
        if let Some(market) = markets.get_mut(event_id) {
            market.status = MarketStatus::Cancelled;
        }
    }

    pub fn published_result(&self, event_id: &str) -> Option<EventResult> {
        self.published
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .get(event_id)
            .cloned()
    }

    pub fn credited_payouts(&self) -> Vec<PayoutInstruction> {
        self.credited
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }
}

#[async_trait]
impl LedgerClient for InMemoryLedger {
    async fn publish_result(&self, result: &EventResult) -> Result<(), TransportError> {
        // Re-publishing the same event overwrites; publish is idempotent.
        self.published
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .insert(result.event_id.clone(), result.clone());
        Ok(())
    }

    async fn resolve_market(
        &self,
        event_id: &str,
        outcome: Outcome,
    ) -> Result<ResolveAck, TransportError> {
        let mut markets = self.markets.lock().unwrap_or_else(|e| e.into_inner());
        let market = markets
            .get_mut(event_id)
            .ok_or_else(|| TransportError::new(format!("unknown market {event_id}")))?;
        if market.status.is_terminal() {
            return Ok(ResolveAck::AlreadyResolved);
        }
        market.status = MarketStatus::Resolved(outcome);
        Ok(ResolveAck::Resolved)
    }

    async fn fetch_snapshot(&self, event_id: &str) -> Result<MarketSnapshot, TransportError> {
        let markets = self.markets.lock().unwrap_or_else(|e| e.into_inner());
        let market = markets
            .get(event_id)
            .ok_or_else(|| TransportError::new(format!("unknown market {event_id}")))?;
        Ok(MarketSnapshot {
            event_id: event_id.to_string(),
            status: market.status,
            pools: market.pools,
            total_pool: market.total_pool,
            bets: market.bets.clone(),
        })
    }

    async fn credit_payout(&self, instruction: &PayoutInstruction) -> Result<(), TransportError> {
        self.credited
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(instruction.clone());
        Ok(())
    }
}
