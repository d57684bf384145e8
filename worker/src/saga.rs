//! Three-step resolution saga for a finished event.
//!
//! Publish the result, resolve the market, distribute payouts. Each step is
//! recorded once it completes so a retried event resumes where it stopped,
//! and each bet is marked paid so a retried distribution never credits the
//! same bet twice.

use std::fmt;

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};

use crate::error::{TransportError, WorkerError};
use crate::feed::GameResult;
use crate::ledger::{LedgerClient, ResolveAck};
use crate::settlement::compute_payouts;
use crate::store::WorkerStore;
use crate::types::EventResult;

/// The ordered steps of the resolution workflow.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub enum SagaStep {
    Publish,
    Resolve,
    Distribute,
}

impl fmt::Display for SagaStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SagaStep::Publish => "publish",
            SagaStep::Resolve => "resolve",
            SagaStep::Distribute => "distribute",
        };
        f.write_str(name)
    }
}

/// Outcome of one distribution pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DistributionReport {
    pub succeeded: u64,
    pub skipped: u64,
    pub failed: Vec<(u64, TransportError)>,
}

impl fmt::Display for DistributionReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} credited, {} already paid, {} failed",
            self.succeeded,
            self.skipped,
            self.failed.len()
        )
    }
}

/// Runs the resolution workflow for finished games.
pub struct ResolutionSaga<'a> {
    ledger: &'a dyn LedgerClient,
    store: &'a dyn WorkerStore,
}

impl<'a> ResolutionSaga<'a> {
    pub fn new(ledger: &'a dyn LedgerClient, store: &'a dyn WorkerStore) -> Self {
        ResolutionSaga { ledger, store }
    }

    /// Drives one event through publish, resolve, and distribute.
    ///
    /// Steps already recorded for this event are skipped. A transport
    /// failure aborts the remaining steps; the caller retries the whole
    /// event on a later poll and completed work is not repeated.
    pub async fn run(&self, game: &GameResult) -> Result<(), WorkerError> {
        let event_id = game.event_id.as_str();
        let done = self.store.last_completed_step(event_id);

        if done == Some(SagaStep::Distribute) {
            debug!("event {event_id}: already fully settled, skipping");
            return Ok(());
        }

        let result = EventResult {
            event_id: event_id.to_string(),
            outcome: game.outcome(),
            score: Some(game.score),
            timestamp: game.finished_at,
        };

        if done < Some(SagaStep::Publish) {
            self.publish(&result).await?;
        }
        if done < Some(SagaStep::Resolve) {
            self.resolve(&result).await?;
        }
        self.distribute(event_id).await
    }

    async fn publish(&self, result: &EventResult) -> Result<(), WorkerError> {
        self.ledger
            .publish_result(result)
            .await
            .map_err(|source| WorkerError::Transport {
                event_id: result.event_id.clone(),
                step: SagaStep::Publish,
                source,
            })?;
        self.store.record_step(&result.event_id, SagaStep::Publish);
        info!(
            "event {}: published result {} ({:?})",
            result.event_id, result.outcome, result.score
        );
        Ok(())
    }

    async fn resolve(&self, result: &EventResult) -> Result<(), WorkerError> {
        let ack = self
            .ledger
            .resolve_market(&result.event_id, result.outcome)
            .await
            .map_err(|source| WorkerError::Transport {
                event_id: result.event_id.clone(),
                step: SagaStep::Resolve,
                source,
            })?;
        self.store.record_step(&result.event_id, SagaStep::Resolve);
        match ack {
            ResolveAck::Resolved => {
                info!("event {}: market resolved to {}", result.event_id, result.outcome)
            }
            ResolveAck::AlreadyResolved => {
                info!("event {}: market was already resolved", result.event_id)
            }
        }
        Ok(())
    }

    async fn distribute(&self, event_id: &str) -> Result<(), WorkerError> {
        let snapshot = self
            .ledger
            .fetch_snapshot(event_id)
            .await
            .map_err(|source| WorkerError::Transport {
                event_id: event_id.to_string(),
                step: SagaStep::Distribute,
                source,
            })?;

        let instructions = compute_payouts(&snapshot).map_err(|source| {
            WorkerError::Settlement {
                event_id: event_id.to_string(),
                source,
            }
        })?;

        let mut report = DistributionReport::default();
        for instruction in &instructions {
            if self.store.is_paid(event_id, instruction.bet_id) {
                report.skipped += 1;
                continue;
            }
            match self.ledger.credit_payout(instruction).await {
                Ok(()) => {
                    self.store.mark_paid(event_id, instruction.bet_id);
                    report.succeeded += 1;
                }
                Err(source) => {
                    warn!(
                        "event {event_id}: crediting bet {} failed: {source}",
                        instruction.bet_id
                    );
                    report.failed.push((instruction.bet_id, source));
                }
            }
        }

        if report.failed.is_empty() {
            // Only a fully credited market counts as distributed.
            self.store.record_step(event_id, SagaStep::Distribute);
            info!("event {event_id}: distribution complete ({report})");
            Ok(())
        } else {
            Err(WorkerError::PartialPayout {
                event_id: event_id.to_string(),
                report,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;
    use std::sync::Mutex;

    use async_trait::async_trait;

    use super::*;
    use crate::amount::Amount;
    use crate::error::TransportError;
    use crate::ledger::InMemoryLedger;
    use crate::store::MemoryStore;
    use crate::types::{MarketSnapshot, Outcome, PayoutInstruction, Score};

    /// Wraps the in-memory ledger with switchable per-call failures.
    #[derive(Default)]
    struct FlakyLedger {
        inner: InMemoryLedger,
        fail_publish: Mutex<bool>,
        fail_resolve: Mutex<bool>,
        fail_credit_bets: Mutex<HashSet<u64>>,
    }

    impl FlakyLedger {
        fn set_fail_publish(&self, fail: bool) {
            *self.fail_publish.lock().unwrap() = fail;
        }

        fn set_fail_resolve(&self, fail: bool) {
            *self.fail_resolve.lock().unwrap() = fail;
        }

        fn fail_credit_for(&self, bet_id: u64) {
            self.fail_credit_bets.lock().unwrap().insert(bet_id);
        }

        fn clear_credit_failures(&self) {
            self.fail_credit_bets.lock().unwrap().clear();
        }
    }

    #[async_trait]
    impl LedgerClient for FlakyLedger {
        async fn publish_result(&self, result: &EventResult) -> Result<(), TransportError> {
            if *self.fail_publish.lock().unwrap() {
                return Err(TransportError::new("publish unavailable"));
            }
            self.inner.publish_result(result).await
        }

        async fn resolve_market(
            &self,
            event_id: &str,
            outcome: Outcome,
        ) -> Result<ResolveAck, TransportError> {
            if *self.fail_resolve.lock().unwrap() {
                return Err(TransportError::new("resolve unavailable"));
            }
            self.inner.resolve_market(event_id, outcome).await
        }

        async fn fetch_snapshot(
            &self,
            event_id: &str,
        ) -> Result<MarketSnapshot, TransportError> {
            self.inner.fetch_snapshot(event_id).await
        }

        async fn credit_payout(
            &self,
            instruction: &PayoutInstruction,
        ) -> Result<(), TransportError> {
            if self
                .fail_credit_bets
                .lock()
                .unwrap()
                .contains(&instruction.bet_id)
            {
                return Err(TransportError::new("credit unavailable"));
            }
            self.inner.credit_payout(instruction).await
        }
    }

    fn finished_game(event_id: &str, home: u32, away: u32) -> GameResult {
        GameResult {
            event_id: event_id.to_string(),
            home_team: "H".to_string(),
            away_team: "A".to_string(),
            score: Score { home, away },
            finished_at: 1_700_000_000,
        }
    }

    fn seeded_ledger(event_id: &str) -> FlakyLedger {
        let ledger = FlakyLedger::default();
        ledger.inner.create_market(event_id);
        ledger
            .inner
            .place_bet(event_id, "alice", Outcome::Home, Amount(100))
            .unwrap();
        ledger
            .inner
            .place_bet(event_id, "bob", Outcome::Home, Amount(100))
            .unwrap();
        ledger
            .inner
            .place_bet(event_id, "carol", Outcome::Away, Amount(300))
            .unwrap();
        ledger
    }

    #[tokio::test]
    async fn happy_path_runs_all_three_steps() {
        let ledger = seeded_ledger("g1");
        let store = MemoryStore::new();
        let saga = ResolutionSaga::new(&ledger, &store);

        saga.run(&finished_game("g1", 2, 0)).await.unwrap();

        assert_eq!(
            ledger.inner.published_result("g1").map(|r| r.outcome),
            Some(Outcome::Home)
        );
        assert_eq!(store.last_completed_step("g1"), Some(SagaStep::Distribute));

        let credited = ledger.inner.credited_payouts();
        assert_eq!(credited.len(), 2);
        // Each home bet of 100 wins floor(100 * 500 / 200) = 250.
        assert!(credited.iter().all(|p| p.amount == Amount(250)));
    }

    #[tokio::test]
    async fn publish_failure_aborts_before_resolving() {
        let ledger = seeded_ledger("g1");
        ledger.set_fail_publish(true);
        let store = MemoryStore::new();
        let saga = ResolutionSaga::new(&ledger, &store);

        let err = saga.run(&finished_game("g1", 2, 0)).await.unwrap_err();
        assert!(matches!(
            err,
            WorkerError::Transport {
                step: SagaStep::Publish,
                ..
            }
        ));
        assert_eq!(store.last_completed_step("g1"), None);
        let snap = ledger.inner.fetch_snapshot("g1").await.unwrap();
        assert!(!snap.status.is_terminal());
        assert!(ledger.inner.credited_payouts().is_empty());
    }

    #[tokio::test]
    async fn resolve_failure_keeps_publish_and_resumes_there() {
        let ledger = seeded_ledger("g1");
        ledger.set_fail_resolve(true);
        let store = MemoryStore::new();
        let saga = ResolutionSaga::new(&ledger, &store);

        let err = saga.run(&finished_game("g1", 2, 0)).await.unwrap_err();
        assert!(matches!(
            err,
            WorkerError::Transport {
                step: SagaStep::Resolve,
                ..
            }
        ));
        assert_eq!(store.last_completed_step("g1"), Some(SagaStep::Publish));
        assert!(ledger.inner.credited_payouts().is_empty());

        // Retry completes without re-publishing.
        ledger.set_fail_resolve(false);
        ledger.set_fail_publish(true);
        saga.run(&finished_game("g1", 2, 0)).await.unwrap();
        assert_eq!(store.last_completed_step("g1"), Some(SagaStep::Distribute));
    }

    #[tokio::test]
    async fn partial_credit_failure_is_isolated_and_retried_without_double_pay() {
        let ledger = seeded_ledger("g1");
        let store = MemoryStore::new();
        let saga = ResolutionSaga::new(&ledger, &store);

        ledger.fail_credit_for(1);
        let err = saga.run(&finished_game("g1", 2, 0)).await.unwrap_err();
        match err {
            WorkerError::PartialPayout { report, .. } => {
                assert_eq!(report.succeeded, 1);
                assert_eq!(report.failed.len(), 1);
                assert_eq!(report.failed[0].0, 1);
            }
            other => panic!("unexpected error {other:?}"),
        }
        // Distribute is not complete, so the event stays retryable.
        assert_eq!(store.last_completed_step("g1"), Some(SagaStep::Resolve));
        assert_eq!(ledger.inner.credited_payouts().len(), 1);

        ledger.clear_credit_failures();
        saga.run(&finished_game("g1", 2, 0)).await.unwrap();
        assert_eq!(store.last_completed_step("g1"), Some(SagaStep::Distribute));

        // Bet 0 was credited once on the first pass and skipped on retry.
        let credited = ledger.inner.credited_payouts();
        assert_eq!(credited.len(), 2);
        let ids: Vec<u64> = credited.iter().map(|p| p.bet_id).collect();
        assert_eq!(ids, vec![0, 1]);
    }

    #[tokio::test]
    async fn replaying_a_settled_event_does_nothing() {
        let ledger = seeded_ledger("g1");
        let store = MemoryStore::new();
        let saga = ResolutionSaga::new(&ledger, &store);

        saga.run(&finished_game("g1", 2, 0)).await.unwrap();
        let after_first = ledger.inner.credited_payouts().len();

        saga.run(&finished_game("g1", 2, 0)).await.unwrap();
        assert_eq!(ledger.inner.credited_payouts().len(), after_first);
    }

    #[tokio::test]
    async fn cancelled_market_distributes_refunds() {
        let ledger = seeded_ledger("g1");
        ledger.inner.cancel_market("g1");
        let store = MemoryStore::new();
        let saga = ResolutionSaga::new(&ledger, &store);

        saga.run(&finished_game("g1", 1, 1)).await.unwrap();

        let credited = ledger.inner.credited_payouts();
        let amounts: Vec<u128> = credited.iter().map(|p| p.amount.0).collect();
        assert_eq!(amounts, vec![100, 100, 300]);
    }

    #[tokio::test]
    async fn draw_with_no_backers_settles_with_zero_payouts() {
        let ledger = FlakyLedger::default();
        ledger.inner.create_market("g1");
        ledger
            .inner
            .place_bet("g1", "alice", Outcome::Home, Amount(100))
            .unwrap();
        let store = MemoryStore::new();
        let saga = ResolutionSaga::new(&ledger, &store);

        saga.run(&finished_game("g1", 1, 1)).await.unwrap();

        assert_eq!(store.last_completed_step("g1"), Some(SagaStep::Distribute));
        assert!(ledger.inner.credited_payouts().is_empty());
    }
}
