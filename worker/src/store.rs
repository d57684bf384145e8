//! Progress bookkeeping for the resolution saga.

use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

use crate::saga::SagaStep;

/// Records which saga steps have completed per event and which individual
/// bets have already been paid. Both sets survive retries of the same event
/// so no step runs twice and no bet is credited twice.
pub trait WorkerStore: Send + Sync {
    fn last_completed_step(&self, event_id: &str) -> Option<SagaStep>;
    fn record_step(&self, event_id: &str, step: SagaStep);
    fn is_paid(&self, event_id: &str, bet_id: u64) -> bool;
    fn mark_paid(&self, event_id: &str, bet_id: u64);
}

/// In-memory store. Progress is lost on restart; the saga steps themselves
/// are idempotent against the ledger, so a restart re-runs them harmlessly.
#[derive(Default)]
pub struct MemoryStore {
    steps: Mutex<HashMap<String, SagaStep>>,
    paid: Mutex<HashSet<(String, u64)>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl WorkerStore for MemoryStore {
    fn last_completed_step(&self, event_id: &str) -> Option<SagaStep> {
        self.steps.lock().unwrap_or_else(|e| e.into_inner()).get(event_id).copied()
    }

    fn record_step(&self, event_id: &str, step: SagaStep) {
        let mut steps = self.steps.lock().unwrap_or_else(|e| e.into_inner());
        let entry = steps.entry(event_id.to_string()).or_insert(step);
        if *entry < step {
            *entry = step;
        }
    }

    fn is_paid(&self, event_id: &str, bet_id: u64) -> bool {
        self.paid
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .contains(&(event_id.to_string(), bet_id))
    }

    fn mark_paid(&self, event_id: &str, bet_id: u64) {
        self.paid
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .insert((event_id.to_string(), bet_id));
    }
}
