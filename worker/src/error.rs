use thiserror::Error;

use crate::saga::{DistributionReport, SagaStep};

/// Failures while parsing or combining fixed-point amounts.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AmountError {
    #[error("invalid amount string {0:?}")]
    InvalidFormat(String),
    #[error("amount arithmetic overflow")]
    Overflow,
}

/// Failures while computing payouts for a market.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SettlementError {
    #[error("market is neither resolved nor cancelled")]
    MarketNotSettled,
    #[error("winning pool does not match the recorded winning stake")]
    InconsistentPools,
    #[error("payout arithmetic overflow")]
    ArithmeticOverflow,
}

/// A failed call to a remote collaborator (ledger or results feed).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("transport error: {message}")]
pub struct TransportError {
    pub message: String,
}

impl TransportError {
    pub fn new(message: impl Into<String>) -> Self {
        TransportError {
            message: message.into(),
        }
    }
}

/// Top-level worker failures, one per event the saga gives up on.
#[derive(Debug, Error)]
pub enum WorkerError {
    #[error("step {step} failed for event {event_id}: {source}")]
    Transport {
        event_id: String,
        step: SagaStep,
        source: TransportError,
    },
    #[error("distribution incomplete for event {event_id}: {report}")]
    PartialPayout {
        event_id: String,
        report: DistributionReport,
    },
    #[error("settlement failed for event {event_id}: {source}")]
    Settlement {
        event_id: String,
        source: SettlementError,
    },
    #[error("configuration error: {0}")]
    Config(String),
}
