//! Environment-driven worker configuration.

use std::env;
use std::time::Duration;

use log::warn;

use crate::error::WorkerError;

const DEFAULT_POLL_INTERVAL_MS: u64 = 60_000;

/// Where finished-game data comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataMode {
    Mock,
    Live,
}

#[derive(Debug, Clone)]
pub struct WorkerConfig {
    pub poll_interval: Duration,
    pub data_mode: DataMode,
}

impl WorkerConfig {
    /// Reads `POLL_INTERVAL_MS`, `DATA_MODE`, and `SPORTS_API_KEY`.
    ///
    /// Requesting live data without an API key logs a warning and falls
    /// back to mock mode instead of failing startup.
    pub fn from_env() -> Result<Self, WorkerError> {
        let poll_interval_ms = match env::var("POLL_INTERVAL_MS") {
            Ok(raw) => raw.parse::<u64>().map_err(|_| {
                WorkerError::Config(format!("POLL_INTERVAL_MS is not a number: {raw:?}"))
            })?,
            Err(_) => DEFAULT_POLL_INTERVAL_MS,
        };
        if poll_interval_ms == 0 {
            return Err(WorkerError::Config(
                "POLL_INTERVAL_MS must be positive".to_string(),
            ));
        }

        let sports_api_key = env::var("SPORTS_API_KEY").ok().filter(|k| !k.is_empty());

        let mut data_mode = match env::var("DATA_MODE").as_deref() {
            Ok("live") => DataMode::Live,
            Ok("mock") | Err(_) => DataMode::Mock,
            Ok(other) => {
                return Err(WorkerError::Config(format!(
                    "DATA_MODE must be \"mock\" or \"live\", got {other:?}"
                )))
            }
        };
        if data_mode == DataMode::Live && sports_api_key.is_none() {
            warn!("DATA_MODE=live but SPORTS_API_KEY is unset, falling back to mock data");
            data_mode = DataMode::Mock;
        }

        Ok(WorkerConfig {
            poll_interval: Duration::from_millis(poll_interval_ms),
            data_mode,
        })
    }
}
