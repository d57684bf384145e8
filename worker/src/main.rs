//! Oracle worker binary.
//!
//! Polls a results feed on a fixed interval and drives every finished game
//! through the resolution saga. Runs until Ctrl-C; an in-flight poll is
//! allowed to finish before shutdown.

mod amount;
mod config;
mod error;
mod feed;
mod ledger;
mod odds;
mod saga;
mod settlement;
mod store;
mod types;

use anyhow::Context;
use log::{error, info, warn};
use tokio::time::{self, MissedTickBehavior};

use crate::amount::Amount;
use crate::config::{DataMode, WorkerConfig};
use crate::feed::{MockFeed, ResultsFeed};
use crate::ledger::{InMemoryLedger, LedgerClient};
use crate::odds::calculate_odds;
use crate::saga::ResolutionSaga;
use crate::store::{MemoryStore, WorkerStore};
use crate::types::Outcome;

struct OracleWorker {
    feed: Box<dyn ResultsFeed>,
    ledger: Box<dyn LedgerClient>,
    store: Box<dyn WorkerStore>,
}

impl OracleWorker {
    /// One poll: fetch finished games and run the saga for each. A failing
    /// event is logged and left for the next poll; it never blocks the rest
    /// of the batch.
    async fn poll(&self) {
        let games = match self.feed.finished_games().await {
            Ok(games) => games,
            Err(err) => {
                error!("results feed unavailable: {err}");
                return;
            }
        };
        if games.is_empty() {
            info!("no finished games this poll");
            return;
        }

        let saga = ResolutionSaga::new(self.ledger.as_ref(), self.store.as_ref());
        for game in &games {
            if let Err(err) = saga.run(game).await {
                error!("{err}");
            }
        }
    }
}

/// Builds the mock environment: one market per fixture with a few seeded
/// bets so the settlement path has something to pay out.
fn seeded_mock_ledger(feed: &MockFeed) -> anyhow::Result<InMemoryLedger> {
    let ledger = InMemoryLedger::new();
    for fixture in feed.fixtures() {
        let event_id = fixture.event_id.as_str();
        ledger.create_market(event_id);
        ledger
            .place_bet(event_id, "alice", Outcome::Home, Amount::from_tokens(3))
            .context("seeding demo bet")?;
        ledger
            .place_bet(event_id, "bob", Outcome::Away, Amount::from_tokens(1))
            .context("seeding demo bet")?;
        ledger
            .place_bet(event_id, "carol", Outcome::Draw, Amount::from_tokens(1))
            .context("seeding demo bet")?;
    }
    Ok(ledger)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::init();

    let config = WorkerConfig::from_env()?;
    info!(
        "starting oracle worker (poll every {:?}, {:?} data)",
        config.poll_interval, config.data_mode
    );
    if config.data_mode == DataMode::Live {
        warn!("no live feed transport is built in, serving mock fixtures");
    }

    let feed = MockFeed::with_default_fixtures();
    let ledger = seeded_mock_ledger(&feed)?;

    for fixture in feed.fixtures() {
        let snapshot = ledger.fetch_snapshot(&fixture.event_id).await?;
        let odds = calculate_odds(&snapshot.pools, snapshot.total_pool);
        info!(
            "market {} ({} vs {}): home {} / away {} / draw {}",
            fixture.event_id,
            fixture.home_team,
            fixture.away_team,
            odds.home,
            odds.away,
            odds.draw
        );
    }

    let worker = OracleWorker {
        feed: Box::new(feed),
        ledger: Box::new(ledger),
        store: Box::new(MemoryStore::new()),
    };

    let mut ticker = time::interval(config.poll_interval);
    // Polls run on this task, so they can never overlap; a tick that fires
    // while a poll is still running is dropped rather than queued.
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        tokio::select! {
            _ = ticker.tick() => worker.poll().await,
            _ = tokio::signal::ctrl_c() => {
                info!("shutdown requested, stopping worker");
                break;
            }
        }
    }

    Ok(())
}
