//! Sports results feeds.

use std::time::{SystemTime, UNIX_EPOCH};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::TransportError;
use crate::types::{Outcome, Score};

/// A finished match as reported by a feed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameResult {
    pub event_id: String,
    pub home_team: String,
    pub away_team: String,
    pub score: Score,
    pub finished_at: i64,
}

impl GameResult {
    pub fn outcome(&self) -> Outcome {
        if self.score.home > self.score.away {
            Outcome::Home
        } else if self.score.away > self.score.home {
            Outcome::Away
        } else {
            Outcome::Draw
        }
    }
}

/// Source of finished games. Returns every game known to be over; callers
/// are responsible for deduplicating across polls.
#[async_trait]
pub trait ResultsFeed: Send + Sync {
    async fn finished_games(&self) -> Result<Vec<GameResult>, TransportError>;
}

/// A scheduled fixture the mock feed will eventually report as finished.
#[derive(Debug, Clone)]
pub struct Fixture {
    pub event_id: String,
    pub home_team: String,
    pub away_team: String,
    pub kickoff: i64,
}

/// Deterministic in-process feed for development and tests.
///
/// A fixture counts as finished once its kickoff time has passed. Scores are
/// derived from the event id so repeated polls always agree.
pub struct MockFeed {
    fixtures: Vec<Fixture>,
}

impl MockFeed {
    pub fn new(fixtures: Vec<Fixture>) -> Self {
        MockFeed { fixtures }
    }

    pub fn fixtures(&self) -> &[Fixture] {
        &self.fixtures
    }

    pub fn with_default_fixtures() -> Self {
        let now = unix_now();
        let fixture = |n: u32, home: &str, away: &str, offset: i64| Fixture {
            event_id: format!("mock-game-{n}"),
            home_team: home.to_string(),
            away_team: away.to_string(),
            kickoff: now + offset,
        };
        MockFeed::new(vec![
            fixture(1, "Arsenal", "Chelsea", -60),
            fixture(2, "Barcelona", "Real Madrid", -30),
            fixture(3, "Bayern", "Dortmund", 120),
        ])
    }

    fn score_for(event_id: &str, salt: u32) -> u32 {
        // Cheap stable hash over the id bytes.
        let mut acc = salt.wrapping_mul(31);
        for b in event_id.bytes() {
            acc = acc.wrapping_mul(31).wrapping_add(u32::from(b));
        }
        acc % 5
    }
}

#[async_trait]
impl ResultsFeed for MockFeed {
    async fn finished_games(&self) -> Result<Vec<GameResult>, TransportError> {
        let now = unix_now();
        let games = self
            .fixtures
            .iter()
            .filter(|f| f.kickoff <= now)
            .map(|f| GameResult {
                event_id: f.event_id.clone(),
                home_team: f.home_team.clone(),
                away_team: f.away_team.clone(),
                score: Score {
                    home: Self::score_for(&f.event_id, 1),
                    away: Self::score_for(&f.event_id, 2),
                },
                finished_at: f.kickoff,
            })
            .collect();
        Ok(games)
    }
}

fn unix_now() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs() as i64)
        .unwrap_or(0)
}
