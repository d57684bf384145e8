use anchor_lang::prelude::*;

pub const MAX_EVENT_ID_LEN: usize = 64;
pub const MAX_DESCRIPTION_LEN: usize = 128;
pub const MAX_TEAM_LEN: usize = 32;

/// The closed set of outcomes a match-winner market can resolve to.
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub enum Outcome {
    Home,
    Away,
    Draw,
}

impl Outcome {
    pub const COUNT: usize = 3;

    pub fn index(&self) -> usize {
        match self {
            Outcome::Home => 0,
            Outcome::Away => 1,
            Outcome::Draw => 2,
        }
    }
}

/// Market lifecycle. `Resolved` and `Cancelled` are terminal; the winning
/// outcome lives in `Market::winning_outcome` (set iff status is `Resolved`).
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub enum MarketStatus {
    Open,
    Locked,
    Resolved,
    Cancelled,
}

impl MarketStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(self, MarketStatus::Resolved | MarketStatus::Cancelled)
    }

    /// Locking is a one-way `Open -> Locked` transition.
    pub fn can_lock(&self) -> bool {
        matches!(self, MarketStatus::Open)
    }
}

#[account]
pub struct ProgramConfig {
    /// May create and cancel markets.
    pub authority: Pubkey,
    /// May lock, resolve and cancel markets.
    pub oracle_authority: Pubkey,
    pub next_market_id: u64,
    pub bump: u8,
}

impl ProgramConfig {
    pub const LEN: usize = 32 + 32 + 8 + 1;
}

#[account]
pub struct Market {
    pub market_id: u64,
    /// External event identifier, e.g. "mlb_game_20251024_001".
    pub event_id: String,
    pub description: String,
    pub home_team: String,
    pub away_team: String,
    /// Scheduled event start, unix seconds.
    pub event_time: i64,
    /// No bets accepted at or after this time.
    pub close_time: i64,
    /// Cumulative stake per outcome, indexed by `Outcome::index`.
    /// Invariant: total_pool == pools.iter().sum().
    pub pools: [u64; Outcome::COUNT],
    pub total_pool: u64,
    /// Number of bets per outcome, same indexing as `pools`.
    pub bet_counts: [u64; Outcome::COUNT],
    pub bet_count: u64,
    pub status: MarketStatus,
    pub winning_outcome: Option<Outcome>,
    pub bump: u8,
}

impl Market {
    pub const LEN: usize = 8
        + (4 + MAX_EVENT_ID_LEN)
        + (4 + MAX_DESCRIPTION_LEN)
        + 2 * (4 + MAX_TEAM_LEN)
        + 8
        + 8
        + 8 * Outcome::COUNT
        + 8
        + 8 * Outcome::COUNT
        + 8
        + 1
        + 2
        + 1;

    pub fn pool_for(&self, outcome: Outcome) -> u64 {
        self.pools[outcome.index()]
    }
}

/// Append-only record of a single bet. Never mutated after placement except
/// for the `settled` flag, which guards against double claims.
#[account]
pub struct BetRecord {
    pub bet_id: u64,
    pub market: Pubkey,
    pub bettor: Pubkey,
    pub outcome: Outcome,
    pub amount: u64,
    /// Unix seconds at placement.
    pub placed_at: i64,
    pub settled: bool,
    pub bump: u8,
}

impl BetRecord {
    pub const LEN: usize = 8 + 32 + 32 + 1 + 8 + 8 + 1 + 1;
}
