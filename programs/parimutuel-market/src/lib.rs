use anchor_lang::prelude::*;

pub mod constants;
pub mod error;
pub mod instructions;
pub mod state;
pub mod utils;

use instructions::*;
use state::Outcome;

declare_id!("Fg6PaFpoGXkYsidMpWTK6W2BeZ7FEfcYkg476zPFsLnS");

#[program]
pub mod parimutuel_market {
    use super::*;

    pub fn initialize(ctx: Context<Initialize>, oracle_authority: Pubkey) -> Result<()> {
        instructions::initialize::initialize_handler(ctx, oracle_authority)
    }

    #[allow(clippy::too_many_arguments)]
    pub fn create_market(
        ctx: Context<CreateMarket>,
        event_id: String,
        description: String,
        home_team: String,
        away_team: String,
        event_time: i64,
        close_time: i64,
    ) -> Result<()> {
        instructions::create_market::create_market_handler(
            ctx,
            event_id,
            description,
            home_team,
            away_team,
            event_time,
            close_time,
        )
    }

    pub fn place_bet(ctx: Context<PlaceBet>, outcome: Outcome, amount: u64) -> Result<()> {
        instructions::place_bet::place_bet_handler(ctx, outcome, amount)
    }

    pub fn lock_market(ctx: Context<LockMarket>) -> Result<()> {
        instructions::lock_market::lock_market_handler(ctx)
    }

    pub fn resolve_market(ctx: Context<ResolveMarket>, winning_outcome: Outcome) -> Result<()> {
        instructions::resolve_market::resolve_market_handler(ctx, winning_outcome)
    }

    pub fn cancel_market(ctx: Context<CancelMarket>) -> Result<()> {
        instructions::cancel_market::cancel_market_handler(ctx)
    }

    pub fn claim_winnings(ctx: Context<ClaimWinnings>) -> Result<()> {
        instructions::claim_winnings::claim_winnings_handler(ctx)
    }

    pub fn claim_refund(ctx: Context<ClaimRefund>) -> Result<()> {
        instructions::claim_refund::claim_refund_handler(ctx)
    }
}
