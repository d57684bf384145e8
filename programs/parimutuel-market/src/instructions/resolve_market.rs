use anchor_lang::prelude::*;

use crate::{constants::*, error::MarketError, state::*};

#[derive(Accounts)]
pub struct ResolveMarket<'info> {
    #[account(seeds = [CONFIG_SEED], bump = config.bump)]
    pub config: Account<'info, ProgramConfig>,

    #[account(
        mut,
        seeds = [MARKET_SEED, &market.market_id.to_le_bytes()],
        bump = market.bump
    )]
    pub market: Account<'info, Market>,

    pub oracle_authority: Signer<'info>,
}

pub fn resolve_market_handler(ctx: Context<ResolveMarket>, winning_outcome: Outcome) -> Result<()> {
    let market = &mut ctx.accounts.market;

    require!(
        ctx.accounts.oracle_authority.key() == ctx.accounts.config.oracle_authority,
        MarketError::Unauthorized
    );
    require!(!market.status.is_terminal(), MarketError::AlreadyResolved);

    // A winning outcome with an empty pool is valid: the market still
    // resolves and the pool simply stays in the vault with no one entitled
    // to claim it.
    market.status = MarketStatus::Resolved;
    market.winning_outcome = Some(winning_outcome);

    emit!(MarketResolved {
        market_id: market.market_id,
        winning_outcome,
        total_pool: market.total_pool,
        winning_pool: market.pool_for(winning_outcome),
        num_winners: market.bet_counts[winning_outcome.index()],
    });

    Ok(())
}

#[event]
pub struct MarketResolved {
    pub market_id: u64,
    pub winning_outcome: Outcome,
    pub total_pool: u64,
    pub winning_pool: u64,
    pub num_winners: u64,
}
