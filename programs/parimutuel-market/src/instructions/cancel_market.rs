use anchor_lang::prelude::*;

use crate::{constants::*, error::MarketError, state::*};

#[derive(Accounts)]
pub struct CancelMarket<'info> {
    #[account(seeds = [CONFIG_SEED], bump = config.bump)]
    pub config: Account<'info, ProgramConfig>,

    #[account(
        mut,
        seeds = [MARKET_SEED, &market.market_id.to_le_bytes()],
        bump = market.bump
    )]
    pub market: Account<'info, Market>,

    pub authority: Signer<'info>,
}

pub fn cancel_market_handler(ctx: Context<CancelMarket>) -> Result<()> {
    let market = &mut ctx.accounts.market;
    let signer = ctx.accounts.authority.key();

    require!(
        signer == ctx.accounts.config.authority
            || signer == ctx.accounts.config.oracle_authority,
        MarketError::Unauthorized
    );
    require!(!market.status.is_terminal(), MarketError::AlreadyResolved);

    // Refunds are claimed per bet via claim_refund.
    market.status = MarketStatus::Cancelled;

    emit!(MarketCancelled {
        market_id: market.market_id,
        total_pool: market.total_pool,
    });

    Ok(())
}

#[event]
pub struct MarketCancelled {
    pub market_id: u64,
    pub total_pool: u64,
}
