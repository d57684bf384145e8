use anchor_lang::prelude::*;

use crate::{constants::*, error::MarketError, state::*};

#[derive(Accounts)]
pub struct LockMarket<'info> {
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

pub fn lock_market_handler(ctx: Context<LockMarket>) -> Result<()> {
    let market = &mut ctx.accounts.market;

    require!(
        ctx.accounts.oracle_authority.key() == ctx.accounts.config.oracle_authority,
        MarketError::Unauthorized
    );
    require!(market.status.can_lock(), MarketError::MarketNotOpen);

    market.status = MarketStatus::Locked;

    emit!(MarketLocked {
        market_id: market.market_id,
    });

    Ok(())
}

#[event]
pub struct MarketLocked {
    pub market_id: u64,
}
