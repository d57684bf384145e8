use anchor_lang::prelude::*;
use anchor_spl::token::{self, Token, TokenAccount, Transfer};

use crate::{constants::*, error::MarketError, state::*};

#[derive(Accounts)]
pub struct PlaceBet<'info> {
    #[account(
        mut,
        seeds = [MARKET_SEED, &market.market_id.to_le_bytes()],
        bump = market.bump
    )]
    pub market: Account<'info, Market>,

    #[account(
        init,
        payer = bettor,
        space = 8 + BetRecord::LEN,
        seeds = [BET_SEED, market.key().as_ref(), &market.bet_count.to_le_bytes()],
        bump
    )]
    pub bet_record: Account<'info, BetRecord>,

    #[account(mut)]
    pub bettor_token_account: Account<'info, TokenAccount>,

    #[account(
        mut,
        seeds = [VAULT_SEED, market.key().as_ref()],
        bump,
        token::mint = bettor_token_account.mint,
        token::authority = market
    )]
    pub pool_vault: Account<'info, TokenAccount>,

    #[account(mut)]
    pub bettor: Signer<'info>,
    pub token_program: Program<'info, Token>,
    pub system_program: Program<'info, System>,
}

pub fn place_bet_handler(ctx: Context<PlaceBet>, outcome: Outcome, amount: u64) -> Result<()> {
    let market = &mut ctx.accounts.market;
    let bet_record = &mut ctx.accounts.bet_record;
    let clock = Clock::get()?;

    require!(market.status == MarketStatus::Open, MarketError::MarketNotOpen);
    require!(clock.unix_timestamp < market.close_time, MarketError::BettingClosed);
    require!(amount > 0, MarketError::InvalidAmount);

    token::transfer(
        CpiContext::new(
            ctx.accounts.token_program.to_account_info(),
            Transfer {
                from: ctx.accounts.bettor_token_account.to_account_info(),
                to: ctx.accounts.pool_vault.to_account_info(),
                authority: ctx.accounts.bettor.to_account_info(),
            },
        ),
        amount,
    )?;

    // Pool increments, the counter bump and the bet append commit atomically
    // with this instruction, so total_pool == sum(pools) can never be observed
    // broken.
    let idx = outcome.index();
    market.pools[idx] = market.pools[idx]
        .checked_add(amount)
        .ok_or(MarketError::ArithmeticOverflow)?;
    market.total_pool = market
        .total_pool
        .checked_add(amount)
        .ok_or(MarketError::ArithmeticOverflow)?;
    market.bet_counts[idx] = market.bet_counts[idx]
        .checked_add(1)
        .ok_or(MarketError::ArithmeticOverflow)?;

    let bet_id = market.bet_count;
    market.bet_count = bet_id.checked_add(1).ok_or(MarketError::ArithmeticOverflow)?;

    bet_record.bet_id = bet_id;
    bet_record.market = market.key();
    bet_record.bettor = ctx.accounts.bettor.key();
    bet_record.outcome = outcome;
    bet_record.amount = amount;
    bet_record.placed_at = clock.unix_timestamp;
    bet_record.settled = false;
    bet_record.bump = ctx.bumps.bet_record;

    emit!(BetPlaced {
        market_id: market.market_id,
        bet_id,
        bettor: ctx.accounts.bettor.key(),
        outcome,
        amount,
        total_pool: market.total_pool,
    });

    Ok(())
}

#[event]
pub struct BetPlaced {
    pub market_id: u64,
    pub bet_id: u64,
    pub bettor: Pubkey,
    pub outcome: Outcome,
    pub amount: u64,
    pub total_pool: u64,
}
