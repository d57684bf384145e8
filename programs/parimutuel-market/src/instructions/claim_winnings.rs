use anchor_lang::prelude::*;
use anchor_spl::token::{self, Token, TokenAccount, Transfer};

use crate::{constants::*, error::MarketError, state::*, utils::payout_share};

#[derive(Accounts)]
pub struct ClaimWinnings<'info> {
    #[account(
        seeds = [MARKET_SEED, &market.market_id.to_le_bytes()],
        bump = market.bump
    )]
    pub market: Account<'info, Market>,

    #[account(
        mut,
        seeds = [BET_SEED, market.key().as_ref(), &bet_record.bet_id.to_le_bytes()],
        bump = bet_record.bump,
        has_one = bettor @ MarketError::Unauthorized
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

    pub bettor: Signer<'info>,
    pub token_program: Program<'info, Token>,
}

pub fn claim_winnings_handler(ctx: Context<ClaimWinnings>) -> Result<()> {
    let market = &ctx.accounts.market;
    let bet_record = &mut ctx.accounts.bet_record;

    require!(market.status == MarketStatus::Resolved, MarketError::MarketNotResolved);
    require!(!bet_record.settled, MarketError::AlreadySettled);

    let winning_outcome = market
        .winning_outcome
        .ok_or(MarketError::MarketNotResolved)?;
    require!(bet_record.outcome == winning_outcome, MarketError::NothingToClaim);

    let winning_pool = market.pool_for(winning_outcome);
    let payout = payout_share(bet_record.amount, market.total_pool, winning_pool)
        .ok_or(MarketError::ArithmeticOverflow)?;

    let market_id_bytes = market.market_id.to_le_bytes();
    let signer_seeds = &[MARKET_SEED, market_id_bytes.as_ref(), &[market.bump]];
    let signer = &[&signer_seeds[..]];

    token::transfer(
        CpiContext::new_with_signer(
            ctx.accounts.token_program.to_account_info(),
            Transfer {
                from: ctx.accounts.pool_vault.to_account_info(),
                to: ctx.accounts.bettor_token_account.to_account_info(),
                authority: ctx.accounts.market.to_account_info(),
            },
            signer,
        ),
        payout,
    )?;

    bet_record.settled = true;

    emit!(WinningsClaimed {
        market_id: market.market_id,
        bet_id: bet_record.bet_id,
        bettor: bet_record.bettor,
        payout,
    });

    Ok(())
}

#[event]
pub struct WinningsClaimed {
    pub market_id: u64,
    pub bet_id: u64,
    pub bettor: Pubkey,
    pub payout: u64,
}
