use anchor_lang::prelude::*;
use anchor_spl::token::{self, Token, TokenAccount, Transfer};

use crate::{constants::*, error::MarketError, state::*};

#[derive(Accounts)]
pub struct ClaimRefund<'info> {
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

pub fn claim_refund_handler(ctx: Context<ClaimRefund>) -> Result<()> {
    let market = &ctx.accounts.market;
    let bet_record = &mut ctx.accounts.bet_record;

    require!(market.status == MarketStatus::Cancelled, MarketError::MarketNotCancelled);
    require!(!bet_record.settled, MarketError::AlreadySettled);

    // A cancelled market refunds every bet its own stake, nothing more.
    let amount = bet_record.amount;

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
        amount,
    )?;

    bet_record.settled = true;

    emit!(RefundClaimed {
        market_id: market.market_id,
        bet_id: bet_record.bet_id,
        bettor: bet_record.bettor,
        amount,
    });

    Ok(())
}

#[event]
pub struct RefundClaimed {
    pub market_id: u64,
    pub bet_id: u64,
    pub bettor: Pubkey,
    pub amount: u64,
}
