use anchor_lang::prelude::*;
use anchor_spl::token::{Mint, Token, TokenAccount};

use crate::{constants::*, error::MarketError, state::*};

#[derive(Accounts)]
pub struct CreateMarket<'info> {
    #[account(
        mut,
        seeds = [CONFIG_SEED],
        bump = config.bump,
        has_one = authority @ MarketError::Unauthorized
    )]
    pub config: Account<'info, ProgramConfig>,

    #[account(
        init,
        payer = authority,
        space = 8 + Market::LEN,
        seeds = [MARKET_SEED, &config.next_market_id.to_le_bytes()],
        bump
    )]
    pub market: Account<'info, Market>,

    #[account(
        init,
        payer = authority,
        seeds = [VAULT_SEED, market.key().as_ref()],
        bump,
        token::mint = token_mint,
        token::authority = market
    )]
    pub pool_vault: Account<'info, TokenAccount>,

    pub token_mint: Account<'info, Mint>,

    #[account(mut)]
    pub authority: Signer<'info>,
    pub token_program: Program<'info, Token>,
    pub system_program: Program<'info, System>,
}

fn validate_market_info(
    event_id: &str,
    description: &str,
    home_team: &str,
    away_team: &str,
) -> Result<()> {
    require!(
        !event_id.is_empty() && event_id.len() <= MAX_EVENT_ID_LEN,
        MarketError::InvalidEventId
    );
    require!(
        description.len() <= MAX_DESCRIPTION_LEN
            && home_team.len() <= MAX_TEAM_LEN
            && away_team.len() <= MAX_TEAM_LEN,
        MarketError::InvalidMarketInfo
    );
    Ok(())
}

#[allow(clippy::too_many_arguments)]
pub fn create_market_handler(
    ctx: Context<CreateMarket>,
    event_id: String,
    description: String,
    home_team: String,
    away_team: String,
    event_time: i64,
    close_time: i64,
) -> Result<()> {
    validate_market_info(&event_id, &description, &home_team, &away_team)?;
    require!(close_time <= event_time, MarketError::InvalidCloseTime);

    let config = &mut ctx.accounts.config;
    let market = &mut ctx.accounts.market;

    market.market_id = config.next_market_id;
    market.event_id = event_id.clone();
    market.description = description.clone();
    market.home_team = home_team;
    market.away_team = away_team;
    market.event_time = event_time;
    market.close_time = close_time;
    market.pools = [0; Outcome::COUNT];
    market.total_pool = 0;
    market.bet_counts = [0; Outcome::COUNT];
    market.bet_count = 0;
    market.status = MarketStatus::Open;
    market.winning_outcome = None;
    market.bump = ctx.bumps.market;

    config.next_market_id = config
        .next_market_id
        .checked_add(1)
        .ok_or(MarketError::ArithmeticOverflow)?;

    emit!(MarketCreated {
        market_id: market.market_id,
        event_id,
        description,
        close_time,
    });

    Ok(())
}

#[event]
pub struct MarketCreated {
    pub market_id: u64,
    pub event_id: String,
    pub description: String,
    pub close_time: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_fields_at_their_limits() {
        assert!(validate_market_info(
            &"e".repeat(MAX_EVENT_ID_LEN),
            &"d".repeat(MAX_DESCRIPTION_LEN),
            &"h".repeat(MAX_TEAM_LEN),
            &"a".repeat(MAX_TEAM_LEN),
        )
        .is_ok());
    }

    #[test]
    fn bad_event_id_reports_invalid_event_id() {
        for event_id in ["", &"e".repeat(MAX_EVENT_ID_LEN + 1)] {
            let err = validate_market_info(event_id, "d", "h", "a").unwrap_err();
            assert_eq!(err, error!(MarketError::InvalidEventId));
        }
    }

    #[test]
    fn overlong_info_reports_invalid_market_info() {
        let long_team = "t".repeat(MAX_TEAM_LEN + 1);
        let long_description = "d".repeat(MAX_DESCRIPTION_LEN + 1);
        for (description, home, away) in [
            (long_description.as_str(), "h", "a"),
            ("d", long_team.as_str(), "a"),
            ("d", "h", long_team.as_str()),
        ] {
            let err = validate_market_info("evt", description, home, away).unwrap_err();
            assert_eq!(err, error!(MarketError::InvalidMarketInfo));
        }
    }
}
