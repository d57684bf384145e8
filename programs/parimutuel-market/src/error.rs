use anchor_lang::prelude::*;

#[error_code]
pub enum MarketError {
    #[msg("Unauthorized")]
    Unauthorized,
    #[msg("Event ID is empty or too long")]
    InvalidEventId,
    #[msg("Description or team name too long")]
    InvalidMarketInfo,
    #[msg("Close time must not be after the event time")]
    InvalidCloseTime,
    #[msg("Market is not open for betting")]
    MarketNotOpen,
    #[msg("Betting is closed")]
    BettingClosed,
    #[msg("Bet amount must be greater than zero")]
    InvalidAmount,
    #[msg("Market already resolved or cancelled")]
    AlreadyResolved,
    #[msg("Market not resolved yet")]
    MarketNotResolved,
    #[msg("Market is not cancelled")]
    MarketNotCancelled,
    #[msg("Nothing to claim for this bet")]
    NothingToClaim,
    #[msg("Bet already settled")]
    AlreadySettled,
    #[msg("Arithmetic overflow")]
    ArithmeticOverflow,
}
