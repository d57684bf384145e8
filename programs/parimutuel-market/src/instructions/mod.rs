pub mod cancel_market;
pub mod claim_refund;
pub mod claim_winnings;
pub mod create_market;
pub mod initialize;
pub mod lock_market;
pub mod place_bet;
pub mod resolve_market;

pub use cancel_market::*;
pub use claim_refund::*;
pub use claim_winnings::*;
pub use create_market::*;
pub use initialize::*;
pub use lock_market::*;
pub use place_bet::*;
pub use resolve_market::*;
