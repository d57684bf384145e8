pub mod payout;

pub use payout::*;
