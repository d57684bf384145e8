/// Proportional share of the total pool owed to one winning bet.
///
/// `floor(bet_amount * total_pool / winning_pool)`, widened to u128 before the
/// multiply so the product cannot wrap. Multiply first, divide second;
/// dividing first would lose precision. Returns `None` when the winning pool
/// is empty or the result does not fit in u64.
pub fn payout_share(bet_amount: u64, total_pool: u64, winning_pool: u64) -> Option<u64> {
    if winning_pool == 0 {
        return None;
    }
    let share = (bet_amount as u128)
        .checked_mul(total_pool as u128)?
        .checked_div(winning_pool as u128)?;
    u64::try_from(share).ok()
}
