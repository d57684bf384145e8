//! Payout computation for settled markets.
//!
//! The same proportional formula the on-chain program applies at claim time,
//! computed here for the whole market at once so the worker can push credits
//! proactively.

use log::debug;

use crate::amount::Amount;
use crate::error::SettlementError;
use crate::types::{BetInfo, MarketSnapshot, MarketStatus, PayoutInstruction};

/// Computes every payout owed by a settled market, in bet-id order.
///
/// A cancelled market refunds each bet its own stake. A resolved market pays
/// each winning bet `floor(bet * total_pool / winning_pool)`; losing bets get
/// nothing and per-bet flooring dust stays in the pool. A resolved market
/// with no winning bets owes nothing. Any other status is an error.
pub fn compute_payouts(
    snapshot: &MarketSnapshot,
) -> Result<Vec<PayoutInstruction>, SettlementError> {
    let winner = match snapshot.status {
        MarketStatus::Cancelled => {
            let refunds = snapshot
                .bets
                .iter()
                .map(|bet| PayoutInstruction {
                    event_id: snapshot.event_id.clone(),
                    bet_id: bet.bet_id,
                    bettor: bet.bettor.clone(),
                    amount: bet.amount,
                })
                .collect();
            return Ok(refunds);
        }
        MarketStatus::Resolved(winner) => winner,
        MarketStatus::Open | MarketStatus::Locked => {
            return Err(SettlementError::MarketNotSettled)
        }
    };

    let winners: Vec<&BetInfo> = snapshot
        .bets
        .iter()
        .filter(|bet| bet.outcome == winner)
        .collect();

    // The winning pool must equal the stake recorded on the winning bets;
    // paying out against an understated pool would overdraw the market.
    let winning_stake = winners
        .iter()
        .try_fold(Amount::ZERO, |acc, bet| acc.checked_add(bet.amount))
        .ok_or(SettlementError::ArithmeticOverflow)?;
    let winning_pool = snapshot.pools.get(winner);
    if winning_pool != winning_stake {
        debug!(
            "market {}: winning pool {} disagrees with winning stake {}",
            snapshot.event_id, winning_pool, winning_stake
        );
        return Err(SettlementError::InconsistentPools);
    }

    if winning_pool.is_zero() {
        // Nobody backed the winner; the pool stays where it is.
        return Ok(Vec::new());
    }

    winners
        .into_iter()
        .map(|bet| {
            let amount = bet
                .amount
                .checked_mul_div(snapshot.total_pool, winning_pool)
                .ok_or(SettlementError::ArithmeticOverflow)?;
            Ok(PayoutInstruction {
                event_id: snapshot.event_id.clone(),
                bet_id: bet.bet_id,
                bettor: bet.bettor.clone(),
                amount,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::amount::Amount;
    use crate::types::{BetInfo, Outcome, Pools};

    fn bet(bet_id: u64, bettor: &str, outcome: Outcome, amount: u128) -> BetInfo {
        BetInfo {
            bet_id,
            bettor: bettor.to_string(),
            outcome,
            amount: Amount(amount),
        }
    }

    fn snapshot(status: MarketStatus, bets: Vec<BetInfo>) -> MarketSnapshot {
        let mut pools = Pools::default();
        let mut total = Amount::ZERO;
        for b in &bets {
            let slot = pools.get_mut(b.outcome);
            *slot = slot.checked_add(b.amount).unwrap();
            total = total.checked_add(b.amount).unwrap();
        }
        MarketSnapshot {
            event_id: "game-1".to_string(),
            status,
            pools,
            total_pool: total,
            bets,
        }
    }

    #[test]
    fn sole_winner_takes_the_whole_pool() {
        let snap = snapshot(
            MarketStatus::Resolved(Outcome::Home),
            vec![
                bet(0, "alice", Outcome::Home, 100),
                bet(1, "bob", Outcome::Away, 400),
            ],
        );
        let payouts = compute_payouts(&snap).unwrap();
        assert_eq!(payouts.len(), 1);
        assert_eq!(payouts[0].bet_id, 0);
        assert_eq!(payouts[0].bettor, "alice");
        assert_eq!(payouts[0].amount, Amount(500));
    }

    #[test]
    fn winners_split_proportionally() {
        let snap = snapshot(
            MarketStatus::Resolved(Outcome::Draw),
            vec![
                bet(0, "alice", Outcome::Draw, 30),
                bet(1, "bob", Outcome::Draw, 70),
                bet(2, "carol", Outcome::Home, 400),
            ],
        );
        let payouts = compute_payouts(&snap).unwrap();
        assert_eq!(payouts.len(), 2);
        assert_eq!(payouts[0].amount, Amount(150));
        assert_eq!(payouts[1].amount, Amount(350));
    }

    #[test]
    fn flooring_dust_stays_bounded_by_winner_count() {
        let snap = snapshot(
            MarketStatus::Resolved(Outcome::Away),
            vec![
                bet(0, "a", Outcome::Away, 33),
                bet(1, "b", Outcome::Away, 33),
                bet(2, "c", Outcome::Away, 34),
                bet(3, "d", Outcome::Home, 201),
            ],
        );
        let payouts = compute_payouts(&snap).unwrap();
        let amounts: Vec<u128> = payouts.iter().map(|p| p.amount.0).collect();
        assert_eq!(amounts, vec![99, 99, 102]);
        let paid: u128 = amounts.iter().sum();
        let dust = snap.total_pool.0 - paid;
        assert!(dust < 3, "dust {dust} not below winner count");
    }

    #[test]
    fn payout_total_never_exceeds_pool() {
        let snap = snapshot(
            MarketStatus::Resolved(Outcome::Home),
            vec![
                bet(0, "a", Outcome::Home, 7),
                bet(1, "b", Outcome::Home, 13),
                bet(2, "c", Outcome::Home, 29),
                bet(3, "d", Outcome::Away, 51),
                bet(4, "e", Outcome::Draw, 17),
            ],
        );
        let payouts = compute_payouts(&snap).unwrap();
        let paid: u128 = payouts.iter().map(|p| p.amount.0).sum();
        assert!(paid <= snap.total_pool.0);
    }

    #[test]
    fn cancelled_market_refunds_every_bet_its_stake() {
        let snap = snapshot(
            MarketStatus::Cancelled,
            vec![
                bet(0, "alice", Outcome::Home, 120),
                bet(1, "bob", Outcome::Draw, 80),
            ],
        );
        let payouts = compute_payouts(&snap).unwrap();
        assert_eq!(payouts.len(), 2);
        assert_eq!(payouts[0].amount, Amount(120));
        assert_eq!(payouts[1].amount, Amount(80));
    }

    #[test]
    fn resolved_with_no_winners_owes_nothing() {
        let snap = snapshot(
            MarketStatus::Resolved(Outcome::Draw),
            vec![
                bet(0, "alice", Outcome::Home, 100),
                bet(1, "bob", Outcome::Away, 100),
            ],
        );
        assert_eq!(compute_payouts(&snap).unwrap(), Vec::new());
    }

    #[test]
    fn understated_winning_pool_is_rejected_not_overpaid() {
        let mut snap = snapshot(
            MarketStatus::Resolved(Outcome::Home),
            vec![bet(0, "alice", Outcome::Home, 100)],
        );
        // A pool half the recorded stake would double every payout.
        snap.pools.home = Amount(50);
        snap.total_pool = Amount(500);
        assert_eq!(
            compute_payouts(&snap),
            Err(SettlementError::InconsistentPools)
        );
    }

    #[test]
    fn overstated_winning_pool_is_rejected() {
        let mut snap = snapshot(
            MarketStatus::Resolved(Outcome::Away),
            vec![
                bet(0, "alice", Outcome::Away, 100),
                bet(1, "bob", Outcome::Home, 100),
            ],
        );
        snap.pools.away = Amount(150);
        assert_eq!(
            compute_payouts(&snap),
            Err(SettlementError::InconsistentPools)
        );
    }

    #[test]
    fn open_or_locked_market_is_an_error() {
        for status in [MarketStatus::Open, MarketStatus::Locked] {
            let snap = snapshot(status, vec![bet(0, "alice", Outcome::Home, 10)]);
            assert_eq!(
                compute_payouts(&snap),
                Err(SettlementError::MarketNotSettled)
            );
        }
    }
}
