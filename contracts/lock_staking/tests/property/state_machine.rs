#![allow(clippy::unwrap_used, clippy::expect_used, clippy::arithmetic_side_effects)]
//! Property-based state machine tests for the lock ledger.
//!
//! Random sequences of user actions are applied and the ledger is checked
//! after every step.
//!
//! Invariants tested:
//! - Account and global locked totals equal the sums over active locks
//! - Custody holds exactly the amounts of all unwithdrawn locks
//! - Reward tokens are never paid out beyond what was funded

use proptest::prelude::*;

use crate::harness::{Action, Harness};

fn check_conservation(h: &Harness) -> Result<(), TestCaseError> {
    let mut total_locked = 0i128;
    let mut total_weighted = 0i128;
    let mut in_custody = 0i128;

    for (i, user) in h.users.iter().enumerate() {
        let mut locked = 0i128;
        let mut weighted = 0i128;
        for record in h.locks(i) {
            in_custody += record.amount;
            if record.unlock_time == 0 {
                locked += record.amount;
                weighted += record.amount * record.multiplier as i128;
            }
        }
        let balance = h.client.get_balance(user);
        prop_assert_eq!(balance.locked, locked);
        prop_assert_eq!(balance.locked_weighted, weighted);
        total_locked += locked;
        total_weighted += weighted;
    }

    let totals = h.client.get_totals();
    prop_assert_eq!(totals.total_locked, total_locked);
    prop_assert_eq!(totals.total_locked_weighted, total_weighted);
    prop_assert_eq!(h.balance(&h.stake_token, &h.contract_id), in_custody);
    Ok(())
}

fn check_reward_solvency(h: &Harness) -> Result<(), TestCaseError> {
    let mut paid = 0i128;
    let mut owed = 0i128;
    for user in h.users.iter() {
        paid += h.balance(&h.reward_token, user);
        for r in h.client.claimable_rewards(user).iter() {
            owed += r.amount;
        }
    }
    let held = h.balance(&h.reward_token, &h.contract_id);

    prop_assert_eq!(paid + held, h.funded);
    prop_assert!(owed <= held, "owed {} exceeds held {}", owed, held);
    Ok(())
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    /// Totals and custody stay consistent across any action sequence.
    #[test]
    fn prop_ledger_conserved(actions in prop::collection::vec(any::<Action>(), 1..30)) {
        let mut h = Harness::new();
        for action in actions.iter() {
            h.apply(action);
            check_conservation(&h)?;
        }
    }

    /// Rewards paid plus rewards held always equal rewards funded, and
    /// nobody is owed more than the contract holds.
    #[test]
    fn prop_rewards_never_overpaid(actions in prop::collection::vec(any::<Action>(), 1..30)) {
        let mut h = Harness::new();
        for action in actions.iter() {
            h.apply(action);
            check_reward_solvency(&h)?;
        }
    }

    /// A claim immediately followed by another claim pays nothing the
    /// second time.
    #[test]
    fn prop_repeated_claim_pays_once(
        actions in prop::collection::vec(any::<Action>(), 1..20),
        user in 0usize..3,
    ) {
        let mut h = Harness::new();
        for action in actions.iter() {
            h.apply(action);
        }
        let who = h.users[user].clone();
        let _ = h.client.try_claim_all_rewards(&who);
        let before = h.balance(&h.reward_token, &who);
        let second = h.client.claim_all_rewards(&who);
        prop_assert!(second.iter().all(|r| r.amount == 0));
        prop_assert_eq!(h.balance(&h.reward_token, &who), before);
    }

    /// Early exit never refunds more than the lock, and the treasury gets
    /// the rest.
    #[test]
    fn prop_early_exit_splits_amount(
        amount in 1i128..1_000_000,
        tier in 0u32..4,
        wait in 0u64..(400 * 86_400),
    ) {
        let mut h = Harness::new();
        h.apply(&Action::Stake { user: 0, amount, tier });
        h.apply(&Action::Advance { secs: wait + 1 });

        let who = h.users[0].clone();
        let id = h.locks(0)[0].id;
        let treasury_before = h.balance(&h.stake_token, &h.treasury);
        let receipt = h.client.early_exit_by_id(&who, &id);

        prop_assert!(receipt.penalty >= amount * 1_500 / 10_000);
        prop_assert!(receipt.penalty <= amount * 5_000 / 10_000);
        prop_assert_eq!(receipt.paid + receipt.penalty, amount);
        prop_assert_eq!(h.balance(&h.stake_token, &who), receipt.paid);
        prop_assert_eq!(
            h.balance(&h.stake_token, &h.treasury) - treasury_before,
            receipt.penalty
        );
    }
}
