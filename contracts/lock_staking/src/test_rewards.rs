extern crate std;

use soroban_sdk::{testutils::Address as _, vec, Address};

use crate::test::{expect_err, setup, DAY, TIER_10S, TIER_30D, TIER_360D, TIER_60D};
use crate::ContractError;

fn claimable(s: &crate::test::Setup, who: &Address, token: &Address) -> i128 {
    s.client
        .claimable_rewards(who)
        .iter()
        .find(|r| r.token == *token)
        .map(|r| r.amount)
        .unwrap_or(0)
}

// ── Pro-rata distribution ─────────────────────────────────────────────────────

#[test]
fn test_inflow_split_by_tier_multiplier() {
    let s = setup();
    let one = Address::generate(&s.env);
    let two = Address::generate(&s.env);
    let three = Address::generate(&s.env);

    s.stake(&one, 1_000, TIER_30D);
    s.stake(&two, 1_000, TIER_60D);
    s.stake(&three, 1_000, TIER_360D);

    s.fund(&s.reward_a, 600);
    assert_eq!(s.client.notify_inflow(&s.reward_a), 600);

    s.client.claim_all_rewards(&one);
    s.client.claim_all_rewards(&two);
    s.client.claim_all_rewards(&three);

    assert_eq!(s.balance_of(&s.reward_a, &one), 100);
    assert_eq!(s.balance_of(&s.reward_a, &two), 200);
    assert_eq!(s.balance_of(&s.reward_a, &three), 300);
    assert_eq!(s.balance_of(&s.reward_a, &s.contract_id), 0);
}

#[test]
fn test_reward_tokens_are_independent() {
    let s = setup();
    let alice = Address::generate(&s.env);
    let bob = Address::generate(&s.env);
    s.stake(&alice, 1_000, TIER_30D);
    s.stake(&bob, 3_000, TIER_30D);

    s.fund(&s.reward_a, 400);
    s.fund(&s.reward_b, 8_000);
    s.client.notify_inflow(&s.reward_a);
    s.client.notify_inflow(&s.reward_b);

    let paid = s.client.claim_rewards(&alice, &vec![&s.env, s.reward_b.clone()]);
    assert_eq!(paid.len(), 1);
    assert_eq!(paid.get(0).unwrap().amount, 2_000);

    assert_eq!(s.balance_of(&s.reward_a, &alice), 0);
    assert_eq!(claimable(&s, &alice, &s.reward_a), 100);
    assert_eq!(claimable(&s, &bob, &s.reward_a), 300);
    assert_eq!(claimable(&s, &bob, &s.reward_b), 6_000);
}

// ── Settlement ────────────────────────────────────────────────────────────────

#[test]
fn test_second_claim_without_inflow_pays_nothing() {
    let s = setup();
    let alice = Address::generate(&s.env);
    s.stake(&alice, 1_000, TIER_30D);

    s.fund(&s.reward_a, 250);
    s.client.notify_inflow(&s.reward_a);

    s.client.claim_all_rewards(&alice);
    assert_eq!(s.balance_of(&s.reward_a, &alice), 250);

    let second = s.client.claim_all_rewards(&alice);
    assert!(second.iter().all(|r| r.amount == 0));
    assert_eq!(s.balance_of(&s.reward_a, &alice), 250);
    assert_eq!(s.client.rewards_paid(&alice, &s.reward_a), 250);
}

#[test]
fn test_stake_settles_before_weight_changes() {
    let s = setup();
    let alice = Address::generate(&s.env);
    s.stake(&alice, 1_000, TIER_30D);

    s.fund(&s.reward_a, 100);
    s.client.notify_inflow(&s.reward_a);

    // Tripling the weight afterwards must not inflate the earlier accrual.
    s.stake(&alice, 2_000, TIER_30D);
    assert_eq!(claimable(&s, &alice, &s.reward_a), 100);
}

#[test]
fn test_unnotified_inflow_goes_to_existing_stakers() {
    let s = setup();
    let alice = Address::generate(&s.env);
    let bob = Address::generate(&s.env);
    s.stake(&alice, 1_000, TIER_30D);

    // Funds land before bob joins; nobody calls notify.
    s.fund(&s.reward_a, 600);
    assert_eq!(claimable(&s, &alice, &s.reward_a), 600);

    s.stake(&bob, 1_000, TIER_30D);

    assert_eq!(claimable(&s, &alice, &s.reward_a), 600);
    assert_eq!(claimable(&s, &bob, &s.reward_a), 0);
}

#[test]
fn test_late_exit_stops_accrual() {
    let s = setup();
    let alice = Address::generate(&s.env);
    let bob = Address::generate(&s.env);
    let alice_lock = s.stake(&alice, 1_000, TIER_30D);
    s.stake(&bob, 1_000, TIER_30D);

    s.client.exit_late_by_id(&alice, &alice_lock);

    s.fund(&s.reward_a, 500);
    s.client.notify_inflow(&s.reward_a);

    s.client.claim_all_rewards(&alice);
    s.client.claim_all_rewards(&bob);
    assert_eq!(s.balance_of(&s.reward_a, &alice), 0);
    assert_eq!(s.balance_of(&s.reward_a, &bob), 500);
}

#[test]
fn test_early_exit_keeps_rewards_earned_before_exit() {
    let s = setup();
    let alice = Address::generate(&s.env);
    let bob = Address::generate(&s.env);
    s.set_time(0);
    let id = s.stake(&alice, 1_000, TIER_10S);
    s.stake(&bob, 1_000, TIER_30D);

    s.fund(&s.reward_a, 200);
    s.client.notify_inflow(&s.reward_a);

    s.set_time(5);
    s.client.early_exit_by_id(&alice, &id);

    // Later inflow goes entirely to bob.
    s.fund(&s.reward_a, 300);
    s.client.notify_inflow(&s.reward_a);

    s.client.claim_all_rewards(&alice);
    s.client.claim_all_rewards(&bob);
    assert_eq!(s.balance_of(&s.reward_a, &alice), 100);
    assert_eq!(s.balance_of(&s.reward_a, &bob), 400);
}

#[test]
fn test_restaked_lock_earns_at_new_multiplier() {
    let s = setup();
    let alice = Address::generate(&s.env);
    let bob = Address::generate(&s.env);
    s.set_time(0);
    let id = s.stake(&alice, 1_000, TIER_30D);
    s.stake(&bob, 1_000, TIER_30D);

    s.set_time(DAY);
    s.client.exit_late_by_id(&alice, &id);
    s.client.restake_after_late_exit(&alice, &id, &TIER_360D);

    // weights: alice 3_000, bob 1_000
    s.fund(&s.reward_a, 4_000);
    s.client.notify_inflow(&s.reward_a);

    assert_eq!(claimable(&s, &alice, &s.reward_a), 3_000);
    assert_eq!(claimable(&s, &bob, &s.reward_a), 1_000);
}

#[test]
fn test_large_staker_earns_after_tiny_first_stake() {
    let s = setup();
    let alice = Address::generate(&s.env);
    let bob = Address::generate(&s.env);

    // A single-unit stake absorbs a large inflow, pushing the accumulator up.
    s.stake(&alice, 1, TIER_30D);
    s.fund(&s.reward_a, 10_000_000_000_000);
    s.client.notify_inflow(&s.reward_a);

    s.stake(&bob, 100_000_000_000_000, TIER_30D);
    s.fund(&s.reward_a, 10_000_000_000_000);
    s.client.notify_inflow(&s.reward_a);

    assert_eq!(claimable(&s, &bob, &s.reward_a), 9_999_999_999_900);
    assert_eq!(claimable(&s, &alice, &s.reward_a), 10_000_000_000_000);

    s.client.claim_all_rewards(&bob);
    s.client.claim_all_rewards(&alice);
    assert_eq!(s.balance_of(&s.reward_a, &bob), 9_999_999_999_900);
    assert_eq!(s.balance_of(&s.reward_a, &alice), 10_000_000_000_000);
    assert_eq!(s.balance_of(&s.reward_a, &s.contract_id), 100);
}

// ── Zero weighted stake ───────────────────────────────────────────────────────

#[test]
fn test_inflow_with_nothing_locked_is_stranded() {
    let s = setup();
    let alice = Address::generate(&s.env);

    s.fund(&s.reward_a, 1_000);
    assert_eq!(s.client.notify_inflow(&s.reward_a), 1_000);

    let channel = s.client.get_reward_channel(&s.reward_a);
    assert_eq!(channel.tracked_balance, 1_000);
    assert_eq!(channel.cumulated_reward_per_weight, 0);

    s.stake(&alice, 1_000, TIER_30D);
    assert_eq!(claimable(&s, &alice, &s.reward_a), 0);

    // Only inflow arriving after the stake is distributed.
    s.fund(&s.reward_a, 300);
    s.client.notify_inflow(&s.reward_a);
    s.client.claim_all_rewards(&alice);
    assert_eq!(s.balance_of(&s.reward_a, &alice), 300);
    assert_eq!(s.balance_of(&s.reward_a, &s.contract_id), 1_000);
}

// ── Accounting ────────────────────────────────────────────────────────────────

#[test]
fn test_claim_reduces_tracked_balance_and_keeps_dust() {
    let s = setup();
    let users = [
        Address::generate(&s.env),
        Address::generate(&s.env),
        Address::generate(&s.env),
    ];
    for u in users.iter() {
        s.stake(u, 1_000, TIER_30D);
    }

    s.fund(&s.reward_a, 100);
    s.client.notify_inflow(&s.reward_a);

    for u in users.iter() {
        s.client.claim_all_rewards(u);
        assert_eq!(s.balance_of(&s.reward_a, u), 33);
    }

    let channel = s.client.get_reward_channel(&s.reward_a);
    assert_eq!(channel.total_paid, 99);
    assert_eq!(channel.tracked_balance, 1);
    assert_eq!(s.balance_of(&s.reward_a, &s.contract_id), 1);

    // Nothing new arrived, so the next notify sees nothing.
    assert_eq!(s.client.notify_inflow(&s.reward_a), 0);
}

#[test]
fn test_notify_unregistered_token_fails() {
    let s = setup();
    let stray = s
        .env
        .register_stellar_asset_contract_v2(Address::generate(&s.env))
        .address();

    expect_err(s.client.try_notify_inflow(&stray), ContractError::NotConfigured);
    expect_err(s.client.try_notify_inflow(&s.stake_token), ContractError::NotConfigured);
}

#[test]
fn test_claim_unregistered_token_fails() {
    let s = setup();
    let alice = Address::generate(&s.env);
    s.stake(&alice, 1_000, TIER_30D);

    expect_err(
        s.client
            .try_claim_rewards(&alice, &vec![&s.env, s.stake_token.clone()]),
        ContractError::NotConfigured,
    );
}

#[test]
fn test_maturing_lock_withdrawal_does_not_disturb_rewards() {
    let s = setup();
    let alice = Address::generate(&s.env);
    let bob = Address::generate(&s.env);
    s.set_time(0);
    let id = s.stake(&alice, 1_000, TIER_10S);
    s.stake(&bob, 1_000, TIER_30D);

    s.fund(&s.reward_b, 1_000);
    s.client.notify_inflow(&s.reward_b);

    s.set_time(2);
    s.client.exit_late_by_id(&alice, &id);
    s.set_time(20);
    s.client.withdraw_unlocked_by_id(&alice, &id);

    assert_eq!(claimable(&s, &alice, &s.reward_b), 500);
    assert_eq!(claimable(&s, &bob, &s.reward_b), 500);
    assert_eq!(s.client.get_totals().total_locked_weighted, 1_000);
}
