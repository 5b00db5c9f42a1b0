#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use lock_staking::{LockStakingContract, LockStakingContractClient};
use soroban_sdk::testutils::{Address as _, Ledger as _};
use soroban_sdk::token::{Client as TokenClient, StellarAssetClient};
use soroban_sdk::{vec, Address, Env};

const DAY: u64 = 86_400;

#[derive(Arbitrary, Debug)]
pub enum FuzzAction {
    Stake { amount: u32, tier: u8 },
    EarlyExit { lock_id: u8 },
    ExitLate { lock_id: u8 },
    Restake { lock_id: u8, tier: u8 },
    Withdraw { lock_id: u8 },
    WithdrawAll,
    Claim,
    Fund { amount: u32 },
    Advance { secs: u32 },
}

fuzz_target!(|actions: Vec<FuzzAction>| {
    let env = Env::default();
    env.mock_all_auths();

    let owner = Address::generate(&env);
    let treasury = Address::generate(&env);
    let stake_token = env
        .register_stellar_asset_contract_v2(owner.clone())
        .address();
    let reward_token = env
        .register_stellar_asset_contract_v2(owner.clone())
        .address();

    let contract_id = env.register(LockStakingContract, ());
    let client = LockStakingContractClient::new(&env, &contract_id);
    client.initialize(&owner, &treasury);
    client.set_stake_token(&owner, &stake_token);
    client.register_reward_token(&owner, &reward_token);
    client.set_lock_tiers(
        &owner,
        &vec![&env, 30 * DAY, 60 * DAY, 360 * DAY],
        &vec![&env, 1u32, 2u32, 3u32],
    );
    client.set_penalty_config(&owner, &1_500, &3_500);
    client.set_early_exit_enabled(&owner, &true);

    let users = [
        Address::generate(&env),
        Address::generate(&env),
        Address::generate(&env),
    ];
    let stake = TokenClient::new(&env, &stake_token);
    let reward = TokenClient::new(&env, &reward_token);
    let mut funded: i128 = 0;

    // Rejections are expected; only panics and broken invariants are findings.
    for (i, action) in actions.into_iter().enumerate() {
        let caller = &users[i % users.len()];
        match action {
            FuzzAction::Stake { amount, tier } => {
                let amt = amount as i128;
                if amt > 0 {
                    StellarAssetClient::new(&env, &stake_token).mint(caller, &amt);
                }
                let _ = client.try_stake(caller, &amt, caller, &(tier as u32));
            }
            FuzzAction::EarlyExit { lock_id } => {
                let _ = client.try_early_exit_by_id(caller, &(lock_id as u64));
            }
            FuzzAction::ExitLate { lock_id } => {
                let _ = client.try_exit_late_by_id(caller, &(lock_id as u64));
            }
            FuzzAction::Restake { lock_id, tier } => {
                let _ =
                    client.try_restake_after_late_exit(caller, &(lock_id as u64), &(tier as u32));
            }
            FuzzAction::Withdraw { lock_id } => {
                let _ = client.try_withdraw_unlocked_by_id(caller, &(lock_id as u64));
            }
            FuzzAction::WithdrawAll => {
                let _ = client.try_withdraw_all_unlocked(caller);
            }
            FuzzAction::Claim => {
                let _ = client.try_claim_all_rewards(caller);
            }
            FuzzAction::Fund { amount } => {
                if amount > 0 {
                    StellarAssetClient::new(&env, &reward_token)
                        .mint(&contract_id, &(amount as i128));
                    funded += amount as i128;
                }
                let _ = client.try_notify_inflow(&reward_token);
            }
            FuzzAction::Advance { secs } => {
                let now = env.ledger().timestamp();
                env.ledger().set_timestamp(now + secs as u64);
            }
        }

        let mut custody = 0i128;
        let mut paid = 0i128;
        for user in users.iter() {
            let pages = client.lock_count(user).div_ceil(50);
            for page in 0..pages {
                for record in client.list_locks(user, &page, &50).iter() {
                    custody += record.amount;
                }
            }
            paid += reward.balance(user);
        }
        assert_eq!(stake.balance(&contract_id), custody);
        assert_eq!(paid + reward.balance(&contract_id), funded);
    }
});
