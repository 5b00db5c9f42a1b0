#![allow(deprecated)] // events().publish migration tracked separately

use soroban_sdk::{symbol_short, Address, Env, Vec};

use crate::access::Role;
use crate::config::LockTier;

// ── Event payloads ──────────────────────────────────────────────────────────

/// Fired once when the contract is bootstrapped.
#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct InitializedEvent {
    pub owner: Address,
    pub treasury: Address,
    pub timestamp: u64,
}

/// Fired when a lock is created, by a fresh stake or by a restake.
#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct LockedEvent {
    pub account: Address,
    pub lock_id: u64,
    pub amount: i128,
    pub period: u64,
    pub multiplier: u32,
    pub relock: bool,
    pub new_total_locked: i128,
    pub timestamp: u64,
}

/// Fired when an active lock is exited early and settled with a penalty.
#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct EarlyExitEvent {
    pub account: Address,
    pub lock_id: u64,
    pub amount: i128,
    pub penalty: i128,
    pub timestamp: u64,
}

/// Fired when a lock stops earning and starts maturing.
#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct LateExitEvent {
    pub account: Address,
    pub lock_id: u64,
    pub amount: i128,
    pub unlock_time: u64,
    pub timestamp: u64,
}

/// Fired when a late-exited lock is rolled into a new lock.
#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RestakedEvent {
    pub account: Address,
    pub old_lock_id: u64,
    pub new_lock_id: u64,
    pub amount: i128,
    pub timestamp: u64,
}

/// Fired for every matured lock paid out.
#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct WithdrawnEvent {
    pub account: Address,
    pub lock_id: u64,
    pub amount: i128,
    pub timestamp: u64,
}

#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RewardClaimedEvent {
    pub account: Address,
    pub token: Address,
    pub amount: i128,
    pub timestamp: u64,
}

/// Fired when new reward funds are detected. `distributed` is false when
/// nothing was locked and the inflow was stranded.
#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RewardNotifiedEvent {
    pub token: Address,
    pub amount: i128,
    pub cumulated_reward_per_weight: i128,
    pub distributed: bool,
    pub timestamp: u64,
}

#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct TiersSetEvent {
    pub tiers: Vec<LockTier>,
    pub version: u32,
    pub timestamp: u64,
}

#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PenaltySetEvent {
    pub base_penalty_bps: u32,
    pub time_penalty_bps: u32,
    pub version: u32,
    pub timestamp: u64,
}

#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RelockSetEvent {
    pub default_relock: u64,
    pub version: u32,
    pub timestamp: u64,
}

#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct EarlyExitToggledEvent {
    pub enabled: bool,
    pub version: u32,
    pub timestamp: u64,
}

/// Custody token, treasury or reward token registration.
#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct AddressSetEvent {
    pub address: Address,
    pub timestamp: u64,
}

#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct TokenRecoveredEvent {
    pub token: Address,
    pub to: Address,
    pub amount: i128,
    pub timestamp: u64,
}

#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PauseChangedEvent {
    pub caller: Address,
    pub paused: bool,
    pub timestamp: u64,
}

#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RoleGrantedEvent {
    pub caller: Address,
    pub target: Address,
    pub role: Role,
    pub timestamp: u64,
}

#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RoleRevokedEvent {
    pub caller: Address,
    pub target: Address,
    pub timestamp: u64,
}

// ── Publishers ──────────────────────────────────────────────────────────────

pub fn publish_initialized(env: &Env, owner: Address, treasury: Address) {
    env.events().publish(
        (symbol_short!("INIT"),),
        InitializedEvent {
            owner,
            treasury,
            timestamp: env.ledger().timestamp(),
        },
    );
}

#[allow(clippy::too_many_arguments)]
pub fn publish_locked(
    env: &Env,
    account: Address,
    lock_id: u64,
    amount: i128,
    period: u64,
    multiplier: u32,
    relock: bool,
    new_total_locked: i128,
) {
    env.events().publish(
        (symbol_short!("LOCKED"), account.clone()),
        LockedEvent {
            account,
            lock_id,
            amount,
            period,
            multiplier,
            relock,
            new_total_locked,
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn publish_early_exit(
    env: &Env,
    account: Address,
    lock_id: u64,
    amount: i128,
    penalty: i128,
) {
    env.events().publish(
        (symbol_short!("EARLY_EX"), account.clone()),
        EarlyExitEvent {
            account,
            lock_id,
            amount,
            penalty,
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn publish_late_exit(
    env: &Env,
    account: Address,
    lock_id: u64,
    amount: i128,
    unlock_time: u64,
) {
    env.events().publish(
        (symbol_short!("LATE_EX"), account.clone()),
        LateExitEvent {
            account,
            lock_id,
            amount,
            unlock_time,
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn publish_restaked(
    env: &Env,
    account: Address,
    old_lock_id: u64,
    new_lock_id: u64,
    amount: i128,
) {
    env.events().publish(
        (symbol_short!("RESTAKED"), account.clone()),
        RestakedEvent {
            account,
            old_lock_id,
            new_lock_id,
            amount,
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn publish_withdrawn(env: &Env, account: Address, lock_id: u64, amount: i128) {
    env.events().publish(
        (symbol_short!("WITHDRAWN"), account.clone()),
        WithdrawnEvent {
            account,
            lock_id,
            amount,
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn publish_reward_claimed(env: &Env, account: Address, token: Address, amount: i128) {
    env.events().publish(
        (symbol_short!("CLMD"), account.clone()),
        RewardClaimedEvent {
            account,
            token,
            amount,
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn publish_reward_notified(
    env: &Env,
    token: Address,
    amount: i128,
    cumulated_reward_per_weight: i128,
    distributed: bool,
) {
    env.events().publish(
        (symbol_short!("RWD_IN"), token.clone()),
        RewardNotifiedEvent {
            token,
            amount,
            cumulated_reward_per_weight,
            distributed,
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn publish_tiers_set(env: &Env, tiers: Vec<LockTier>, version: u32) {
    env.events().publish(
        (symbol_short!("TIERS"),),
        TiersSetEvent {
            tiers,
            version,
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn publish_penalty_set(env: &Env, base_penalty_bps: u32, time_penalty_bps: u32, version: u32) {
    env.events().publish(
        (symbol_short!("PENALTY"),),
        PenaltySetEvent {
            base_penalty_bps,
            time_penalty_bps,
            version,
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn publish_relock_set(env: &Env, default_relock: u64, version: u32) {
    env.events().publish(
        (symbol_short!("RELOCK"),),
        RelockSetEvent {
            default_relock,
            version,
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn publish_early_exit_toggled(env: &Env, enabled: bool, version: u32) {
    env.events().publish(
        (symbol_short!("EARLY_SW"),),
        EarlyExitToggledEvent {
            enabled,
            version,
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn publish_stake_token_set(env: &Env, address: Address) {
    env.events().publish(
        (symbol_short!("STK_TOK"),),
        AddressSetEvent {
            address,
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn publish_treasury_set(env: &Env, address: Address) {
    env.events().publish(
        (symbol_short!("TREASURY"),),
        AddressSetEvent {
            address,
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn publish_reward_token_registered(env: &Env, address: Address) {
    env.events().publish(
        (symbol_short!("RWD_TOK"),),
        AddressSetEvent {
            address,
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn publish_token_recovered(env: &Env, token: Address, to: Address, amount: i128) {
    env.events().publish(
        (symbol_short!("RECOVER"), token.clone()),
        TokenRecoveredEvent {
            token,
            to,
            amount,
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn publish_pause_changed(env: &Env, caller: Address, paused: bool) {
    env.events().publish(
        (symbol_short!("PAUSE"), caller.clone()),
        PauseChangedEvent {
            caller,
            paused,
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn publish_role_granted(env: &Env, caller: Address, target: Address, role: Role) {
    env.events().publish(
        (symbol_short!("ROLE_GRT"), target.clone()),
        RoleGrantedEvent {
            caller,
            target,
            role,
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn publish_role_revoked(env: &Env, caller: Address, target: Address) {
    env.events().publish(
        (symbol_short!("ROLE_REV"), target.clone()),
        RoleRevokedEvent {
            caller,
            target,
            timestamp: env.ledger().timestamp(),
        },
    );
}
