use soroban_sdk::{contracttype, symbol_short, Address, Env, Symbol};

use crate::registry::LockRecord;

const TOTALS: Symbol = symbol_short!("TOTALS");
const USER_BAL: Symbol = symbol_short!("BAL");

const TTL_THRESHOLD: u32 = 5184000;
const TTL_EXTEND_TO: u32 = 10368000;

/// Sums over an account's active locks.
#[contracttype]
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct AccountBalance {
    pub locked: i128,
    pub locked_weighted: i128,
}

/// Sums over every active lock in the contract.
#[contracttype]
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct LockTotals {
    pub total_locked: i128,
    pub total_locked_weighted: i128,
}

fn balance_key(account: &Address) -> (Symbol, Address) {
    (USER_BAL, account.clone())
}

pub fn totals(env: &Env) -> LockTotals {
    env.storage().instance().get(&TOTALS).unwrap_or_default()
}

pub fn balance(env: &Env, account: &Address) -> AccountBalance {
    env.storage()
        .persistent()
        .get(&balance_key(account))
        .unwrap_or_default()
}

fn store(env: &Env, account: &Address, balance: &AccountBalance, totals: &LockTotals) {
    let key = balance_key(account);
    env.storage().persistent().set(&key, balance);
    env.storage()
        .persistent()
        .extend_ttl(&key, TTL_THRESHOLD, TTL_EXTEND_TO);
    env.storage().instance().set(&TOTALS, totals);
}

/// Count `record` toward `account`'s and the global active totals.
pub fn add_active(env: &Env, account: &Address, record: &LockRecord) -> AccountBalance {
    let mut balance = balance(env, account);
    let mut totals = totals(env);
    let weighted = record.weighted();

    balance.locked = balance.locked.saturating_add(record.amount);
    balance.locked_weighted = balance.locked_weighted.saturating_add(weighted);
    totals.total_locked = totals.total_locked.saturating_add(record.amount);
    totals.total_locked_weighted = totals.total_locked_weighted.saturating_add(weighted);

    store(env, account, &balance, &totals);
    balance
}

/// Stop counting `record`; called when it leaves the active state.
pub fn remove_active(env: &Env, account: &Address, record: &LockRecord) -> AccountBalance {
    let mut balance = balance(env, account);
    let mut totals = totals(env);
    let weighted = record.weighted();

    balance.locked = balance.locked.saturating_sub(record.amount);
    balance.locked_weighted = balance.locked_weighted.saturating_sub(weighted);
    totals.total_locked = totals.total_locked.saturating_sub(record.amount);
    totals.total_locked_weighted = totals.total_locked_weighted.saturating_sub(weighted);

    store(env, account, &balance, &totals);
    balance
}
