use soroban_sdk::{contracttype, symbol_short, Address, Env, Symbol, Vec};

use crate::ContractError;

// ── Storage key constants ───────────────────────────────────────────────────

/// Counter for generating monotonic lock ids.
const LOCK_CTR: Symbol = symbol_short!("LOCK_CTR");
const LOCK: Symbol = symbol_short!("LOCK");
const LOCK_IDS: Symbol = symbol_short!("LK_IDS");
const LOCK_POS: Symbol = symbol_short!("LK_POS");

const TTL_THRESHOLD: u32 = 5184000;
const TTL_EXTEND_TO: u32 = 10368000;

/// Most locks one account may hold at a time.
///
/// `withdraw_all_unlocked` touches every held lock in a single invocation;
/// this keeps that pass inside the host's per-transaction ledger entry
/// limits.
pub const MAX_LOCKS_PER_ACCOUNT: u32 = 16;

// ── Types ───────────────────────────────────────────────────────────────────

/// A single lock held by an account.
///
/// `unlock_time == 0` means the lock is active: it earns rewards and is
/// counted in the locked totals. Any other value means the lock has been
/// exited and is waiting to be withdrawn.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct LockRecord {
    /// Unique id, assigned by the registry and never reused.
    pub id: u64,
    pub amount: i128,
    pub start_time: u64,
    /// Lock duration in seconds, copied from the tier at creation.
    pub period: u64,
    /// Reward weight, copied from the tier at creation.
    pub multiplier: u32,
    pub unlock_time: u64,
    /// Set once a late exit has been initiated; gates restaking.
    pub exited_late: bool,
}

impl LockRecord {
    pub fn is_active(&self) -> bool {
        self.unlock_time == 0
    }

    pub fn is_unlocked(&self, now: u64) -> bool {
        self.unlock_time != 0 && self.unlock_time < now
    }

    pub fn weighted(&self) -> i128 {
        self.amount.saturating_mul(self.multiplier as i128)
    }
}

// ── Storage helpers ─────────────────────────────────────────────────────────

fn lock_key(id: u64) -> (Symbol, u64) {
    (LOCK, id)
}

fn ids_key(owner: &Address) -> (Symbol, Address) {
    (LOCK_IDS, owner.clone())
}

fn pos_key(owner: &Address, id: u64) -> (Symbol, Address, u64) {
    (LOCK_POS, owner.clone(), id)
}

fn next_lock_id(env: &Env) -> u64 {
    let current: u64 = env.storage().instance().get(&LOCK_CTR).unwrap_or(0u64);
    let next = current.saturating_add(1);
    env.storage().instance().set(&LOCK_CTR, &next);
    next
}

fn store_record(env: &Env, record: &LockRecord) {
    let key = lock_key(record.id);
    env.storage().persistent().set(&key, record);
    env.storage()
        .persistent()
        .extend_ttl(&key, TTL_THRESHOLD, TTL_EXTEND_TO);
}

fn store_ids(env: &Env, owner: &Address, ids: &Vec<u64>) {
    let key = ids_key(owner);
    if ids.is_empty() {
        env.storage().persistent().remove(&key);
        return;
    }
    env.storage().persistent().set(&key, ids);
    env.storage()
        .persistent()
        .extend_ttl(&key, TTL_THRESHOLD, TTL_EXTEND_TO);
}

fn position(env: &Env, owner: &Address, id: u64) -> Option<u32> {
    env.storage().persistent().get(&pos_key(owner, id))
}

// ── Registry operations ─────────────────────────────────────────────────────

/// Store `record` under a fresh id and add it to `owner`'s set.
///
/// The `id` field of the passed record is ignored. Fails with
/// `TooManyLocks` once `owner` holds [`MAX_LOCKS_PER_ACCOUNT`] locks.
pub fn create(env: &Env, owner: &Address, mut record: LockRecord) -> Result<u64, ContractError> {
    let mut ids = ids(env, owner);
    if ids.len() >= MAX_LOCKS_PER_ACCOUNT {
        return Err(ContractError::TooManyLocks);
    }

    let id = next_lock_id(env);
    record.id = id;
    store_record(env, &record);

    let pos = ids.len();
    ids.push_back(id);
    store_ids(env, owner, &ids);
    env.storage().persistent().set(&pos_key(owner, id), &pos);

    Ok(id)
}

/// Delete `id` from `owner`'s set and drop the record.
///
/// Swap-removes inside the id list, so enumeration order is not stable.
pub fn remove(env: &Env, owner: &Address, id: u64) -> Result<(), ContractError> {
    let pos = position(env, owner, id).ok_or(ContractError::UnknownLock)?;
    let mut ids = ids(env, owner);
    let last = ids.len().checked_sub(1).ok_or(ContractError::UnknownLock)?;

    if pos != last {
        let moved = ids.get(last).ok_or(ContractError::UnknownLock)?;
        ids.set(pos, moved);
        env.storage().persistent().set(&pos_key(owner, moved), &pos);
    }
    ids.pop_back();
    store_ids(env, owner, &ids);

    env.storage().persistent().remove(&pos_key(owner, id));
    env.storage().persistent().remove(&lock_key(id));
    Ok(())
}

pub fn contains(env: &Env, owner: &Address, id: u64) -> bool {
    env.storage().persistent().has(&pos_key(owner, id))
}

pub fn get(env: &Env, owner: &Address, id: u64) -> Result<LockRecord, ContractError> {
    if !contains(env, owner, id) {
        return Err(ContractError::UnknownLock);
    }
    env.storage()
        .persistent()
        .get(&lock_key(id))
        .ok_or(ContractError::UnknownLock)
}

pub fn count(env: &Env, owner: &Address) -> u32 {
    ids(env, owner).len()
}

/// Snapshot of every id `owner` currently holds.
pub fn ids(env: &Env, owner: &Address) -> Vec<u64> {
    env.storage()
        .persistent()
        .get(&ids_key(owner))
        .unwrap_or(Vec::new(env))
}

/// Records `[page × page_size, (page + 1) × page_size)` of `owner`'s set.
///
/// The final page is shorter rather than padded; pages past the end are
/// empty. A page never holds more than [`MAX_LOCKS_PER_ACCOUNT`] records.
pub fn list_page(env: &Env, owner: &Address, page: u32, page_size: u32) -> Vec<LockRecord> {
    let ids = ids(env, owner);
    let start = page.saturating_mul(page_size);
    let end = start.saturating_add(page_size).min(ids.len());

    let mut out = Vec::new(env);
    let mut i = start;
    while i < end {
        if let Some(id) = ids.get(i) {
            if let Some(record) = env.storage().persistent().get::<_, LockRecord>(&lock_key(id)) {
                out.push_back(record);
            }
        }
        i += 1;
    }
    out
}

pub fn set_unlock_time(
    env: &Env,
    owner: &Address,
    id: u64,
    unlock_time: u64,
) -> Result<LockRecord, ContractError> {
    let mut record = get(env, owner, id)?;
    record.unlock_time = unlock_time;
    store_record(env, &record);
    Ok(record)
}

pub fn mark_exited_late(env: &Env, owner: &Address, id: u64) -> Result<LockRecord, ContractError> {
    let mut record = get(env, owner, id)?;
    record.exited_late = true;
    store_record(env, &record);
    Ok(record)
}
