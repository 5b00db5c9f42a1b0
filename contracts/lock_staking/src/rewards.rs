use soroban_sdk::{contracttype, symbol_short, token, Address, Env, Symbol, Vec};

use crate::{events, ContractError};

/// Fixed-point scaling factor.
///
/// The accumulator, debt snapshots and claimable balances are all kept
/// multiplied by this constant; amounts are only divided back down when
/// they are paid out.
pub const PRECISION: i128 = 1_000_000_000_000;

/// Upper bound on registered reward tokens; settlement loops over all of them.
pub const MAX_REWARD_TOKENS: u32 = 8;

// ── Storage key constants ───────────────────────────────────────────────────

const REWARD_TOKENS: Symbol = symbol_short!("RWD_TOKS");
const CHANNEL: Symbol = symbol_short!("RWD_CHAN");
const USER_RPW_PAID: Symbol = symbol_short!("RWD_SNAP");
const USER_CLAIMABLE: Symbol = symbol_short!("RWD_CLM");
const USER_PAID: Symbol = symbol_short!("RWD_PAID");

const TTL_THRESHOLD: u32 = 5184000;
const TTL_EXTEND_TO: u32 = 10368000;

// ── Types ───────────────────────────────────────────────────────────────────

/// Per reward-token accumulator state.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RewardChannel {
    /// Reward per unit of weighted stake since registration, scaled by
    /// [`PRECISION`]. Never decreases.
    pub cumulated_reward_per_weight: i128,
    /// Funds already attributed; custody balance above this is new inflow.
    pub tracked_balance: i128,
    pub last_update_time: u64,
    pub total_paid: i128,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RewardAmount {
    pub token: Address,
    pub amount: i128,
}

// ── Core reward math ────────────────────────────────────────────────────────

/// Fold `unseen` inflow into the accumulator.
///
/// ```text
/// cum' = cum + unseen × PRECISION / total_weighted
/// ```
///
/// With no weighted stake the accumulator is left untouched; the caller
/// still marks the inflow as tracked, so those funds are never distributed.
pub fn accumulate(cum: i128, unseen: i128, total_weighted: i128) -> Result<i128, ContractError> {
    if unseen <= 0 || total_weighted <= 0 {
        return Ok(cum);
    }
    unseen
        .checked_mul(PRECISION)
        .and_then(|scaled| scaled.checked_div(total_weighted))
        .and_then(|step| cum.checked_add(step))
        .ok_or(ContractError::MathOverflow)
}

/// Scaled rewards accrued since the account's accumulator snapshot.
///
/// ```text
/// accrued = (cum − cum_paid) × weighted
/// ```
///
/// The snapshot is retaken after every weight change, so this equals
/// `cum × weighted − debt` without ever forming the full product.
pub fn accrued(cum: i128, weighted: i128, cum_paid: i128) -> Result<i128, ContractError> {
    let delta = cum.saturating_sub(cum_paid).max(0);
    if delta == 0 || weighted <= 0 {
        return Ok(0);
    }
    delta
        .checked_mul(weighted)
        .ok_or(ContractError::MathOverflow)
}

/// Split a scaled claimable balance into the payable amount and the
/// sub-unit remainder that stays claimable.
#[allow(clippy::arithmetic_side_effects)]
pub fn descale(scaled: i128) -> (i128, i128) {
    if scaled <= 0 {
        return (0, 0);
    }
    (scaled / PRECISION, scaled % PRECISION)
}

// ── Storage helpers ─────────────────────────────────────────────────────────

fn channel_key(token: &Address) -> (Symbol, Address) {
    (CHANNEL, token.clone())
}

fn user_key(prefix: Symbol, account: &Address, token: &Address) -> (Symbol, Address, Address) {
    (prefix, account.clone(), token.clone())
}

fn get_user(env: &Env, prefix: Symbol, account: &Address, token: &Address) -> i128 {
    env.storage()
        .persistent()
        .get(&user_key(prefix, account, token))
        .unwrap_or(0)
}

fn set_user(env: &Env, prefix: Symbol, account: &Address, token: &Address, value: i128) {
    let key = user_key(prefix, account, token);
    env.storage().persistent().set(&key, &value);
    env.storage()
        .persistent()
        .extend_ttl(&key, TTL_THRESHOLD, TTL_EXTEND_TO);
}

fn store_channel(env: &Env, token: &Address, channel: &RewardChannel) {
    let key = channel_key(token);
    env.storage().persistent().set(&key, channel);
    env.storage()
        .persistent()
        .extend_ttl(&key, TTL_THRESHOLD, TTL_EXTEND_TO);
}

pub fn reward_tokens(env: &Env) -> Vec<Address> {
    env.storage()
        .instance()
        .get(&REWARD_TOKENS)
        .unwrap_or(Vec::new(env))
}

pub fn is_registered(env: &Env, token: &Address) -> bool {
    reward_tokens(env).iter().any(|t| t == *token)
}

pub fn channel(env: &Env, token: &Address) -> Result<RewardChannel, ContractError> {
    env.storage()
        .persistent()
        .get(&channel_key(token))
        .ok_or(ContractError::NotConfigured)
}

/// Open a channel for `token`. One-shot; there is no removal.
pub fn register(env: &Env, token: &Address) -> Result<(), ContractError> {
    let mut tokens = reward_tokens(env);
    if tokens.iter().any(|t| t == *token) {
        return Err(ContractError::AlreadyConfigured);
    }
    if tokens.len() >= MAX_REWARD_TOKENS {
        return Err(ContractError::BadConfiguration);
    }
    tokens.push_back(token.clone());
    env.storage().instance().set(&REWARD_TOKENS, &tokens);

    store_channel(
        env,
        token,
        &RewardChannel {
            cumulated_reward_per_weight: 0,
            tracked_balance: 0,
            last_update_time: env.ledger().timestamp(),
            total_paid: 0,
        },
    );
    Ok(())
}

fn custody_balance(env: &Env, token: &Address) -> i128 {
    token::Client::new(env, token).balance(&env.current_contract_address())
}

// ── Accumulator operations ──────────────────────────────────────────────────

/// Detect reward funds that arrived since the last sync and distribute them
/// over the current weighted stake. Returns the newly seen amount.
pub fn notify_inflow(
    env: &Env,
    token: &Address,
    total_weighted: i128,
) -> Result<i128, ContractError> {
    let mut channel = channel(env, token)?;
    let unseen = custody_balance(env, token).saturating_sub(channel.tracked_balance);
    if unseen <= 0 {
        return Ok(0);
    }

    channel.cumulated_reward_per_weight =
        accumulate(channel.cumulated_reward_per_weight, unseen, total_weighted)?;
    channel.tracked_balance = channel.tracked_balance.saturating_add(unseen);
    channel.last_update_time = env.ledger().timestamp();
    store_channel(env, token, &channel);

    events::publish_reward_notified(
        env,
        token.clone(),
        unseen,
        channel.cumulated_reward_per_weight,
        total_weighted > 0,
    );
    Ok(unseen)
}

/// Fold everything `account` earned at `locked_weighted` into its claimable
/// balances and re-baseline the debt.
///
/// Must run before any change to the account's weighted stake.
pub fn settle(
    env: &Env,
    account: &Address,
    locked_weighted: i128,
    total_weighted: i128,
) -> Result<(), ContractError> {
    for token in reward_tokens(env).iter() {
        notify_inflow(env, &token, total_weighted)?;
        let cum = channel(env, &token)?.cumulated_reward_per_weight;

        let cum_paid = get_user(env, USER_RPW_PAID, account, &token);
        let gained = accrued(cum, locked_weighted, cum_paid)?;
        if gained > 0 {
            let claimable = get_user(env, USER_CLAIMABLE, account, &token)
                .checked_add(gained)
                .ok_or(ContractError::MathOverflow)?;
            set_user(env, USER_CLAIMABLE, account, &token, claimable);
        }
        set_user(env, USER_RPW_PAID, account, &token, cum);
    }
    Ok(())
}

/// Re-baseline every debt snapshot after the account's weight changed.
pub fn reset_debt(env: &Env, account: &Address) -> Result<(), ContractError> {
    for token in reward_tokens(env).iter() {
        let cum = channel(env, &token)?.cumulated_reward_per_weight;
        set_user(env, USER_RPW_PAID, account, &token, cum);
    }
    Ok(())
}

/// Move the payable part of `account`'s claimable `token` balance out of the
/// ledger and return it. The caller performs the transfer.
pub fn take_claimable(
    env: &Env,
    account: &Address,
    token: &Address,
) -> Result<i128, ContractError> {
    let mut channel = channel(env, token)?;
    let (payable, dust) = descale(get_user(env, USER_CLAIMABLE, account, token));
    if payable == 0 {
        return Ok(0);
    }
    set_user(env, USER_CLAIMABLE, account, token, dust);

    let paid = get_user(env, USER_PAID, account, token);
    set_user(env, USER_PAID, account, token, paid.saturating_add(payable));

    channel.tracked_balance = channel.tracked_balance.saturating_sub(payable);
    channel.total_paid = channel.total_paid.saturating_add(payable);
    store_channel(env, token, &channel);
    Ok(payable)
}

/// Claimable amount per reward token, including inflow that has arrived but
/// not been synced yet. Read-only.
pub fn pending(
    env: &Env,
    account: &Address,
    locked_weighted: i128,
    total_weighted: i128,
) -> Result<Vec<RewardAmount>, ContractError> {
    let mut out = Vec::new(env);
    for token in reward_tokens(env).iter() {
        let channel = channel(env, &token)?;
        let unseen = custody_balance(env, &token).saturating_sub(channel.tracked_balance);
        let cum = accumulate(channel.cumulated_reward_per_weight, unseen, total_weighted)?;

        let cum_paid = get_user(env, USER_RPW_PAID, account, &token);
        let claimable = get_user(env, USER_CLAIMABLE, account, &token)
            .checked_add(accrued(cum, locked_weighted, cum_paid)?)
            .ok_or(ContractError::MathOverflow)?;
        out.push_back(RewardAmount {
            amount: descale(claimable).0,
            token,
        });
    }
    Ok(out)
}

pub fn paid_to_date(env: &Env, account: &Address, token: &Address) -> i128 {
    get_user(env, USER_PAID, account, token)
}

// ── Unit tests ──────────────────────────────────────────────────────────────
