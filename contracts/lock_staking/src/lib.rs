#![no_std]

pub mod access;
pub mod balances;
pub mod config;
pub mod cycle;
pub mod errors;
pub mod events;
pub mod guard;
pub mod registry;
pub mod rewards;

use soroban_sdk::{
    contract, contractimpl, contracttype, symbol_short, token, Address, Env, Symbol, Vec,
};

pub use access::Role;
pub use balances::{AccountBalance, LockTotals};
pub use config::{LockConfig, LockTier};
pub use errors::{ContractError, ErrorCategory};
pub use registry::LockRecord;
pub use rewards::{RewardAmount, RewardChannel};

// ── Storage key constants ────────────────────────────────────────────────────

const INITIALIZED: Symbol = symbol_short!("INIT");
const STAKE_TOKEN: Symbol = symbol_short!("STK_TOK");
const TREASURY: Symbol = symbol_short!("TREASURY");

// ── Public-facing types ──────────────────────────────────────────────────────

/// Result of an early exit: what the account received and what went to the
/// treasury. `paid + penalty` equals the lock amount.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct EarlyExitReceipt {
    pub paid: i128,
    pub penalty: i128,
}

// ── Contract ─────────────────────────────────────────────────────────────────

#[contract]
pub struct LockStakingContract;

#[contractimpl]
impl LockStakingContract {
    // ── Initialisation ──────────────────────────────────────────────────────

    /// Bootstrap the contract.
    ///
    /// `owner` receives the `Owner` role. Lock tiers, penalties, the custody
    /// token and reward tokens are configured afterwards through the
    /// operator setters; early exit starts disabled.
    pub fn initialize(env: Env, owner: Address, treasury: Address) -> Result<(), ContractError> {
        if env.storage().instance().has(&INITIALIZED) {
            return Err(ContractError::AlreadyInitialized);
        }

        env.storage().instance().set(&INITIALIZED, &true);
        env.storage().instance().set(&TREASURY, &treasury);
        config::store(&env, &mut LockConfig::new(&env));
        access::set_owner(&env, &owner);

        events::publish_initialized(&env, owner, treasury);
        Ok(())
    }

    // ── Locking ─────────────────────────────────────────────────────────────

    /// Lock `amount` custody tokens from `caller` for `beneficiary` under the
    /// tier at `tier_index`. Returns the new lock id.
    pub fn stake(
        env: Env,
        caller: Address,
        amount: i128,
        beneficiary: Address,
        tier_index: u32,
    ) -> Result<u64, ContractError> {
        Self::require_initialized(&env)?;
        caller.require_auth();
        guard::require_not_paused(&env)?;

        let stake_token = Self::stake_token_address(&env)?;
        let config = config::load(&env)?;

        let id = Self::create_lock(&env, &config, &beneficiary, amount, tier_index, false)?;

        token::Client::new(&env, &stake_token).transfer(
            &caller,
            &env.current_contract_address(),
            &amount,
        );
        Ok(id)
    }

    // ── Exits ───────────────────────────────────────────────────────────────

    /// Leave an active lock immediately, paying the cycle penalty to the
    /// treasury. The lock is deleted.
    pub fn early_exit_by_id(
        env: Env,
        account: Address,
        lock_id: u64,
    ) -> Result<EarlyExitReceipt, ContractError> {
        Self::require_initialized(&env)?;
        account.require_auth();
        guard::require_not_paused(&env)?;

        let config = config::load(&env)?;
        if !config.early_exit_enabled {
            return Err(ContractError::FeatureDisabled);
        }
        let stake_token = Self::stake_token_address(&env)?;
        let treasury = Self::treasury_address(&env)?;

        let record = registry::get(&env, &account, lock_id)?;
        if !record.is_active() {
            return Err(ContractError::LockNotActive);
        }

        guard::enter(&env)?;

        // 1. Settle at the old weight.
        Self::settle_account(&env, &account)?;

        // 2. Price the exit.
        let penalty = Self::penalty_for(&env, &record, &config);
        let paid = record.amount.saturating_sub(penalty);

        // 3. Drop the lock from the totals and the registry.
        balances::remove_active(&env, &account, &record);
        rewards::reset_debt(&env, &account)?;
        registry::remove(&env, &account, lock_id)?;

        // 4. Pay out.
        let client = token::Client::new(&env, &stake_token);
        if paid > 0 {
            client.transfer(&env.current_contract_address(), &account, &paid);
        }
        if penalty > 0 {
            client.transfer(&env.current_contract_address(), &treasury, &penalty);
        }

        guard::exit(&env);
        events::publish_early_exit(&env, account, lock_id, record.amount, penalty);

        Ok(EarlyExitReceipt { paid, penalty })
    }

    /// Stop earning on an active lock and start its countdown to the end of
    /// the current cycle. Returns the unlock timestamp.
    pub fn exit_late_by_id(env: Env, account: Address, lock_id: u64) -> Result<u64, ContractError> {
        Self::require_initialized(&env)?;
        account.require_auth();
        guard::require_not_paused(&env)?;

        let config = config::load(&env)?;
        let record = registry::get(&env, &account, lock_id)?;
        if !record.is_active() {
            return Err(ContractError::LockNotActive);
        }

        Self::settle_account(&env, &account)?;

        let now = env.ledger().timestamp();
        let remaining = cycle::remaining_cycle_time(
            record.start_time,
            record.period,
            config.default_relock,
            now,
        );
        let unlock_time = now.saturating_add(remaining);

        balances::remove_active(&env, &account, &record);
        rewards::reset_debt(&env, &account)?;

        registry::set_unlock_time(&env, &account, lock_id, unlock_time)?;
        registry::mark_exited_late(&env, &account, lock_id)?;

        events::publish_late_exit(&env, account, lock_id, record.amount, unlock_time);
        Ok(unlock_time)
    }

    /// Roll a late-exited lock into a fresh lock under `tier_index`.
    ///
    /// The new period must be at least the cycle currently applying to the
    /// old lock: its own period while that has not fully elapsed (or when
    /// it does not exceed the default relock), the default relock otherwise.
    pub fn restake_after_late_exit(
        env: Env,
        account: Address,
        lock_id: u64,
        tier_index: u32,
    ) -> Result<u64, ContractError> {
        Self::require_initialized(&env)?;
        account.require_auth();
        guard::require_not_paused(&env)?;

        let config = config::load(&env)?;
        let record = registry::get(&env, &account, lock_id)?;
        if !record.exited_late {
            return Err(ContractError::NotEligibleForRestake);
        }

        let tier = config.tier(tier_index)?;
        let elapsed = env.ledger().timestamp().saturating_sub(record.start_time);
        let floor = cycle::effective_period(record.period, config.default_relock, elapsed);
        if tier.period < floor {
            return Err(ContractError::PeriodTooShort);
        }

        // Free the slot first so a full account can still roll its lock.
        registry::remove(&env, &account, lock_id)?;
        let new_id = Self::create_lock(&env, &config, &account, record.amount, tier_index, true)?;

        events::publish_restaked(&env, account, lock_id, new_id, record.amount);
        Ok(new_id)
    }

    // ── Withdrawals ─────────────────────────────────────────────────────────

    /// Pay out a single matured lock.
    ///
    /// Fails with `StillLocked` while the lock is active or before its
    /// unlock time, and with `UnknownLock` once it has been withdrawn.
    pub fn withdraw_unlocked_by_id(
        env: Env,
        account: Address,
        lock_id: u64,
    ) -> Result<i128, ContractError> {
        Self::require_initialized(&env)?;
        account.require_auth();
        guard::require_not_paused(&env)?;

        let stake_token = Self::stake_token_address(&env)?;
        let record = registry::get(&env, &account, lock_id)?;
        if !record.is_unlocked(env.ledger().timestamp()) {
            return Err(ContractError::StillLocked);
        }

        guard::enter(&env)?;

        registry::remove(&env, &account, lock_id)?;
        token::Client::new(&env, &stake_token).transfer(
            &env.current_contract_address(),
            &account,
            &record.amount,
        );

        guard::exit(&env);
        events::publish_withdrawn(&env, account, lock_id, record.amount);
        Ok(record.amount)
    }

    /// Pay out every matured lock held by `account` in one transfer.
    /// Returns the total withdrawn, zero when nothing has matured.
    pub fn withdraw_all_unlocked(env: Env, account: Address) -> Result<i128, ContractError> {
        Self::require_initialized(&env)?;
        account.require_auth();
        guard::require_not_paused(&env)?;

        let stake_token = Self::stake_token_address(&env)?;
        let now = env.ledger().timestamp();

        guard::enter(&env)?;

        let mut total: i128 = 0;
        for lock_id in registry::ids(&env, &account).iter() {
            let record = registry::get(&env, &account, lock_id)?;
            if !record.is_unlocked(now) {
                continue;
            }
            registry::remove(&env, &account, lock_id)?;
            total = total.saturating_add(record.amount);
            events::publish_withdrawn(&env, account.clone(), lock_id, record.amount);
        }

        if total > 0 {
            token::Client::new(&env, &stake_token).transfer(
                &env.current_contract_address(),
                &account,
                &total,
            );
        }

        guard::exit(&env);
        Ok(total)
    }

    // ── Rewards ─────────────────────────────────────────────────────────────

    /// Detect reward funds sent to the contract since the last sync and
    /// distribute them over the current weighted stake. Callable by anyone.
    pub fn notify_inflow(env: Env, token: Address) -> Result<i128, ContractError> {
        Self::require_initialized(&env)?;
        let totals = balances::totals(&env);
        rewards::notify_inflow(&env, &token, totals.total_locked_weighted)
    }

    /// Claim the payable balance of each token in `tokens`.
    pub fn claim_rewards(
        env: Env,
        account: Address,
        tokens: Vec<Address>,
    ) -> Result<Vec<RewardAmount>, ContractError> {
        Self::require_initialized(&env)?;
        account.require_auth();
        guard::require_not_paused(&env)?;

        for token in tokens.iter() {
            if !rewards::is_registered(&env, &token) {
                return Err(ContractError::NotConfigured);
            }
        }

        Self::claim(&env, &account, &tokens)
    }

    /// Claim every registered reward token.
    pub fn claim_all_rewards(
        env: Env,
        account: Address,
    ) -> Result<Vec<RewardAmount>, ContractError> {
        Self::require_initialized(&env)?;
        account.require_auth();
        guard::require_not_paused(&env)?;

        let tokens = rewards::reward_tokens(&env);
        Self::claim(&env, &account, &tokens)
    }

    // ── View functions ───────────────────────────────────────────────────────

    pub fn get_config(env: Env) -> Result<LockConfig, ContractError> {
        config::load(&env)
    }

    pub fn get_tiers(env: Env) -> Result<Vec<LockTier>, ContractError> {
        Ok(config::load(&env)?.tiers)
    }

    pub fn get_balance(env: Env, account: Address) -> AccountBalance {
        balances::balance(&env, &account)
    }

    pub fn get_totals(env: Env) -> LockTotals {
        balances::totals(&env)
    }

    /// Real-time claimable amount per reward token, without mutating state.
    pub fn claimable_rewards(
        env: Env,
        account: Address,
    ) -> Result<Vec<RewardAmount>, ContractError> {
        let balance = balances::balance(&env, &account);
        let totals = balances::totals(&env);
        rewards::pending(&env, &account, balance.locked_weighted, totals.total_locked_weighted)
    }

    pub fn rewards_paid(env: Env, account: Address, token: Address) -> i128 {
        rewards::paid_to_date(&env, &account, &token)
    }

    pub fn get_reward_channel(env: Env, token: Address) -> Result<RewardChannel, ContractError> {
        rewards::channel(&env, &token)
    }

    pub fn reward_tokens(env: Env) -> Vec<Address> {
        rewards::reward_tokens(&env)
    }

    pub fn get_lock(env: Env, account: Address, lock_id: u64) -> Result<LockRecord, ContractError> {
        registry::get(&env, &account, lock_id)
    }

    pub fn lock_count(env: Env, account: Address) -> u32 {
        registry::count(&env, &account)
    }

    /// One page of `account`'s locks. The last page may be short; there is
    /// no padding.
    pub fn list_locks(env: Env, account: Address, page: u32, page_size: u32) -> Vec<LockRecord> {
        registry::list_page(&env, &account, page, page_size)
    }

    /// Seconds left in the lock's current cycle.
    pub fn calc_remaining_time(
        env: Env,
        account: Address,
        lock_id: u64,
    ) -> Result<u64, ContractError> {
        let config = config::load(&env)?;
        let record = registry::get(&env, &account, lock_id)?;
        Ok(cycle::remaining_cycle_time(
            record.start_time,
            record.period,
            config.default_relock,
            env.ledger().timestamp(),
        ))
    }

    /// Penalty an early exit of this lock would cost right now.
    pub fn calc_penalty(env: Env, account: Address, lock_id: u64) -> Result<i128, ContractError> {
        let config = config::load(&env)?;
        let record = registry::get(&env, &account, lock_id)?;
        Ok(Self::penalty_for(&env, &record, &config))
    }

    pub fn stake_token(env: Env) -> Option<Address> {
        env.storage().instance().get(&STAKE_TOKEN)
    }

    pub fn treasury(env: Env) -> Result<Address, ContractError> {
        Self::treasury_address(&env)
    }

    pub fn is_paused(env: Env) -> bool {
        guard::is_paused(&env)
    }

    pub fn is_initialized(env: Env) -> bool {
        env.storage().instance().has(&INITIALIZED)
    }

    pub fn get_role(env: Env, holder: Address) -> Option<Role> {
        access::role_of(&env, &holder)
    }

    // ── Operator functions ───────────────────────────────────────────────────

    /// Replace the tier table. Existing locks keep the period and multiplier
    /// they were created with.
    pub fn set_lock_tiers(
        env: Env,
        caller: Address,
        periods: Vec<u64>,
        multipliers: Vec<u32>,
    ) -> Result<(), ContractError> {
        Self::require_operator(&env, &caller)?;

        let mut cfg = config::load(&env)?;
        cfg.tiers = config::build_tiers(&env, &periods, &multipliers)?;
        config::store(&env, &mut cfg);

        events::publish_tiers_set(&env, cfg.tiers, cfg.version);
        Ok(())
    }

    /// Set the base and time-decaying penalty fractions, in basis points.
    pub fn set_penalty_config(
        env: Env,
        caller: Address,
        base_penalty_bps: u32,
        time_penalty_bps: u32,
    ) -> Result<(), ContractError> {
        Self::require_operator(&env, &caller)?;
        config::validate_penalties(base_penalty_bps, time_penalty_bps)?;

        let mut cfg = config::load(&env)?;
        cfg.base_penalty_bps = base_penalty_bps;
        cfg.time_penalty_bps = time_penalty_bps;
        config::store(&env, &mut cfg);

        events::publish_penalty_set(&env, base_penalty_bps, time_penalty_bps, cfg.version);
        Ok(())
    }

    pub fn set_default_relock(
        env: Env,
        caller: Address,
        default_relock: u64,
    ) -> Result<(), ContractError> {
        Self::require_operator(&env, &caller)?;
        config::validate_relock(default_relock)?;

        let mut cfg = config::load(&env)?;
        cfg.default_relock = default_relock;
        config::store(&env, &mut cfg);

        events::publish_relock_set(&env, default_relock, cfg.version);
        Ok(())
    }

    pub fn set_early_exit_enabled(
        env: Env,
        caller: Address,
        enabled: bool,
    ) -> Result<(), ContractError> {
        Self::require_operator(&env, &caller)?;

        let mut cfg = config::load(&env)?;
        cfg.early_exit_enabled = enabled;
        config::store(&env, &mut cfg);

        events::publish_early_exit_toggled(&env, enabled, cfg.version);
        Ok(())
    }

    /// Set the custody token. One-shot.
    pub fn set_stake_token(
        env: Env,
        caller: Address,
        stake_token: Address,
    ) -> Result<(), ContractError> {
        Self::require_operator(&env, &caller)?;

        if env.storage().instance().has(&STAKE_TOKEN) {
            return Err(ContractError::AlreadyConfigured);
        }
        if rewards::is_registered(&env, &stake_token) {
            return Err(ContractError::BadConfiguration);
        }
        env.storage().instance().set(&STAKE_TOKEN, &stake_token);

        events::publish_stake_token_set(&env, stake_token);
        Ok(())
    }

    pub fn set_treasury(env: Env, caller: Address, treasury: Address) -> Result<(), ContractError> {
        Self::require_operator(&env, &caller)?;
        env.storage().instance().set(&TREASURY, &treasury);

        events::publish_treasury_set(&env, treasury);
        Ok(())
    }

    /// Open a reward channel for `reward_token`. Irreversible; the custody
    /// token cannot double as a reward token.
    pub fn register_reward_token(
        env: Env,
        caller: Address,
        reward_token: Address,
    ) -> Result<(), ContractError> {
        Self::require_operator(&env, &caller)?;

        let stake_token: Option<Address> = env.storage().instance().get(&STAKE_TOKEN);
        if stake_token.as_ref() == Some(&reward_token) {
            return Err(ContractError::BadConfiguration);
        }
        rewards::register(&env, &reward_token)?;

        events::publish_reward_token_registered(&env, reward_token);
        Ok(())
    }

    /// Send out tokens that were transferred to the contract by mistake.
    /// The custody token and reward tokens are off limits.
    pub fn recover_token(
        env: Env,
        caller: Address,
        token: Address,
        amount: i128,
        to: Address,
    ) -> Result<(), ContractError> {
        Self::require_operator(&env, &caller)?;

        if amount <= 0 {
            return Err(ContractError::InvalidAmount);
        }
        let stake_token: Option<Address> = env.storage().instance().get(&STAKE_TOKEN);
        if stake_token.as_ref() == Some(&token) || rewards::is_registered(&env, &token) {
            return Err(ContractError::BadConfiguration);
        }

        token::Client::new(&env, &token).transfer(&env.current_contract_address(), &to, &amount);

        events::publish_token_recovered(&env, token, to, amount);
        Ok(())
    }

    pub fn pause(env: Env, caller: Address) -> Result<(), ContractError> {
        Self::require_initialized(&env)?;
        caller.require_auth();
        access::require_role(&env, &caller, &Role::Guardian)?;

        guard::set_paused(&env, true);
        events::publish_pause_changed(&env, caller, true);
        Ok(())
    }

    pub fn unpause(env: Env, caller: Address) -> Result<(), ContractError> {
        Self::require_initialized(&env)?;
        caller.require_auth();
        access::require_role(&env, &caller, &Role::Guardian)?;

        guard::set_paused(&env, false);
        events::publish_pause_changed(&env, caller, false);
        Ok(())
    }

    // ── Role management ──────────────────────────────────────────────────────

    /// Only an `Owner` may call this.
    pub fn grant_role(
        env: Env,
        caller: Address,
        target: Address,
        role: Role,
    ) -> Result<(), ContractError> {
        Self::require_initialized(&env)?;
        caller.require_auth();
        access::grant(&env, &caller, &target, role.clone())?;

        events::publish_role_granted(&env, caller, target, role);
        Ok(())
    }

    /// Only an `Owner` may call this.
    pub fn revoke_role(env: Env, caller: Address, target: Address) -> Result<(), ContractError> {
        Self::require_initialized(&env)?;
        caller.require_auth();
        access::revoke(&env, &caller, &target)?;

        events::publish_role_revoked(&env, caller, target);
        Ok(())
    }

    // ── Internal helpers ─────────────────────────────────────────────────────

    fn require_initialized(env: &Env) -> Result<(), ContractError> {
        if !env.storage().instance().has(&INITIALIZED) {
            return Err(ContractError::NotInitialized);
        }
        Ok(())
    }

    fn require_operator(env: &Env, caller: &Address) -> Result<(), ContractError> {
        Self::require_initialized(env)?;
        caller.require_auth();
        access::require_role(env, caller, &Role::Operator)
    }

    fn stake_token_address(env: &Env) -> Result<Address, ContractError> {
        env.storage()
            .instance()
            .get(&STAKE_TOKEN)
            .ok_or(ContractError::NotConfigured)
    }

    fn treasury_address(env: &Env) -> Result<Address, ContractError> {
        env.storage()
            .instance()
            .get(&TREASURY)
            .ok_or(ContractError::NotInitialized)
    }

    fn penalty_for(env: &Env, record: &LockRecord, config: &LockConfig) -> i128 {
        cycle::penalty_amount(
            record.amount,
            record.start_time,
            record.period,
            config.default_relock,
            env.ledger().timestamp(),
            config.base_penalty_bps,
            config.time_penalty_bps,
        )
    }

    /// Fold pending rewards for `account` into its claimable balances at
    /// its current weight. Runs before every weight change.
    fn settle_account(env: &Env, account: &Address) -> Result<AccountBalance, ContractError> {
        let balance = balances::balance(env, account);
        let totals = balances::totals(env);
        rewards::settle(env, account, balance.locked_weighted, totals.total_locked_weighted)?;
        Ok(balance)
    }

    /// Settle, grow the totals, re-baseline debt and store a new active lock.
    ///
    /// Moves no tokens; `stake` pulls funds afterwards and a restake reuses
    /// funds already in custody.
    fn create_lock(
        env: &Env,
        config: &LockConfig,
        beneficiary: &Address,
        amount: i128,
        tier_index: u32,
        relock: bool,
    ) -> Result<u64, ContractError> {
        if amount <= 0 {
            return Err(ContractError::InvalidAmount);
        }
        let tier = config.tier(tier_index)?;

        Self::settle_account(env, beneficiary)?;

        let record = LockRecord {
            id: 0,
            amount,
            start_time: env.ledger().timestamp(),
            period: tier.period,
            multiplier: tier.multiplier,
            unlock_time: 0,
            exited_late: false,
        };
        balances::add_active(env, beneficiary, &record);
        rewards::reset_debt(env, beneficiary)?;

        let id = registry::create(env, beneficiary, record)?;

        events::publish_locked(
            env,
            beneficiary.clone(),
            id,
            amount,
            tier.period,
            tier.multiplier,
            relock,
            balances::totals(env).total_locked,
        );
        Ok(id)
    }

    fn claim(
        env: &Env,
        account: &Address,
        tokens: &Vec<Address>,
    ) -> Result<Vec<RewardAmount>, ContractError> {
        guard::enter(env)?;

        Self::settle_account(env, account)?;

        let mut out = Vec::new(env);
        for token in tokens.iter() {
            let amount = rewards::take_claimable(env, account, &token)?;
            if amount > 0 {
                token::Client::new(env, &token).transfer(
                    &env.current_contract_address(),
                    account,
                    &amount,
                );
                events::publish_reward_claimed(env, account.clone(), token.clone(), amount);
            }
            out.push_back(RewardAmount { token, amount });
        }

        guard::exit(env);
        Ok(out)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────



#[cfg(test)]
mod test_rewards;
