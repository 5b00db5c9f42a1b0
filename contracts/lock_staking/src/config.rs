use soroban_sdk::{contracttype, symbol_short, Env, Symbol, Vec};

use crate::cycle::WHOLE;
use crate::ContractError;

const LOCK_CONFIG: Symbol = symbol_short!("LK_CFG");

/// Relock cycle applied when none is configured explicitly.
pub const DEFAULT_RELOCK: u64 = 30 * 86_400;

/// A selectable (period, multiplier) pair.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct LockTier {
    pub period: u64,
    pub multiplier: u32,
}

/// Lock policy shared by every lifecycle operation.
///
/// Loaded once per invocation and passed down by reference. `version` is
/// bumped by every setter. Records copy `period` and `multiplier` out of
/// `tiers` at creation, so later edits never reach existing locks.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct LockConfig {
    pub version: u32,
    pub tiers: Vec<LockTier>,
    pub default_relock: u64,
    pub base_penalty_bps: u32,
    pub time_penalty_bps: u32,
    pub early_exit_enabled: bool,
}

impl LockConfig {
    pub fn new(env: &Env) -> Self {
        LockConfig {
            version: 0,
            tiers: Vec::new(env),
            default_relock: DEFAULT_RELOCK,
            base_penalty_bps: 0,
            time_penalty_bps: 0,
            early_exit_enabled: false,
        }
    }

    /// Tier at `index`, or `InvalidAmount` when out of range.
    pub fn tier(&self, index: u32) -> Result<LockTier, ContractError> {
        self.tiers.get(index).ok_or(ContractError::InvalidAmount)
    }
}

pub fn load(env: &Env) -> Result<LockConfig, ContractError> {
    env.storage()
        .instance()
        .get(&LOCK_CONFIG)
        .ok_or(ContractError::NotInitialized)
}

pub fn store(env: &Env, config: &mut LockConfig) {
    config.version = config.version.saturating_add(1);
    env.storage().instance().set(&LOCK_CONFIG, config);
}

pub fn build_tiers(
    env: &Env,
    periods: &Vec<u64>,
    multipliers: &Vec<u32>,
) -> Result<Vec<LockTier>, ContractError> {
    if periods.is_empty() || periods.len() != multipliers.len() {
        return Err(ContractError::BadConfiguration);
    }
    let mut tiers = Vec::new(env);
    for (period, multiplier) in periods.iter().zip(multipliers.iter()) {
        if period == 0 || multiplier == 0 {
            return Err(ContractError::BadConfiguration);
        }
        tiers.push_back(LockTier { period, multiplier });
    }
    Ok(tiers)
}

pub fn validate_penalties(
    base_penalty_bps: u32,
    time_penalty_bps: u32,
) -> Result<(), ContractError> {
    if base_penalty_bps.saturating_add(time_penalty_bps) > WHOLE {
        return Err(ContractError::BadConfiguration);
    }
    Ok(())
}

pub fn validate_relock(default_relock: u64) -> Result<(), ContractError> {
    if default_relock == 0 {
        return Err(ContractError::BadConfiguration);
    }
    Ok(())
}
