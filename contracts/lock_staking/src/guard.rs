use soroban_sdk::{symbol_short, Env, Symbol};

use crate::ContractError;

const PAUSED: Symbol = symbol_short!("PAUSED");
const ENTERED: Symbol = symbol_short!("ENTERED");

pub fn is_paused(env: &Env) -> bool {
    env.storage().instance().get(&PAUSED).unwrap_or(false)
}

pub fn set_paused(env: &Env, paused: bool) {
    env.storage().instance().set(&PAUSED, &paused);
}

pub fn require_not_paused(env: &Env) -> Result<(), ContractError> {
    if is_paused(env) {
        return Err(ContractError::Paused);
    }
    Ok(())
}

/// Take the re-entrancy flag for the duration of an outgoing transfer.
///
/// A failed invocation rolls back storage, so the flag never stays set
/// past an aborted call.
pub fn enter(env: &Env) -> Result<(), ContractError> {
    if env.storage().instance().get(&ENTERED).unwrap_or(false) {
        return Err(ContractError::Reentrancy);
    }
    env.storage().instance().set(&ENTERED, &true);
    Ok(())
}

pub fn exit(env: &Env) {
    env.storage().instance().remove(&ENTERED);
}
