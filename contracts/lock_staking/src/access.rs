use soroban_sdk::{contracttype, symbol_short, Address, Env, Symbol};

use crate::ContractError;

// ── Storage Keys ─────────────────────────────────────────────────────────────

const ROLE_PREFIX: Symbol = symbol_short!("ROLE");
const OWNER: Symbol = symbol_short!("OWNER");

const TTL_THRESHOLD: u32 = 5184000;
const TTL_EXTEND_TO: u32 = 10368000;

// ── Role Enum ────────────────────────────────────────────────────────────────

/// Operator hierarchy; a higher rank can do everything a lower one can.
///
/// - `Guardian` – pause and unpause.
/// - `Operator` – lock tiers, penalties, relock cycle, tokens, treasury.
/// - `Owner`    – grant and revoke roles.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
#[repr(u32)]
pub enum Role {
    Guardian = 1,
    Operator = 2,
    Owner = 3,
}

impl Role {
    pub fn rank(&self) -> u32 {
        match self {
            Role::Guardian => 1,
            Role::Operator => 2,
            Role::Owner => 3,
        }
    }

    pub fn covers(&self, required: &Role) -> bool {
        self.rank() >= required.rank()
    }
}

fn role_key(holder: &Address) -> (Symbol, Address) {
    (ROLE_PREFIX, holder.clone())
}

pub fn set_role(env: &Env, holder: &Address, role: Role) {
    let key = role_key(holder);
    env.storage().persistent().set(&key, &role);
    env.storage()
        .persistent()
        .extend_ttl(&key, TTL_THRESHOLD, TTL_EXTEND_TO);
}

pub fn role_of(env: &Env, holder: &Address) -> Option<Role> {
    env.storage().persistent().get(&role_key(holder))
}

/// Record the bootstrap owner at initialisation.
pub fn set_owner(env: &Env, owner: &Address) {
    env.storage().instance().set(&OWNER, owner);
    set_role(env, owner, Role::Owner);
}

pub fn owner(env: &Env) -> Option<Address> {
    env.storage().instance().get(&OWNER)
}

/// Guard: `Unauthorized` unless `caller` holds at least `required`.
///
/// The caller must already have passed `require_auth()`.
pub fn require_role(env: &Env, caller: &Address, required: &Role) -> Result<(), ContractError> {
    match role_of(env, caller) {
        Some(role) if role.covers(required) => Ok(()),
        _ => Err(ContractError::Unauthorized),
    }
}

pub fn grant(
    env: &Env,
    caller: &Address,
    target: &Address,
    role: Role,
) -> Result<(), ContractError> {
    require_role(env, caller, &Role::Owner)?;
    set_role(env, target, role);
    Ok(())
}

/// Strip `target` of its role. The bootstrap owner cannot be revoked.
pub fn revoke(env: &Env, caller: &Address, target: &Address) -> Result<(), ContractError> {
    require_role(env, caller, &Role::Owner)?;
    if owner(env).as_ref() == Some(target) {
        return Err(ContractError::Unauthorized);
    }
    env.storage().persistent().remove(&role_key(target));
    Ok(())
}
