use soroban_sdk::contracttype;

/// Coarse classification of [`ContractError`] used by front-ends to decide
/// what to tell the user.
///
/// `NotFound` means the referenced lock id is invalid or not owned by the
/// caller; `Policy` means the request was well-formed but violates a rule of
/// the lock lifecycle.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
#[repr(u32)]
pub enum ErrorCategory {
    Lifecycle = 1,
    Authorization = 2,
    Validation = 3,
    Configuration = 4,
    NotFound = 5,
    Policy = 6,
    State = 7,
}

/// Error codes returned by every contract entry point.
///
/// # Code ranges
/// | Range   | Purpose                          |
/// |---------|----------------------------------|
/// | 1 – 9   | Lifecycle, auth, pause           |
/// | 10 – 19 | Input and configuration          |
/// | 20 – 29 | Lock lookup                      |
/// | 30 – 39 | Lock lifecycle policy            |
/// | 40+     | Execution state                  |
#[soroban_sdk::contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
#[repr(u32)]
pub enum ContractError {
    NotInitialized = 1,
    AlreadyInitialized = 2,
    Unauthorized = 3,
    Paused = 4,

    /// Zero/negative amount or tier index outside the tier table.
    InvalidAmount = 10,
    /// Penalty fractions, tier arrays or relock duration are malformed.
    BadConfiguration = 11,
    /// Custody token missing, or a reward token that was never registered.
    NotConfigured = 12,
    /// Custody token or reward token set twice.
    AlreadyConfigured = 13,

    /// The lock id is not held by the caller (includes already removed ids).
    UnknownLock = 20,

    /// The lock has already been exited and no longer earns.
    LockNotActive = 30,
    /// Early exit is administratively disabled.
    FeatureDisabled = 31,
    /// Restake period is below the applicable floor.
    PeriodTooShort = 32,
    /// Restake attempted on a lock that was never late-exited.
    NotEligibleForRestake = 33,
    /// Withdrawal attempted before the unlock time has passed.
    StillLocked = 34,
    /// The account already holds the maximum number of locks.
    TooManyLocks = 35,

    Reentrancy = 40,
    /// Reward accounting left the representable range.
    MathOverflow = 41,
}

impl ContractError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            ContractError::NotInitialized | ContractError::AlreadyInitialized => {
                ErrorCategory::Lifecycle
            }
            ContractError::Unauthorized => ErrorCategory::Authorization,
            ContractError::InvalidAmount => ErrorCategory::Validation,
            ContractError::BadConfiguration
            | ContractError::NotConfigured
            | ContractError::AlreadyConfigured => ErrorCategory::Configuration,
            ContractError::UnknownLock => ErrorCategory::NotFound,
            ContractError::LockNotActive
            | ContractError::FeatureDisabled
            | ContractError::PeriodTooShort
            | ContractError::NotEligibleForRestake
            | ContractError::StillLocked
            | ContractError::TooManyLocks => ErrorCategory::Policy,
            ContractError::Paused | ContractError::Reentrancy | ContractError::MathOverflow => {
                ErrorCategory::State
            }
        }
    }

    /// Whether the caller can fix the failure by changing request parameters
    /// (as opposed to referencing a different lock).
    pub fn is_policy_violation(&self) -> bool {
        matches!(
            self.category(),
            ErrorCategory::Policy | ErrorCategory::Validation
        )
    }
}
