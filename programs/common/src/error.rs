//! Error taxonomy shared by every program

use thiserror::Error;

/// Which class of rule rejected a request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Malformed request, rejected before any state is read for admission
    Validation,
    /// Well-formed but the pool or limits cannot take it
    Admission,
    /// Wrong moment in a position's or epoch's life
    Lifecycle,
    /// Settlement could not be funded; the whole call rolled back
    Solvency,
    /// Capability missing or belongs to another instance
    Authorization,
    /// Checked arithmetic overflowed
    Arithmetic,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BulwarkError {
    #[error("amount must be non-zero")]
    AmountZero,
    #[error("strategy is not accepted")]
    InvalidStrategy,
    #[error("period {period}s outside [{min}s, {max}s]")]
    PeriodOutOfBounds { period: u64, min: u64, max: u64 },
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("conversion rate must be non-zero")]
    InvalidRate,
    #[error("unknown position")]
    UnknownPosition,
    #[error("unknown depositor position")]
    UnknownDepositor,
    #[error("caller is not the position holder")]
    NotHolder,
    #[error("caller does not own the depositor position")]
    NotOwner,
    #[error("payoff {payoff} exceeds locked amount {locked}")]
    PayoffExceedsLocked { payoff: u128, locked: u128 },

    #[error("strategy limit exceeded")]
    StrategyLimitExceeded,
    #[error("total locked limit exceeded")]
    TotalLimitExceeded,
    #[error("insufficient pool liquidity: need {needed}, available {available}")]
    InsufficientLiquidity { needed: u128, available: u128 },
    #[error("insufficient funds: need {needed}, have {available}")]
    InsufficientFunds { needed: u128, available: u128 },

    #[error("position already settled")]
    AlreadySettled,
    #[error("position has not expired")]
    NotExpired,
    #[error("entry/exit window is closed")]
    WindowClosed,
    #[error("epoch has not elapsed")]
    EpochNotElapsed,
    #[error("insufficient share: requested {requested}, held {held}")]
    InsufficientShare { requested: u128, held: u128 },
    #[error("re-entrant call into {0}")]
    Reentrant(&'static str),

    #[error("backstop cannot cover {requested}")]
    BackstopInsufficient { requested: u128 },

    #[error("unauthorized")]
    Unauthorized,

    #[error("arithmetic overflow")]
    Overflow,

    #[error("strategy refused: {0}")]
    Strategy(String),
}

impl BulwarkError {
    pub fn kind(&self) -> ErrorKind {
        use BulwarkError::*;
        match self {
            AmountZero
            | InvalidStrategy
            | PeriodOutOfBounds { .. }
            | InvalidConfig(_)
            | InvalidRate
            | UnknownPosition
            | UnknownDepositor
            | NotHolder
            | NotOwner
            | PayoffExceedsLocked { .. }
            | Strategy(_) => ErrorKind::Validation,
            StrategyLimitExceeded
            | TotalLimitExceeded
            | InsufficientLiquidity { .. }
            | InsufficientFunds { .. } => ErrorKind::Admission,
            AlreadySettled
            | NotExpired
            | WindowClosed
            | EpochNotElapsed
            | InsufficientShare { .. }
            | Reentrant(_) => ErrorKind::Lifecycle,
            BackstopInsufficient { .. } => ErrorKind::Solvency,
            Unauthorized => ErrorKind::Authorization,
            Overflow => ErrorKind::Arithmetic,
        }
    }
}

/// Checked-arithmetic shorthand: `None` becomes `Overflow`
pub trait OrOverflow<T> {
    fn or_overflow(self) -> Result<T, BulwarkError>;
}

impl<T> OrOverflow<T> for Option<T> {
    fn or_overflow(self) -> Result<T, BulwarkError> {
        self.ok_or(BulwarkError::Overflow)
    }
}
